//! Radial spectrum around the viewport centre.
//!
//! Wide bars become filled wedges; narrow ones become single radial strokes.

use std::f32::consts::TAU;

use crate::canvas::{Canvas, Paint};
use crate::color::color_at;
use crate::settings::VisualizationSettings;
use crate::spectrum::SpectrumSampler;

/// Bar widths above this draw as wedges
const WEDGE_THRESHOLD: f32 = 0.3;

/// Angular geometry shared by every bar of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub radius: f32,
    pub angle_step: f32,
    pub bar_angle: f32,
}

impl RingLayout {
    pub fn compute(width: f32, height: f32, visible_count: usize, settings: &VisualizationSettings) -> Self {
        let spacing_factor = 1.0 - settings.bar_spacing / 10.0;
        let total_angle = TAU * spacing_factor;
        let angle_step = total_angle / visible_count.max(1) as f32;

        Self {
            radius: width.min(height) / 4.0,
            angle_step,
            bar_angle: angle_step * settings.bar_width,
        }
    }

    /// Radial length of a bar for an adjusted magnitude
    pub fn bar_length(&self, value: f32, sensitivity: f32) -> f32 {
        value * (sensitivity / 5.0) / 256.0 * self.radius
    }
}

pub fn draw(canvas: &mut Canvas, settings: &VisualizationSettings, frequency: &[u8]) {
    let sampler = SpectrumSampler::new(frequency, settings);
    let visible = sampler.visible_count();
    if visible == 0 {
        return;
    }

    let center = canvas.center();
    let layout = RingLayout::compute(canvas.width(), canvas.height(), visible, settings);
    let line_weight = (5.0 * settings.bar_width).max(1.0);
    let half_bar = layout.bar_angle / 2.0;

    for (i, value) in sampler.values().enumerate() {
        let paint = Paint::opaque(color_at(i, visible, settings));
        let bar_length = layout.bar_length(value, settings.sensitivity);
        let angle = i as f32 * layout.angle_step;

        if settings.bar_width > WEDGE_THRESHOLD {
            canvas.wedge(
                center,
                layout.radius,
                layout.radius + bar_length,
                angle - half_bar,
                angle + half_bar,
                paint,
            );
        } else {
            canvas.line(
                center.polar(layout.radius, angle),
                center.polar(layout.radius + bar_length, angle),
                line_weight,
                paint,
            );
        }
    }
}
