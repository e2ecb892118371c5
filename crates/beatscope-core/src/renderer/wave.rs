//! Oscilloscope-style waveform from time-domain bytes.

use crate::canvas::{Canvas, Paint, Point};
use crate::settings::{ColorMode, VisualizationSettings};

const LINE_WEIGHT: f32 = 2.0;

pub fn draw(canvas: &mut Canvas, settings: &VisualizationSettings, time_domain: &[u8]) {
    if time_domain.is_empty() {
        return;
    }

    let width = canvas.width();
    let height = canvas.height();
    let slice_width = width / time_domain.len() as f32;

    let mut points: Vec<Point> = time_domain
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let v = sample as f32 / 128.0;
            Point::new(i as f32 * slice_width, v * height / 2.0)
        })
        .collect();
    points.push(Point::new(width, height / 2.0));

    let color = match settings.color_mode {
        ColorMode::Solid => settings.bar_color,
        ColorMode::Gradient | ColorMode::Rainbow => settings.gradient_start,
    };

    canvas.polyline(points, LINE_WEIGHT, Paint::opaque(color));
}
