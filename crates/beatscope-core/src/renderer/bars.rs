//! Frequency bars.
//!
//! One bar per visible slot, laid out left to right. Auto-scale stretches the
//! bars over the full width; manual mode uses the raw width and pixel gap.

use crate::canvas::{Canvas, Paint};
use crate::color::color_at;
use crate::settings::{MirroredMode, VisualizationSettings};
use crate::spectrum::SpectrumSampler;

/// Horizontal bar geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub bar_width: f32,
    pub spacing: f32,
}

impl BarLayout {
    pub fn compute(viewport_width: f32, visible_count: usize, settings: &VisualizationSettings) -> Self {
        let count = visible_count.max(1) as f32;

        if settings.auto_scale {
            let spacing_ratio = settings.bar_spacing / 20.0;
            let total_spacing = viewport_width * spacing_ratio;
            let total_bar_width = viewport_width - total_spacing;

            if visible_count > 1 {
                Self {
                    bar_width: total_bar_width / count,
                    spacing: total_spacing / (count - 1.0),
                }
            } else {
                Self {
                    bar_width: total_bar_width,
                    spacing: 0.0,
                }
            }
        } else {
            Self {
                bar_width: viewport_width / count * settings.bar_width,
                spacing: settings.bar_spacing,
            }
        }
    }

    /// Cursor advance per bar
    pub fn pitch(&self) -> f32 {
        self.bar_width + self.spacing
    }
}

pub fn draw(canvas: &mut Canvas, settings: &VisualizationSettings, frequency: &[u8]) {
    let sampler = SpectrumSampler::new(frequency, settings);
    let visible = sampler.visible_count();
    if visible == 0 {
        return;
    }

    let width = canvas.width();
    let height = canvas.height();
    let center_y = height / 2.0;
    let layout = BarLayout::compute(width, visible, settings);

    let mut x = 0.0;
    for (i, value) in sampler.values().enumerate() {
        let paint = Paint::opaque(color_at(i, visible, settings));
        // Unclamped; tall bars are clipped by the surface
        let bar_height = value * (settings.sensitivity / 5.0);

        match settings.mirrored_mode {
            MirroredMode::Mirrored => {
                let half = bar_height / 2.0;
                canvas.rect(x, center_y - half, layout.bar_width, half, paint);
                canvas.rect(x, center_y, layout.bar_width, half, paint);
            }
            MirroredMode::Top => canvas.rect(x, 0.0, layout.bar_width, bar_height, paint),
            MirroredMode::Bottom => {
                canvas.rect(x, height - bar_height, layout.bar_width, bar_height, paint)
            }
        }

        x += layout.pitch();
        if x > width {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;

    fn rects(canvas: &Canvas) -> Vec<(f32, f32, f32, f32)> {
        canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { x, y, w, h, .. } => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_auto_scale_fills_width() {
        let settings = VisualizationSettings::default();
        for count in [2usize, 128, 256, 512] {
            let layout = BarLayout::compute(1024.0, count, &settings);
            let total = layout.bar_width * count as f32 + layout.spacing * (count - 1) as f32;
            assert!((total - 1024.0).abs() < 1e-2, "count {} -> {}", count, total);
        }
    }

    #[test]
    fn test_single_bar_has_no_gap() {
        let settings = VisualizationSettings::default();
        let layout = BarLayout::compute(1000.0, 1, &settings);
        assert_eq!(layout.spacing, 0.0);
        assert_eq!(layout.bar_width, 1000.0 - 50.0);
    }

    #[test]
    fn test_manual_layout_uses_pixels() {
        let settings = VisualizationSettings {
            auto_scale: false,
            bar_width: 0.5,
            bar_spacing: 3.0,
            ..Default::default()
        };
        let layout = BarLayout::compute(1280.0, 128, &settings);
        assert_eq!(layout.bar_width, 5.0);
        assert_eq!(layout.spacing, 3.0);
    }

    #[test]
    fn test_fft_256_fills_1024_viewport() {
        let frequency = vec![50u8; 128];
        let settings = VisualizationSettings {
            mirrored_mode: MirroredMode::Bottom,
            ..Default::default()
        };
        let mut canvas = Canvas::new(1024.0, 600.0);
        draw(&mut canvas, &settings, &frequency);

        let rects = rects(&canvas);
        assert_eq!(rects.len(), 128);
        let (last_x, _, last_w, _) = rects[127];
        assert!((last_x + last_w - 1024.0).abs() < 1e-2);
    }

    #[test]
    fn test_silence_draws_zero_height_bars() {
        let frequency = vec![0u8; 128];
        let mut settings = VisualizationSettings::default();
        let mut canvas = Canvas::new(800.0, 600.0);
        draw(&mut canvas, &settings, &frequency);

        let mirrored = rects(&canvas);
        assert_eq!(mirrored.len(), 256);
        assert!(mirrored.iter().all(|r| r.3 == 0.0 && r.1 == 300.0));

        settings.mirrored_mode = MirroredMode::Bottom;
        let mut canvas = Canvas::new(800.0, 600.0);
        draw(&mut canvas, &settings, &frequency);
        let bottom = rects(&canvas);
        assert_eq!(bottom.len(), 128);
        assert!(bottom.iter().all(|r| r.3 == 0.0 && r.1 == 600.0));
    }

    #[test]
    fn test_height_scales_with_sensitivity() {
        let frequency = vec![200u8; 16];
        let settings = VisualizationSettings {
            sensitivity: 10.0,
            mirrored_mode: MirroredMode::Top,
            ..Default::default()
        };
        let mut canvas = Canvas::new(160.0, 100.0);
        draw(&mut canvas, &settings, &frequency);

        // 200 * 10/5 = 400, taller than the viewport and left unclamped
        assert!(rects(&canvas).iter().all(|r| r.1 == 0.0 && r.3 == 400.0));
    }

    #[test]
    fn test_stops_past_viewport_edge() {
        let frequency = vec![10u8; 64];
        let settings = VisualizationSettings {
            auto_scale: false,
            bar_width: 1.0,
            bar_spacing: 10.0,
            mirrored_mode: MirroredMode::Bottom,
            ..Default::default()
        };
        // bar 10px + gap 10px: the bar starting exactly at x=640 is still drawn
        let mut canvas = Canvas::new(640.0, 480.0);
        draw(&mut canvas, &settings, &frequency);
        assert_eq!(rects(&canvas).len(), 33);
    }
}
