//! Visualization renderers.
//!
//! Each view is a stateless function of the settings and this frame's
//! buffers; dispatch is a match on [`VisualizationType`].

pub mod bars;
pub mod circular;
pub mod wave;

use crate::canvas::Canvas;
use crate::settings::{VisualizationSettings, VisualizationType};

/// Audio buffers for one frame, as produced by the analyser
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameBuffers<'a> {
    /// Byte frequency magnitudes, `fft_size / 2` bins
    pub frequency: &'a [u8],
    /// Byte time-domain samples, 128 = silence
    pub time_domain: &'a [u8],
}

/// Draw the active view onto `canvas`
pub fn draw(canvas: &mut Canvas, settings: &VisualizationSettings, buffers: FrameBuffers<'_>) {
    match settings.visualization_type {
        VisualizationType::Bars => bars::draw(canvas, settings, buffers.frequency),
        VisualizationType::Wave => wave::draw(canvas, settings, buffers.time_domain),
        VisualizationType::Circular => circular::draw(canvas, settings, buffers.frequency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;

    #[test]
    fn test_dispatch_reads_matching_buffer() {
        let frequency = vec![100u8; 64];
        let time_domain = vec![128u8; 64];
        let buffers = FrameBuffers {
            frequency: &frequency,
            time_domain: &time_domain,
        };

        let mut settings = VisualizationSettings {
            visualization_type: VisualizationType::Wave,
            ..Default::default()
        };
        let mut canvas = Canvas::new(640.0, 480.0);
        draw(&mut canvas, &settings, buffers);
        assert!(matches!(canvas.commands(), [DrawCommand::Polyline { .. }]));

        settings.visualization_type = VisualizationType::Bars;
        let mut canvas = Canvas::new(640.0, 480.0);
        draw(&mut canvas, &settings, buffers);
        assert!(canvas
            .commands()
            .iter()
            .all(|c| matches!(c, DrawCommand::FillRect { .. })));
    }
}
