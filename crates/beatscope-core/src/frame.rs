//! Per-frame entry point and resize coalescing.

use std::time::{Duration, Instant};

use crate::canvas::{Canvas, DrawCommand, Paint};
use crate::particles::ParticleField;
use crate::renderer::{self, FrameBuffers};
use crate::settings::{ParticleSettings, VisualizationSettings};

/// Reference frame length in milliseconds (60 Hz)
pub const REFERENCE_FRAME_MS: f32 = 16.67;

/// Resize bursts closer than this collapse into one resize
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Elapsed time in 60 Hz frames
    pub dt: f32,
    /// Wall clock in milliseconds, drives the synced rainbow hue
    pub wall_clock_ms: f64,
}

impl FrameTiming {
    pub fn from_elapsed(elapsed: Duration, wall_clock_ms: f64) -> Self {
        Self {
            dt: elapsed.as_secs_f32() * 1000.0 / REFERENCE_FRAME_MS,
            wall_clock_ms,
        }
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self {
            dt: 1.0,
            wall_clock_ms: 0.0,
        }
    }
}

/// Rendering context owned by the frame driver.
///
/// Holds the surface size and the particle overlay; visualization settings
/// are passed in fresh every frame.
pub struct Visualizer {
    width: f32,
    height: f32,
    particles: ParticleField,
}

impl Visualizer {
    pub fn new(width: f32, height: f32, particle_settings: ParticleSettings) -> Self {
        Self::with_particles(width, height, ParticleField::new(width, height, particle_settings))
    }

    pub fn with_particles(width: f32, height: f32, particles: ParticleField) -> Self {
        Self {
            width,
            height,
            particles,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleField {
        &mut self.particles
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        tracing::debug!("Canvas resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
        self.particles.resize(width, height);
    }

    /// Produce the draw commands for one frame.
    ///
    /// The first command always clears to the background color.
    pub fn render_frame(
        &mut self,
        settings: &VisualizationSettings,
        buffers: FrameBuffers<'_>,
        timing: FrameTiming,
    ) -> Vec<DrawCommand> {
        let mut canvas = Canvas::new(self.width, self.height);
        canvas.clear(Paint::opaque(settings.background_color));

        renderer::draw(&mut canvas, settings, buffers);

        if self.particles.is_enabled() {
            self.particles.sync_colors(settings, timing.wall_clock_ms);
            self.particles.update(buffers.frequency, timing.dt);
            self.particles.draw(&mut canvas);
        }

        canvas.into_commands()
    }
}

/// Coalesces bursts of resize events.
///
/// Every `notify` restarts the quiet period; `poll` yields the latest size
/// once no event arrived for the debounce window.
#[derive(Debug)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<((f32, f32), Instant)>,
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn notify(&mut self, size: (f32, f32), now: Instant) {
        self.pending = Some((size, now));
    }

    pub fn poll(&mut self, now: Instant) -> Option<(f32, f32)> {
        match self.pending {
            Some((size, at)) if now.duration_since(at) >= self.window => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Rgb};
    use crate::settings::{MirroredMode, VisualizationType};

    fn visualizer(particles: ParticleSettings) -> Visualizer {
        Visualizer::with_particles(
            1024.0,
            600.0,
            ParticleField::with_seed(1024.0, 600.0, particles, 3),
        )
    }

    #[test]
    fn test_frame_starts_with_background() {
        let mut viz = visualizer(ParticleSettings::default());
        let settings = VisualizationSettings {
            background_color: Rgb::new(10, 20, 30),
            ..Default::default()
        };
        let commands = viz.render_frame(&settings, FrameBuffers::default(), FrameTiming::default());
        match &commands[0] {
            DrawCommand::Clear { paint } => {
                assert_eq!(paint.color, Color::Rgb(Rgb::new(10, 20, 30)))
            }
            other => panic!("expected clear, got {:?}", other),
        }
    }

    #[test]
    fn test_silent_bars_frame() {
        let mut viz = visualizer(ParticleSettings {
            enabled: false,
            ..Default::default()
        });
        let frequency = [0u8; 128];
        let settings = VisualizationSettings {
            mirrored_mode: MirroredMode::Bottom,
            ..Default::default()
        };
        let buffers = FrameBuffers {
            frequency: &frequency,
            time_domain: &[],
        };
        let commands = viz.render_frame(&settings, buffers, FrameTiming::default());

        // clear + one zero-height rect per bar on the baseline
        assert_eq!(commands.len(), 129);
        assert!(commands[1..].iter().all(|c| matches!(
            c,
            DrawCommand::FillRect { y, h, .. } if *h == 0.0 && *y == 600.0
        )));
        assert_eq!(viz.particles().audio_level(), 0.0);
    }

    #[test]
    fn test_particles_drawn_after_view() {
        let mut viz = visualizer(ParticleSettings {
            count: 4,
            ..Default::default()
        });
        let time_domain = [128u8; 32];
        let settings = VisualizationSettings {
            visualization_type: VisualizationType::Wave,
            ..Default::default()
        };
        let buffers = FrameBuffers {
            frequency: &[0u8; 32],
            time_domain: &time_domain,
        };
        let commands = viz.render_frame(&settings, buffers, FrameTiming::default());

        assert_eq!(commands.len(), 1 + 1 + 4);
        assert!(matches!(commands[1], DrawCommand::Polyline { .. }));
        assert!(commands[2..]
            .iter()
            .all(|c| matches!(c, DrawCommand::FillCircle { .. })));
        // Default gradient colors synced to the midpoint
        assert_eq!(viz.particles().color(), Color::Rgb(Rgb::new(127, 0, 127)));
    }

    #[test]
    fn test_timing_from_elapsed() {
        let timing = FrameTiming::from_elapsed(Duration::from_micros(33_340), 5.0);
        assert!((timing.dt - 2.0).abs() < 1e-3);
        assert_eq!(timing.wall_clock_ms, 5.0);
    }

    #[test]
    fn test_resize_burst_coalesces() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::default();

        debouncer.notify((800.0, 600.0), start);
        debouncer.notify((820.0, 610.0), start + Duration::from_millis(40));
        debouncer.notify((900.0, 700.0), start + Duration::from_millis(80));

        assert_eq!(debouncer.poll(start + Duration::from_millis(150)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(180)),
            Some((900.0, 700.0))
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_resize_updates_particle_bounds() {
        let mut viz = visualizer(ParticleSettings::default());
        viz.resize(320.0, 200.0);
        assert_eq!(viz.size(), (320.0, 200.0));
    }
}
