//! Audio-reactive particle overlay.
//!
//! The field owns its particles and settings. Each frame it derives a single
//! audio level from the frequency buffer, steps every particle, and draws
//! them (plus optional proximity lines) on top of the active view.

mod grid;
mod particle;

pub use grid::{Neighbor, SpatialGrid};
pub use particle::Particle;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::canvas::{Canvas, Paint, Point};
use crate::color::{particle_sync_color, Color, Rgb};
use crate::settings::{ParticleKind, ParticleSettings, VisualizationSettings};

/// Buffers longer than this are subsampled for the audio level
const LEVEL_FULL_SCAN_LIMIT: usize = 512;
/// Approximate number of bins read from a subsampled buffer
const LEVEL_SAMPLE_TARGET: usize = 128;
/// Peak alpha of a connecting line
const LINE_ALPHA: f32 = 0.2;
const HIGHLIGHT_ALPHA: f32 = 0.5;

/// Mean magnitude of `frequency`, normalized to 0-1.
///
/// Large buffers read every `len / 128`-th bin.
pub fn audio_level(frequency: &[u8]) -> f32 {
    if frequency.is_empty() {
        return 0.0;
    }
    let step = if frequency.len() > LEVEL_FULL_SCAN_LIMIT {
        (frequency.len() / LEVEL_SAMPLE_TARGET).max(1)
    } else {
        1
    };

    let (sum, count) = frequency
        .iter()
        .step_by(step)
        .fold((0u64, 0u64), |(sum, count), &v| (sum + v as u64, count + 1));

    sum as f32 / (count as f32 * 255.0)
}

pub struct ParticleField {
    particles: Vec<Particle>,
    settings: ParticleSettings,
    color: Color,
    width: f32,
    height: f32,
    audio_level: f32,
    grid: SpatialGrid,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(width: f32, height: f32, settings: ParticleSettings) -> Self {
        Self::with_rng(width, height, settings, StdRng::from_os_rng())
    }

    /// Deterministic field for reproducible runs
    pub fn with_seed(width: f32, height: f32, settings: ParticleSettings, seed: u64) -> Self {
        Self::with_rng(width, height, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f32, height: f32, settings: ParticleSettings, rng: StdRng) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            color: settings.color.into(),
            grid: SpatialGrid::new(settings.line_threshold),
            settings,
            width,
            height,
            audio_level: 0.0,
            rng,
        };
        field.initialize();
        field
    }

    /// Recreate every particle from the current settings
    fn initialize(&mut self) {
        let (width, height) = (self.width, self.height);
        let settings = &self.settings;
        let color = self.color;
        let rng = &mut self.rng;
        self.particles = (0..settings.count)
            .map(|_| Particle::spawn(&mut *rng, width, height, settings, color))
            .collect();
        tracing::debug!(
            "Particle field initialized: {} x {:?}",
            self.particles.len(),
            self.settings.kind
        );
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn toggle_enabled(&mut self) -> bool {
        self.settings.enabled = !self.settings.enabled;
        self.settings.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }

    pub fn set_kind(&mut self, kind: ParticleKind) {
        self.settings.kind = kind;
        self.initialize();
    }

    pub fn set_count(&mut self, count: usize) {
        self.settings.count = count;
        self.initialize();
    }

    /// New size range; every particle re-rolls its base size
    pub fn set_size(&mut self, size: f32) {
        self.settings.size = size;
        for particle in &mut self.particles {
            particle.randomize_size(&mut self.rng, size);
        }
    }

    /// New speed; every particle re-rolls its velocity
    pub fn set_speed(&mut self, speed: f32) {
        self.settings.speed = speed;
        for particle in &mut self.particles {
            particle.randomize_velocity(&mut self.rng, speed);
        }
    }

    pub fn set_color(&mut self, color: impl Into<Color>) {
        let color = color.into();
        self.color = color;
        for particle in &mut self.particles {
            particle.color = color;
        }
    }

    /// Turning sync off restores the configured particle color
    pub fn set_color_sync(&mut self, sync: bool) {
        self.settings.color_sync = sync;
        if !sync {
            self.set_color(self.settings.color);
        }
    }

    pub fn set_connect_lines(&mut self, connect: bool) {
        self.settings.connect_lines = connect;
    }

    /// Adopt `settings`, rebuilding only what changed
    pub fn apply_settings(&mut self, settings: &ParticleSettings) {
        let old = self.settings.clone();
        self.settings = settings.clone();

        if old.kind != settings.kind || old.count != settings.count {
            self.initialize();
        } else {
            if old.size != settings.size {
                self.set_size(settings.size);
            }
            if old.speed != settings.speed {
                self.set_speed(settings.speed);
            }
        }

        if old.line_threshold != settings.line_threshold {
            self.grid = SpatialGrid::new(settings.line_threshold);
        }
        if old.color != settings.color || !settings.color_sync {
            self.set_color(settings.color);
        }
    }

    /// New canvas bounds; existing particles keep their state
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Follow the visualization colors when sync is on
    pub fn sync_colors(&mut self, visualization: &VisualizationSettings, wall_clock_ms: f64) {
        if !self.settings.color_sync {
            return;
        }
        self.set_color(particle_sync_color(visualization, wall_clock_ms));
    }

    /// Step the simulation by `dt` reference frames (1.0 = 1/60 s)
    pub fn update(&mut self, frequency: &[u8], dt: f32) {
        if !self.settings.enabled {
            return;
        }

        self.audio_level = audio_level(frequency);
        let reactivity = self.audio_level * (self.settings.reactivity / 10.0);
        let bounds = (self.width, self.height);

        for particle in &mut self.particles {
            particle.update(&mut self.rng, bounds, &self.settings, reactivity, dt);
        }
    }

    pub fn draw(&mut self, canvas: &mut Canvas) {
        if !self.settings.enabled {
            return;
        }

        for particle in &self.particles {
            let paint = Paint::with_alpha(particle.color, particle.opacity);
            match self.settings.kind {
                ParticleKind::Bubbles => {
                    canvas.ring(particle.position, particle.size, 1.0, paint);
                    let highlight = Point::new(
                        particle.position.x - particle.size * 0.3,
                        particle.position.y - particle.size * 0.3,
                    );
                    canvas.circle(
                        highlight,
                        particle.size * 0.2,
                        Paint::with_alpha(Rgb::WHITE, HIGHLIGHT_ALPHA * particle.opacity),
                    );
                }
                ParticleKind::Particles | ParticleKind::Lines | ParticleKind::Mixed => {
                    canvas.circle(particle.position, particle.size, paint);
                }
            }
        }

        if self.settings.connect_lines {
            self.draw_connecting_lines(canvas);
        }
    }

    fn draw_connecting_lines(&mut self, canvas: &mut Canvas) {
        let threshold = self.settings.line_threshold;
        if threshold <= 0.0 {
            return;
        }

        let points: Vec<Point> = self.particles.iter().map(|p| p.position).collect();
        self.grid.rebuild(&points);

        for Neighbor { a, b, distance } in self.grid.neighbors(&points) {
            let alpha = (1.0 - distance / threshold) * LINE_ALPHA;
            canvas.line(points[a], points[b], 1.0, Paint::with_alpha(self.color, alpha));
        }
    }
}
