use rand::Rng;

use crate::canvas::Point;
use crate::color::Color;
use crate::settings::{ParticleKind, ParticleSettings};

/// Vertical drift of a bubble per reference frame
const BUBBLE_RISE: f32 = 0.5;
/// Opacity at which the low-reactivity pulse wraps back to full
const FADE_FLOOR: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub base_size: f32,
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
    /// Bubble growth per reference frame
    pub grow_rate: f32,
    pub max_size: f32,
    pub growing: bool,
}

impl Particle {
    pub fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32, settings: &ParticleSettings, color: Color) -> Self {
        let mut particle = Self {
            position: Point::new(0.0, 0.0),
            velocity: Point::new(0.0, 0.0),
            base_size: 1.0,
            size: 1.0,
            color,
            opacity: 0.0,
            grow_rate: 0.0,
            max_size: 1.0,
            growing: true,
        };
        particle.reset(rng, width, height, settings);
        particle
    }

    /// Re-roll everything except the color
    pub fn reset<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32, settings: &ParticleSettings) {
        self.position = Point::new(
            rng.random::<f32>() * width,
            rng.random::<f32>() * height,
        );
        self.randomize_velocity(rng, settings.speed);
        self.randomize_size(rng, settings.size);
        self.opacity = rng.random::<f32>() * settings.opacity;
        self.grow_rate = rng.random::<f32>() * 0.1 + 0.05;
        self.max_size = self.base_size * (rng.random::<f32>() * 5.0 + 5.0);
        self.growing = true;
    }

    pub fn randomize_velocity<R: Rng>(&mut self, rng: &mut R, speed: f32) {
        self.velocity = Point::new(
            (rng.random::<f32>() - 0.5) * speed,
            (rng.random::<f32>() - 0.5) * speed,
        );
    }

    pub fn randomize_size<R: Rng>(&mut self, rng: &mut R, size: f32) {
        self.base_size = rng.random::<f32>() * size + 1.0;
        self.size = self.base_size;
    }

    /// Advance one step.
    ///
    /// `reactivity` is the audio level already scaled by the reactivity
    /// setting; `dt` is the frame time in 60 Hz frames.
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        bounds: (f32, f32),
        settings: &ParticleSettings,
        reactivity: f32,
        dt: f32,
    ) {
        let (width, height) = bounds;
        let boost = 1.0 + reactivity;

        match settings.kind {
            ParticleKind::Particles | ParticleKind::Mixed => {
                self.position.x += self.velocity.x * boost * dt;
                self.position.y += self.velocity.y * boost * dt;
                self.size = self.base_size + reactivity * 5.0;

                if self.position.x < 0.0 {
                    self.position.x = width;
                } else if self.position.x > width {
                    self.position.x = 0.0;
                }
                if self.position.y < 0.0 {
                    self.position.y = height;
                } else if self.position.y > height {
                    self.position.y = 0.0;
                }
            }
            ParticleKind::Bubbles => {
                if self.growing {
                    self.size += self.grow_rate * boost * dt;
                    if self.size >= self.max_size {
                        self.growing = false;
                    }
                } else {
                    self.size -= self.grow_rate * dt;
                    if self.size <= self.base_size {
                        self.reset(rng, width, height, settings);
                    }
                }

                self.position.y -= BUBBLE_RISE * boost * dt;

                if self.position.y < -self.size * 2.0 {
                    self.reset(rng, width, height, settings);
                    self.position.y = height + self.size;
                }
            }
            ParticleKind::Lines => {}
        }

        // Cosmetic pulse, only when the field barely reacts to audio
        if settings.reactivity < 2.0 {
            self.opacity -= settings.fade_speed * dt;
            if self.opacity <= FADE_FLOOR {
                self.opacity = settings.opacity;
            }
        }
    }
}
