//! Color types and the color mapping used by every renderer.
//!
//! Colors arrive from configuration as `#rrggbb` strings. The mapper turns a
//! bar index into a color according to the active [`ColorMode`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::settings::{ColorMode, VisualizationSettings};

/// Errors produced by strict hex color parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#', got {0:?}")]
    MissingHash(String),
    #[error("color must have 6 hex digits, got {0:?}")]
    BadLength(String),
    #[error("invalid hex digits in {0:?}")]
    BadDigits(String),
}

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Two ASCII hex digits to a byte. `from_str_radix` alone also takes a sign.
fn hex_byte(c: &str) -> Option<u8> {
    if c.len() == 2 && c.bytes().all(|b| b.is_ascii_hexdigit()) {
        u8::from_str_radix(c, 16).ok()
    } else {
        None
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, replacing any unreadable channel with 0.
    ///
    /// Malformed colors degrade the picture rather than failing the frame.
    pub fn from_hex_lossy(s: &str) -> Self {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(hex_byte)
                .unwrap_or(0)
        };
        let rgb = Self::new(channel(0..2), channel(2..4), channel(4..6));
        if s.parse::<Rgb>().is_err() {
            tracing::warn!("Malformed color {:?}, using {}", s, rgb);
        }
        rgb
    }

    /// Per-channel `floor(a + (b - a) * ratio)`
    pub fn lerp(self, other: Rgb, ratio: f32) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = (a as f32 + (b as f32 - a as f32) * ratio).floor();
            v.clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Per-channel `floor((a + b) / 2)`
    pub fn midpoint(self, other: Rgb) -> Rgb {
        let mid = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Rgb::new(
            mid(self.r, other.r),
            mid(self.g, other.g),
            mid(self.b, other.b),
        )
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorError::BadLength(s.to_string()));
        }
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(hex_byte)
                .ok_or_else(|| ColorError::BadDigits(s.to_string()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<String> for Rgb {
    fn from(s: String) -> Self {
        Rgb::from_hex_lossy(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color as produced by the mapper.
///
/// Rainbow colors stay in HSL so the painter can hand them to the backend
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(Rgb),
    /// Hue in degrees, saturation and lightness in 0-1
    Hsl {
        hue: f32,
        saturation: f32,
        lightness: f32,
    },
}

impl Color {
    /// Fully saturated, half-lightness hue
    pub fn hue(hue: f32) -> Self {
        Color::Hsl {
            hue,
            saturation: 1.0,
            lightness: 0.5,
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c)
    }
}

/// Color for bar `i` out of `visible_count`.
pub fn color_at(i: usize, visible_count: usize, settings: &VisualizationSettings) -> Color {
    let ratio = if visible_count == 0 {
        0.0
    } else {
        i as f32 / visible_count as f32
    };

    match settings.color_mode {
        ColorMode::Solid => settings.bar_color.into(),
        ColorMode::Gradient => settings
            .gradient_start
            .lerp(settings.gradient_end, ratio)
            .into(),
        ColorMode::Rainbow => Color::hue((ratio * 360.0) % 360.0),
    }
}

/// Single color the particle field adopts when synced to the visualization.
///
/// Rainbow mode cycles one global hue with wall-clock time.
pub fn particle_sync_color(settings: &VisualizationSettings, wall_clock_ms: f64) -> Color {
    match settings.color_mode {
        ColorMode::Solid => settings.bar_color.into(),
        ColorMode::Gradient => settings.gradient_start.midpoint(settings.gradient_end).into(),
        ColorMode::Rainbow => Color::hue(((wall_clock_ms / 50.0) % 360.0) as f32),
    }
}
