//! Visualization and particle settings.
//!
//! Both structs deserialize from the `[visualization]` and `[particles]`
//! tables of the config file; every field falls back to its default.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    #[default]
    Bars,
    Wave,
    Circular,
}

impl VisualizationType {
    pub fn next(self) -> Self {
        match self {
            Self::Bars => Self::Wave,
            Self::Wave => Self::Circular,
            Self::Circular => Self::Bars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Solid,
    #[default]
    Gradient,
    Rainbow,
}

impl ColorMode {
    pub fn next(self) -> Self {
        match self {
            Self::Solid => Self::Gradient,
            Self::Gradient => Self::Rainbow,
            Self::Rainbow => Self::Solid,
        }
    }
}

/// How visual bar indices map onto frequency bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyScaling {
    /// Step decimation across the bins
    Linear,
    /// More bars for the low bins (bass)
    #[default]
    Logarithmic,
    /// More bars for the high bins
    Exponential,
}

impl FrequencyScaling {
    pub fn next(self) -> Self {
        match self {
            Self::Linear => Self::Logarithmic,
            Self::Logarithmic => Self::Exponential,
            Self::Exponential => Self::Linear,
        }
    }
}

/// Where bars grow from (bars view only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirroredMode {
    #[default]
    Mirrored,
    Top,
    Bottom,
}

impl MirroredMode {
    pub fn next(self) -> Self {
        match self {
            Self::Mirrored => Self::Top,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Mirrored,
        }
    }
}

/// Per-frame visualization settings, owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationSettings {
    pub visualization_type: VisualizationType,
    pub color_mode: ColorMode,
    pub bar_color: Rgb,
    pub gradient_start: Rgb,
    pub gradient_end: Rgb,
    pub background_color: Rgb,
    /// Magnitude-to-geometry gain (5 = unity)
    pub sensitivity: f32,
    /// Audio backend temporal smoothing, 0-1
    pub smoothing: f32,
    /// Fraction of the slot a bar or arc occupies, (0, 1]
    pub bar_width: f32,
    /// Pixels in manual mode, ratio in auto-scale mode
    pub bar_spacing: f32,
    /// Power of two requested from the audio backend
    pub fft_size: usize,
    pub frequency_scaling: FrequencyScaling,
    /// Bass reduction, 0-100
    pub bass_boost: f32,
    pub high_boost: f32,
    pub vocal_enhance: f32,
    pub frequency_separation: f32,
    pub mirrored_mode: MirroredMode,
    pub auto_scale: bool,
}

impl Default for VisualizationSettings {
    fn default() -> Self {
        Self {
            visualization_type: VisualizationType::Bars,
            color_mode: ColorMode::Gradient,
            bar_color: Rgb::new(0x00, 0xff, 0xff),
            gradient_start: Rgb::new(0xff, 0x00, 0x00),
            gradient_end: Rgb::new(0x00, 0x00, 0xff),
            background_color: Rgb::BLACK,
            sensitivity: 5.0,
            smoothing: 0.8,
            bar_width: 0.5,
            bar_spacing: 1.0,
            fft_size: 256,
            frequency_scaling: FrequencyScaling::Logarithmic,
            bass_boost: 0.0,
            high_boost: 0.0,
            vocal_enhance: 0.0,
            frequency_separation: 0.0,
            mirrored_mode: MirroredMode::Mirrored,
            auto_scale: true,
        }
    }
}

impl VisualizationSettings {
    /// Number of frequency bins the backend produces for `fft_size`
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

/// Particle behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    /// Drifting dots that wrap at the edges
    #[default]
    Particles,
    /// Stationary dots, usually paired with connecting lines
    Lines,
    /// Rising bubbles that grow, shrink and respawn
    Bubbles,
    /// Drift behaviour, kept as its own option for presets
    Mixed,
}

impl ParticleKind {
    pub fn next(self) -> Self {
        match self {
            Self::Particles => Self::Lines,
            Self::Lines => Self::Bubbles,
            Self::Bubbles => Self::Mixed,
            Self::Mixed => Self::Particles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub enabled: bool,
    pub kind: ParticleKind,
    pub count: usize,
    /// Upper bound of the random base size (plus one pixel)
    pub size: f32,
    pub speed: f32,
    /// Audio reactivity, 0-10
    pub reactivity: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub fade_speed: f32,
    pub connect_lines: bool,
    pub line_threshold: f32,
    /// Follow the visualization colors instead of `color`
    pub color_sync: bool,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: ParticleKind::Particles,
            count: 100,
            size: 3.0,
            speed: 1.0,
            reactivity: 5.0,
            color: Rgb::WHITE,
            opacity: 0.7,
            fade_speed: 0.02,
            connect_lines: false,
            line_threshold: 100.0,
            color_sync: true,
        }
    }
}
