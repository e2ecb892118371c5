//! Audio-reactive visualization core for beatscope
//!
//! Turns per-frame frequency and time-domain byte buffers into a list of
//! [`DrawCommand`]s: one of three spectrum views plus an optional particle
//! overlay. The crate never touches audio devices or windows; the frontend
//! feeds it buffers and replays the commands.

pub mod canvas;
pub mod color;
pub mod frame;
pub mod particles;
pub mod renderer;
pub mod settings;
pub mod spectrum;

pub use canvas::{Canvas, DrawCommand, Paint, Point};
pub use color::{Color, ColorError, Rgb};
pub use frame::{FrameTiming, ResizeDebouncer, Visualizer};
pub use particles::{Particle, ParticleField};
pub use renderer::FrameBuffers;
pub use settings::{
    ColorMode, FrequencyScaling, MirroredMode, ParticleKind, ParticleSettings,
    VisualizationSettings, VisualizationType,
};
