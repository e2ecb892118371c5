//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and how each one changes the settings.

use beatscope_core::{ParticleField, VisualizationSettings};
use nannou::prelude::*;

use crate::audio::{MAX_FFT_SIZE, MIN_FFT_SIZE};

const MIN_SENSITIVITY: f32 = 1.0;
const MAX_SENSITIVITY: f32 = 20.0;
const SMOOTHING_STEP: f32 = 0.1;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,

    // View
    CycleVisualization,
    CycleColorMode,
    CycleScaling,
    CycleMirroredMode,
    ToggleAutoScale,
    SensitivityUp,
    SensitivityDown,

    // Analyser
    FftSizeUp,
    FftSizeDown,
    SmoothingUp,
    SmoothingDown,

    // Particles
    ToggleParticles,
    CycleParticleKind,
    ToggleConnectLines,
}

/// Key legend logged at startup
pub const KEY_MAP: &[(&str, &str)] = &[
    ("Q", "quit"),
    ("V / Space", "cycle visualization"),
    ("C", "cycle color mode"),
    ("F", "cycle frequency scaling"),
    ("M", "cycle mirrored mode"),
    ("A", "toggle auto-scale"),
    ("Up / Down", "sensitivity"),
    ("Right / Left", "FFT size"),
    ("] / [", "smoothing"),
    ("P", "toggle particles"),
    ("T", "cycle particle kind"),
    ("L", "toggle connecting lines"),
];

pub fn log_key_map() {
    tracing::info!("Keys:");
    for (keys, action) in KEY_MAP {
        tracing::info!("  {:<14} {}", keys, action);
    }
}

pub fn parse_key(key: Key) -> Option<Action> {
    match key {
        Key::Q => Some(Action::Quit),
        Key::V | Key::Space => Some(Action::CycleVisualization),
        Key::C => Some(Action::CycleColorMode),
        Key::F => Some(Action::CycleScaling),
        Key::M => Some(Action::CycleMirroredMode),
        Key::A => Some(Action::ToggleAutoScale),
        Key::Up => Some(Action::SensitivityUp),
        Key::Down => Some(Action::SensitivityDown),
        Key::Right => Some(Action::FftSizeUp),
        Key::Left => Some(Action::FftSizeDown),
        Key::RBracket => Some(Action::SmoothingUp),
        Key::LBracket => Some(Action::SmoothingDown),
        Key::P => Some(Action::ToggleParticles),
        Key::T => Some(Action::CycleParticleKind),
        Key::L => Some(Action::ToggleConnectLines),
        _ => None,
    }
}

fn step_smoothing(smoothing: f32, delta: f32) -> f32 {
    // Snap to one decimal so repeated steps don't drift
    (((smoothing + delta) * 10.0).round() / 10.0).clamp(0.0, 1.0)
}

/// Apply `action` to the settings and particle field.
///
/// `Quit` is left to the caller. Analyser-facing values (FFT size,
/// smoothing) only change here; the caller reconfigures the backend.
pub fn apply_action(
    action: Action,
    settings: &mut VisualizationSettings,
    particles: &mut ParticleField,
) {
    match action {
        Action::Quit => {}
        Action::CycleVisualization => {
            settings.visualization_type = settings.visualization_type.next();
            tracing::info!("Visualization: {:?}", settings.visualization_type);
        }
        Action::CycleColorMode => {
            settings.color_mode = settings.color_mode.next();
            tracing::info!("Color mode: {:?}", settings.color_mode);
        }
        Action::CycleScaling => {
            settings.frequency_scaling = settings.frequency_scaling.next();
            tracing::info!("Frequency scaling: {:?}", settings.frequency_scaling);
        }
        Action::CycleMirroredMode => {
            settings.mirrored_mode = settings.mirrored_mode.next();
            tracing::info!("Mirrored mode: {:?}", settings.mirrored_mode);
        }
        Action::ToggleAutoScale => {
            settings.auto_scale = !settings.auto_scale;
            tracing::info!("Auto-scale: {}", settings.auto_scale);
        }
        Action::SensitivityUp | Action::SensitivityDown => {
            let delta = if action == Action::SensitivityUp { 1.0 } else { -1.0 };
            settings.sensitivity =
                (settings.sensitivity + delta).clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
            tracing::info!("Sensitivity: {}", settings.sensitivity);
        }
        Action::FftSizeUp => {
            settings.fft_size = (settings.fft_size * 2).min(MAX_FFT_SIZE);
        }
        Action::FftSizeDown => {
            settings.fft_size = (settings.fft_size / 2).max(MIN_FFT_SIZE);
        }
        Action::SmoothingUp => {
            settings.smoothing = step_smoothing(settings.smoothing, SMOOTHING_STEP);
        }
        Action::SmoothingDown => {
            settings.smoothing = step_smoothing(settings.smoothing, -SMOOTHING_STEP);
        }
        Action::ToggleParticles => {
            let enabled = particles.toggle_enabled();
            tracing::info!("Particles: {}", if enabled { "on" } else { "off" });
        }
        Action::CycleParticleKind => {
            let kind = particles.settings().kind.next();
            particles.set_kind(kind);
            tracing::info!("Particle kind: {:?}", kind);
        }
        Action::ToggleConnectLines => {
            let connect = !particles.settings().connect_lines;
            particles.set_connect_lines(connect);
            tracing::info!("Connecting lines: {}", connect);
        }
    }
}
