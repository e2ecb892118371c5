mod audio;
mod surface;
mod ui;
mod utils;

use audio::{FrequencyAnalyser, SourcePipe};
use beatscope_core::{
    DrawCommand, FrameBuffers, FrameTiming, ResizeDebouncer, VisualizationSettings, Visualizer,
};
use nannou::prelude::*;
use std::env;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;
use ui::bindings::{apply_action, log_key_map, parse_key, Action};
use utils::{Config, ConfigWatcher};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--list-devices".to_string()) {
        SourcePipe::list_devices();
        return;
    }

    nannou::app(model).update(update).run();
}

struct Model {
    source: SourcePipe,
    device: Option<String>,
    analyser: FrequencyAnalyser,
    visualizer: Visualizer,
    settings: VisualizationSettings,
    watcher: Option<ConfigWatcher>,
    resize: ResizeDebouncer,
    /// Commands produced by the last update, replayed by `view`
    commands: Vec<DrawCommand>,
}

fn model(app: &App) -> Model {
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("beatscope")
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .view(view)
        .key_pressed(key_pressed)
        .resized(resized)
        .build()
        .expect("failed to create window");

    let (width, height) = app
        .window(window_id)
        .map(|w| w.rect().w_h())
        .unwrap_or((WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32));

    let config = Config::load();
    let watcher = match Config::path().and_then(ConfigWatcher::new) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!("Config hot-reload disabled: {}", e);
            None
        }
    };

    let mut settings = config.visualization.clone();
    let analyser = build_analyser(&mut settings);
    let source = SourcePipe::open(config.device.as_deref(), config.device_timeout());

    log_key_map();

    Model {
        source,
        device: config.device,
        analyser,
        visualizer: Visualizer::new(width, height, config.particles),
        settings,
        watcher,
        resize: ResizeDebouncer::default(),
        commands: Vec::new(),
    }
}

/// Analyser for `settings`, resetting invalid FFT size or smoothing to defaults
fn build_analyser(settings: &mut VisualizationSettings) -> FrequencyAnalyser {
    match FrequencyAnalyser::new(settings.fft_size, settings.smoothing) {
        Ok(analyser) => analyser,
        Err(e) => {
            tracing::warn!("{}, using defaults", e);
            let analyser = FrequencyAnalyser::default();
            settings.fft_size = analyser.fft_size();
            settings.smoothing = analyser.smoothing();
            analyser
        }
    }
}

/// Push FFT size and smoothing changes to the analyser, reverting the
/// settings on rejection
fn sync_analyser(model: &mut Model) {
    if model.settings.fft_size != model.analyser.fft_size() {
        if let Err(e) = model.analyser.set_fft_size(model.settings.fft_size) {
            tracing::warn!("{}", e);
            model.settings.fft_size = model.analyser.fft_size();
        }
    }
    if model.settings.smoothing != model.analyser.smoothing() {
        if let Err(e) = model.analyser.set_smoothing(model.settings.smoothing) {
            tracing::warn!("{}", e);
            model.settings.smoothing = model.analyser.smoothing();
        }
    }
}

fn apply_config(model: &mut Model, config: Config) {
    if config.device != model.device {
        model.source = SourcePipe::open(config.device.as_deref(), config.device_timeout());
        model.device = config.device.clone();
    }
    model.settings = config.visualization;
    model
        .visualizer
        .particles_mut()
        .apply_settings(&config.particles);
    sync_analyser(model);
}

fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

fn update(_app: &App, model: &mut Model, update: Update) {
    if let Some((width, height)) = model.resize.poll(Instant::now()) {
        model.visualizer.resize(width, height);
    }

    if let Some(config) = model.watcher.as_ref().and_then(ConfigWatcher::poll) {
        apply_config(model, config);
    }

    let samples = model.source.samples(model.analyser.fft_size());
    model.analyser.process(&samples);

    let buffers = FrameBuffers {
        frequency: model.analyser.byte_frequency_data(),
        time_domain: model.analyser.byte_time_domain_data(),
    };
    let timing = FrameTiming::from_elapsed(update.since_last, wall_clock_ms());
    model.commands = model
        .visualizer
        .render_frame(&model.settings, buffers, timing);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    surface::paint(&draw, app.window_rect(), &model.commands);
    if let Err(e) = draw.to_frame(app, &frame) {
        tracing::error!("Failed to render frame: {:?}", e);
    }
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.resize.notify((size.x, size.y), Instant::now());
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match parse_key(key) {
        Some(Action::Quit) => app.quit(),
        Some(action) => {
            apply_action(action, &mut model.settings, model.visualizer.particles_mut());
            sync_analyser(model);
        }
        None => {}
    }
}
