//! Configuration file management.
//!
//! Loads `~/.beatscope.toml`, writing a commented template on first run, and
//! watches it so edits apply to the running visualizer.

use beatscope_core::{ParticleSettings, VisualizationSettings};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use thiserror::Error;

const FILE_NAME: &str = ".beatscope.toml";
const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;

pub const CONFIG_TEMPLATE: &str = r##"# beatscope configuration file
# Changes are applied while the visualizer runs.

# Input device name (default: system default input)
# device = "Device Name"

# Timeout in seconds when opening the audio device (default: 3)
# device_timeout_secs = 3

[visualization]
# visualization_type = "bars"      # bars | wave | circular
# color_mode = "gradient"          # solid | gradient | rainbow
# bar_color = "#00ffff"
# gradient_start = "#ff0000"
# gradient_end = "#0000ff"
# background_color = "#000000"
# sensitivity = 5.0                # 1-20, 5 = unity gain
# smoothing = 0.8                  # 0-1
# bar_width = 0.5                  # fraction of each slot
# bar_spacing = 1.0
# fft_size = 256                   # power of two, 32-32768
# frequency_scaling = "logarithmic" # linear | logarithmic | exponential
# bass_boost = 0.0                 # 0-100, reduces low bins
# high_boost = 0.0                 # 0-100
# vocal_enhance = 0.0              # 0-100
# frequency_separation = 0.0       # 0-100
# mirrored_mode = "mirrored"       # mirrored | top | bottom
# auto_scale = true

[particles]
# enabled = true
# kind = "particles"               # particles | lines | bubbles | mixed
# count = 100
# size = 3.0
# speed = 1.0
# reactivity = 5.0                 # 0-10
# color = "#ffffff"
# opacity = 0.7
# fade_speed = 0.02
# connect_lines = false
# line_threshold = 100.0
# color_sync = true
"##;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not locate home directory")]
    NoHomeDir,
    #[error("Could not watch config: {0}")]
    Watch(#[from] notify::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: Option<String>,
    pub device_timeout_secs: Option<u64>,
    pub visualization: VisualizationSettings,
    pub particles: ParticleSettings,
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|h| h.join(FILE_NAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read `path`, creating it from the template when missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            fs::write(path, CONFIG_TEMPLATE)?;
            tracing::info!("Created config template at {:?}", path);
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Load the user config, falling back to defaults on any error
    pub fn load() -> Self {
        match Self::path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(
            self.device_timeout_secs
                .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS),
        )
    }
}

/// Reloads the config file whenever it changes on disk
pub struct ConfigWatcher {
    path: PathBuf,
    events: Receiver<notify::Result<Event>>,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;

        // Editors often replace the file, so watch its directory
        let dir = path.parent().unwrap_or(Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching {:?} for changes", path);

        Ok(Self {
            path,
            events,
            _watcher: watcher,
        })
    }

    fn touches_config(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_)
        ) && event
            .paths
            .iter()
            .any(|p| p.file_name() == self.path.file_name())
    }

    /// Drain pending events; the re-read config if the file changed.
    ///
    /// A file that fails to parse is reported and ignored.
    pub fn poll(&self) -> Option<Config> {
        let mut changed = false;
        while let Ok(res) = self.events.try_recv() {
            match res {
                Ok(event) => changed |= self.touches_config(&event),
                Err(e) => tracing::warn!("Config watch error: {}", e),
            }
        }
        if !changed {
            return None;
        }

        match fs::read_to_string(&self.path)
            .map_err(ConfigError::from)
            .and_then(|s| Config::parse(&s))
        {
            Ok(config) => {
                tracing::info!("Reloaded {:?}", self.path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Ignoring config change: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatscope_core::{ColorMode, ParticleKind, Rgb, VisualizationType};

    #[test]
    fn test_template_parses_to_defaults() {
        assert_eq!(Config::parse(CONFIG_TEMPLATE).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = Config::parse(
            r##"
device = "USB Mic"

[visualization]
visualization_type = "circular"
color_mode = "rainbow"
bar_color = "#ff8800"
fft_size = 1024

[particles]
kind = "bubbles"
count = 40
"##,
        )
        .unwrap();

        assert_eq!(config.device.as_deref(), Some("USB Mic"));
        assert_eq!(config.visualization.visualization_type, VisualizationType::Circular);
        assert_eq!(config.visualization.color_mode, ColorMode::Rainbow);
        assert_eq!(config.visualization.bar_color, Rgb::new(0xff, 0x88, 0x00));
        assert_eq!(config.visualization.fft_size, 1024);
        assert_eq!(config.visualization.sensitivity, 5.0);
        assert_eq!(config.particles.kind, ParticleKind::Bubbles);
        assert_eq!(config.particles.count, 40);
        assert!(config.particles.enabled);
        assert_eq!(config.device_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(matches!(
            Config::parse("[visualization]\nvisualization_type = \"spiral\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("[particles]\ncount = -3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_writes_template() {
        let dir = std::env::temp_dir().join(format!("beatscope-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(FILE_NAME);
        let _ = fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);

        fs::remove_dir_all(&dir).unwrap();
    }
}
