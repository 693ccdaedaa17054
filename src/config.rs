//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/volkey/config.json`, or the path passed with
//! `--config <path>`.  It names the tools and paths volkey uses and is
//! built once at startup.
//!
//! # Example
//!
//! ```json
//! {
//!   "backend": "pulsemixer",
//!   "mixer_binary": "pulsemixer",
//!   "max_volume": 100,
//!   "step": 5,
//!   "notifier_binary": "dunstify",
//!   "notifier_args": ["-u", "low", "-h", "string:x-dunst-stack-tag:volkey"],
//!   "icon_directory": "/usr/share/archcraft/icons/dunst",
//!   "toggle_labels": "legacy",
//!   "log_sink": { "file": "/tmp/volkey.log" }
//! }
//! ```

use crate::controller::ToggleLabels;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which mixer tool drives the audio state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `pulsemixer`, acting on the default PulseAudio/PipeWire sink.
    #[default]
    Pulsemixer,
    /// ALSA `amixer`, with card and control discovery.
    Amixer,
}

impl BackendKind {
    /// Binary name used when `mixer_binary` is not configured.
    pub fn default_binary(&self) -> &'static str {
        match self {
            BackendKind::Pulsemixer => "pulsemixer",
            BackendKind::Amixer => "amixer",
        }
    }
}

/// Where log records go.
///
/// On the wire: `"stderr"` or `{ "file": "/path/to/log" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSink {
    #[default]
    Stderr,
    /// Append to this file.
    File(PathBuf),
}

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all fields
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    /// Mixer executable.  Defaults to the backend's own tool name.
    pub mixer_binary: Option<String>,
    /// Upper bound for volume changes.  Backends cap it at 100.
    pub max_volume: u8,
    /// Percentage applied by the increase/decrease hotkeys.
    pub step: u8,
    /// Simple-control names the `amixer` backend may pick, in order of
    /// increasing preference.
    pub available_controls: Vec<String>,
    pub notifier_binary: String,
    /// Arguments placed before `-i <icon> <text>`.
    pub notifier_args: Vec<String>,
    /// Directory holding `volume-{mute,low,mid,high}.png`.
    pub icon_directory: PathBuf,
    pub toggle_labels: ToggleLabels,
    pub log_sink: LogSink,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            mixer_binary: None,
            max_volume: 100,
            step: 5,
            available_controls: vec!["Master".into(), "Speaker".into()],
            notifier_binary: "dunstify".into(),
            notifier_args: vec![
                "-u".into(),
                "low".into(),
                "-h".into(),
                "string:x-dunst-stack-tag:volkey".into(),
            ],
            icon_directory: PathBuf::from("/usr/share/archcraft/icons/dunst"),
            toggle_labels: ToggleLabels::default(),
            log_sink: LogSink::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// The mixer executable to run.
    pub fn mixer_binary(&self) -> &str {
        self.mixer_binary
            .as_deref()
            .unwrap_or_else(|| self.backend.default_binary())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
