//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CursorcastError, CursorcastResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prediction kernel settings.
    pub predictor: PredictorConfig,

    /// Where live pointer samples come from.
    pub source: SourceConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Settings for the prediction kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Resampling grid in milliseconds. `0` disables resampling.
    pub sample_interval_ms: u32,

    /// A gap longer than this (ms) between two samples starts a new stroke.
    pub pause_threshold_ms: u32,

    /// Number of best-matching templates averaged into one prediction.
    pub k: usize,

    /// Location of the template library.
    pub template_source: PathBuf,
}

/// Event-source selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Relative pointer device (PS/2 packet protocol).
    Mice { device: PathBuf },

    /// Pre-recorded JSONL pointer event log.
    Replay { path: PathBuf },
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cursorcast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 10,
            pause_threshold_ms: 50,
            k: 5,
            template_source: PathBuf::from("./mpredict-templates.json"),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Mice {
            device: PathBuf::from("/dev/input/mice"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PredictorConfig {
    /// Reject settings the kernel cannot run with.
    pub fn validate(&self) -> CursorcastResult<()> {
        if self.k == 0 {
            return Err(CursorcastError::config(
                "k must be at least 1 (number of templates averaged per prediction)",
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cursorcast").join("config.json")
}
