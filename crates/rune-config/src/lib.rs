//! Rune transition configuration system
//!
//! This crate provides centralized configuration for the transition engine and
//! its headless driver, loading settings from `rune.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid configuration TOML.
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RuneConfig {
    /// Defaults applied when a style omits transition directives
    pub transition: TransitionDefaults,
    /// Development diagnostics settings
    pub diagnostics: DiagnosticsConfig,
    /// Headless driver settings
    pub demo: DemoConfig,
}

/// Fallback timing used when `transitionDelay` / `transitionDuration` are not numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionDefaults {
    /// Delay before a transition starts, in milliseconds (default: 0)
    pub delay_ms: f32,
    /// Transition duration in milliseconds (default: 16)
    pub duration_ms: f32,
}

/// Diagnostics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Force advisory warnings on or off. Unset follows the build profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Headless driver configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated frame interval in milliseconds
    pub frame_ms: f32,
    /// Script to replay when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
}

impl Default for TransitionDefaults {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms: 16.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16.0,
            script: None,
        }
    }
}

impl DiagnosticsConfig {
    /// Whether diagnostics should be emitted.
    ///
    /// Without an explicit setting, debug builds warn and release builds stay silent.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(cfg!(debug_assertions))
    }
}

impl RuneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the rune.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("rune.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Some(delay) = env_f32("RUNE_TRANSITION_DELAY") {
            self.transition.delay_ms = delay;
        }
        if let Some(duration) = env_f32("RUNE_TRANSITION_DURATION") {
            self.transition.duration_ms = duration;
        }
        if let Ok(val) = std::env::var("RUNE_DIAGNOSTICS") {
            self.diagnostics.enabled = Some(val == "1" || val.eq_ignore_ascii_case("true"));
        }
        if let Some(frame) = env_f32("RUNE_FRAME_MS") {
            self.demo.frame_ms = frame;
        }
        if let Ok(path) = std::env::var("RUNE_DEMO_SCRIPT") {
            self.demo.script = Some(PathBuf::from(path));
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_f32(name: &str) -> Option<f32> {
    std::env::var(name).ok()?.trim().parse::<f32>().ok()
}
