//! Responder configuration.
//!
//! Holds the defaults applied to requests that omit query parameters and the
//! limits used to reject oversized requests. Loaded once at cold start from an
//! optional `config.toml`; a missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [defaults]
//! width = 512               # Used when `w` is absent
//! height = 256              # Used when `h` is absent
//! noise_min = 0             # Used when `min` is absent (0-255)
//! noise_max = 255           # Used when `max` is absent (0-255)
//! accept = "image/jpeg"     # Used when the Accept header is absent
//!
//! [limits]
//! max_width = 4096          # Largest accepted `w`
//! max_height = 4096         # Largest accepted `h`
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Responder configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponderConfig {
    /// Values substituted for absent request parameters.
    pub defaults: DefaultsConfig,
    /// Upper bounds on requested dimensions.
    pub limits: LimitsConfig,
}

impl ResponderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.defaults;
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::Validation(
                "defaults.width and defaults.height must be non-zero".into(),
            ));
        }
        if d.noise_min > d.noise_max {
            return Err(ConfigError::Validation(
                "defaults.noise_min must not exceed defaults.noise_max".into(),
            ));
        }
        if d.accept.trim().is_empty() {
            return Err(ConfigError::Validation(
                "defaults.accept must not be empty".into(),
            ));
        }
        if self.limits.max_width < d.width || self.limits.max_height < d.height {
            return Err(ConfigError::Validation(
                "limits must admit the default dimensions".into(),
            ));
        }
        Ok(())
    }
}

/// Request defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub width: u32,
    pub height: u32,
    pub noise_min: u8,
    pub noise_max: u8,
    /// Accept preference list assumed when the client sends none.
    pub accept: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            noise_min: 0,
            noise_max: 255,
            accept: "image/jpeg".to_string(),
        }
    }
}

/// Dimension limits. Requests beyond these are rejected, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_width: 4096,
            max_height: 4096,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResponderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if the file is absent.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResponderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResponderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`, layered over stock defaults.
pub fn load_config(path: &Path) -> Result<ResponderConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# noise-responder configuration
# =============================
#
# Every key is optional. Values shown are the built-in defaults.

[defaults]
# Image width in pixels when the request has no `w` query parameter.
width = 512
# Image height in pixels when the request has no `h` query parameter.
height = 256
# Lower bound of generated noise intensity when `min` is absent (0-255).
noise_min = 0
# Upper bound of generated noise intensity when `max` is absent (0-255).
# Samples are drawn from [noise_min, noise_max); noise_max itself is only
# produced when both bounds are equal.
noise_max = 255
# Accept list assumed when the request carries no Accept header.
accept = "image/jpeg"

[limits]
# Requests asking for larger images are rejected with 400.
max_width = 4096
max_height = 4096
"##
}
