//! Calculator configuration.
//!
//! Loaded from `~/.config/splitcalc/config.toml` when present:
//!
//! ```toml
//! max_digits = 14
//! thousands_separator = true
//! touch_threshold = 10.0
//! ```
//!
//! Every field is optional and falls back to its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default ceiling on digits per number. Keeps values inside the range an
/// `f64` represents exactly.
pub const DEFAULT_MAX_DIGITS: usize = 14;

/// Largest digit ceiling that still round-trips through `f64`.
pub const MAX_SUPPORTED_DIGITS: usize = 15;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Maximum number of digits in a typed number or a result.
    pub max_digits: usize,
    /// Group the integer part of previews with `,`.
    pub thousands_separator: bool,
    /// Maximum pointer travel, in pixels, for a touch to count as a tap.
    pub touch_threshold: f32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_digits: DEFAULT_MAX_DIGITS,
            thousands_separator: true,
            touch_threshold: 10.0,
        }
    }
}

impl CalculatorConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("splitcalc").join("config.toml"))
    }

    /// Load from the default location, using defaults if there is no file.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No calculator config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "Loaded calculator config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_SUPPORTED_DIGITS).contains(&self.max_digits) {
            anyhow::bail!(
                "max_digits must be between 1 and {}, got {}",
                MAX_SUPPORTED_DIGITS,
                self.max_digits
            );
        }
        if !self.touch_threshold.is_finite() || self.touch_threshold < 0.0 {
            anyhow::bail!("touch_threshold must be a non-negative number");
        }
        Ok(())
    }
}
