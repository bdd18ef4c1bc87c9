use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quantity::{FormatStyle, NumberFormat, QuantityError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format settings: {0}")]
    Format(#[from] QuantityError),
}

/// Default rendering settings for [`Quantity::format_with`](crate::Quantity::format_with)
///
/// ```toml
/// style = "typst"
/// number_format = ".2f"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub style: FormatStyle,
    /// Python-style number spec; empty selects the magnitude rule
    pub number_format: String,
}

impl FormatConfig {
    pub fn new(style: FormatStyle, number_format: impl Into<String>) -> Self {
        Self {
            style,
            number_format: number_format.into(),
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: FormatConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: FormatConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or TOML for any other extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json_str(&source)?,
            _ => Self::from_toml_str(&source)?,
        };
        debug!(
            path = %path.display(),
            style = %config.style,
            number_format = %config.number_format,
            "loaded format config"
        );
        Ok(config)
    }

    /// Parsed number format, rejecting malformed specs.
    pub fn validate(&self) -> Result<NumberFormat, QuantityError> {
        self.number_format.parse()
    }
}
