//! Plugin configuration.
//!
//! Handles loading and validating the plugin's settings. Every key is
//! optional; whatever is not one of the plugin's own keys is handed to the
//! selected algorithm as its options and checked against that algorithm's
//! schema.
//!
//! ## Config File Location
//!
//! [`load_config`] looks for `blurhash.toml` in a directory. Hosts that keep
//! their settings elsewhere can build [`PluginConfig`] from any serde source
//! ([`PluginConfig::from_toml_str`], [`PluginConfig::from_json`]).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # collections = ["media"]  # Omit to target every upload collection
//! mimeTypePattern = "image/*"
//! algorithm = "blurhash"     # or "thumbhash"
//!
//! # blurhash options (thumbhash takes none)
//! width = 32
//! height = 32
//! componentX = 3
//! componentY = 3
//! ```
//!
//! Keys the selected algorithm does not know are ignored, with a warning
//! naming them at validation time.

use crate::algorithms::{AlgorithmName, PlaceholderError, RawOptions, Registry};
use crate::mime::{DEFAULT_MIME_PATTERN, MimePattern, PatternError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name [`load_config`] looks for.
pub const CONFIG_FILE_NAME: &str = "blurhash.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid mimeTypePattern: {0}")]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Algorithm(#[from] PlaceholderError),
}

/// Plugin configuration as supplied by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Collection slugs to target. `None` targets every upload collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,
    /// Glob matched against each record's `mimeType`.
    #[serde(default = "default_mime_type_pattern")]
    pub mime_type_pattern: String,
    /// Registered algorithm name. `None` selects the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Everything else: options for the selected algorithm.
    #[serde(flatten)]
    pub options: RawOptions,
}

fn default_mime_type_pattern() -> String {
    DEFAULT_MIME_PATTERN.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            collections: None,
            mime_type_pattern: default_mime_type_pattern(),
            algorithm: None,
            options: RawOptions::new(),
        }
    }
}

/// A configuration that passed [`PluginConfig::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub collections: Option<Vec<String>>,
    pub mime_pattern: MimePattern,
    pub algorithm: AlgorithmName,
    pub options: RawOptions,
}

impl PluginConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Compile the MIME glob, resolve the algorithm and check its options
    /// against `registry`.
    pub fn validate(&self, registry: &Registry) -> Result<ValidatedConfig, ConfigError> {
        let mime_pattern = MimePattern::new(&self.mime_type_pattern)?;
        let algorithm = registry.check(self.algorithm.as_deref(), &self.options)?;
        Ok(ValidatedConfig {
            collections: self.collections.clone(),
            mime_pattern,
            algorithm,
            options: self.options.clone(),
        })
    }
}

/// Load `blurhash.toml` from the given directory.
///
/// A missing file yields the defaults. The result is parsed but not
/// validated; plugin construction validates.
pub fn load_config(dir: &Path) -> Result<PluginConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(PluginConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    PluginConfig::from_toml_str(&content)
}

/// Returns a fully-commented stock `blurhash.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Upload placeholder configuration
# ================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.

# Collection slugs to add placeholders to. Omit to target every collection
# that accepts uploads. Collections without upload support are never touched.
# collections = ["media"]

# Glob matched against each upload's MIME type. Supports *, ?, [...], {a,b}.
mimeTypePattern = "image/*"

# Placeholder algorithm: "blurhash" (default) or "thumbhash".
algorithm = "blurhash"

# ---------------------------------------------------------------------------
# blurhash options (thumbhash takes none and ignores these)
# ---------------------------------------------------------------------------
# Size of the grid the upload is resized to before encoding.
width = 32
height = 32

# Number of horizontal/vertical components (1-9). More = more detail,
# longer string.
componentX = 3
componentY = 3
"##
}
