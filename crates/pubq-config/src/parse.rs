//! Configuration file parsing.
//!
//! Parses individual `.pubq.toml` files into [`RawConfig`] values whose fields are all
//! optional, so partial files can be merged.

use std::{fs, path::Path};

use pubq_query::Separator;
use serde::Deserialize;

use crate::error::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// `[format]` section.
    pub format: Option<RawFormatSettings>,
    /// `[input]` section.
    pub input: Option<RawInputSettings>,
    /// `[output]` section.
    pub output: Option<RawOutputSettings>,
}

/// Raw `[format]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFormatSettings {
    /// Separator placed between groups.
    pub separator: Option<Separator>,
}

/// Raw `[input]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawInputSettings {
    /// Remove Markdown code fences before parsing.
    pub strip_code_fences: Option<bool>,
    /// Salvage what can be salvaged from text that fails to parse.
    pub lenient: Option<bool>,
}

/// Raw `[output]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    /// Colorize terminal output.
    pub color: Option<bool>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string. `path` is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed; the error surfaces later when the file
/// is loaded.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
