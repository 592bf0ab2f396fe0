//! Configuration system for pubq.
//!
//! pubq reads TOML files named `.pubq.toml`. Configuration is resolved by walking up the
//! directory tree from the working directory, collecting every `.pubq.toml` found until one
//! sets `root = true`, then loading `~/.pubq.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{
    CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config,
    require_global_config_path,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawFormatSettings, RawInputSettings, RawOutputSettings, parse_config_file,
    parse_config_str,
};
use pubq_query::Separator;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Fully merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output layout settings.
    pub format: FormatSettings,
    /// Input handling settings.
    pub input: InputSettings,
    /// Terminal output settings.
    pub output: OutputSettings,
    /// Directory containing the closest local config file.
    pub config_root: Option<PathBuf>,
    /// Files that contributed, highest precedence first.
    pub sources: Vec<ConfigSource>,
}

impl Config {
    /// Discovers and merges all `.pubq.toml` files relevant to `cwd`.
    ///
    /// Returns defaults if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from an explicit list of files, highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings in `.pubq.toml` format.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            format: self.format.clone(),
            input: self.input.clone(),
            output: self.output.clone(),
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// A config file that contributed to the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Path to the file.
    pub path: PathBuf,
    /// Whether this is `~/.pubq.toml`.
    pub is_global: bool,
    /// Whether the file sets `root = true`.
    pub root: bool,
}

/// `[format]` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Separator placed between groups when printing a query.
    pub separator: Separator,
}

/// `[input]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputSettings {
    /// Remove Markdown code fences before parsing.
    pub strip_code_fences: bool,
    /// Fall back to lenient recovery when a query fails to parse.
    pub lenient: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            strip_code_fences: true,
            lenient: false,
        }
    }
}

/// `[output]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Colorize terminal output.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Output layout settings.
    format: FormatSettings,
    /// Input handling settings.
    input: InputSettings,
    /// Terminal output settings.
    output: OutputSettings,
}
