//! Configuration merging.
//!
//! Merges parsed config files into a single [`Config`]. Files arrive highest precedence first;
//! every scalar takes the value from the closest file that sets it.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    Config, ConfigSource, FormatSettings, InputSettings, OutputSettings,
    discovery::is_global_config,
    parse::{RawConfig, RawFormatSettings, RawInputSettings, RawOutputSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files, highest precedence first, into a single [`Config`].
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut format = FormatSettings::default();
    let mut input = InputSettings::default();
    let mut output = OutputSettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.format {
            apply_raw_format(&mut format, raw);
        }
        if let Some(ref raw) = parsed.config.input {
            apply_raw_input(&mut input, raw);
        }
        if let Some(ref raw) = parsed.config.output {
            apply_raw_output(&mut output, raw);
        }
    }

    let config_root = configs
        .iter()
        .find(|c| !is_global_config(&c.path))
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    let sources = configs
        .iter()
        .map(|c| ConfigSource {
            path: c.path.clone(),
            is_global: is_global_config(&c.path),
            root: c.config.root == Some(true),
        })
        .collect();

    debug!(files = configs.len(), "merged configuration");

    Config {
        format,
        input,
        output,
        config_root,
        sources,
    }
}

/// Applies raw `[format]` settings, overwriting any present values.
fn apply_raw_format(result: &mut FormatSettings, raw: &RawFormatSettings) {
    if let Some(v) = raw.separator {
        result.separator = v;
    }
}

/// Applies raw `[input]` settings.
fn apply_raw_input(result: &mut InputSettings, raw: &RawInputSettings) {
    if let Some(v) = raw.strip_code_fences {
        result.strip_code_fences = v;
    }
    if let Some(v) = raw.lenient {
        result.lenient = v;
    }
}

/// Applies raw `[output]` settings.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.color {
        result.color = v;
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pubq_query::Separator;

    use super::*;
    use crate::{parse::parse_config_str, test_support::TestDir};

    fn parsed(path: &Path, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: path.to_path_buf(),
            config: parse_config_str(toml, path).unwrap(),
        }
    }

    #[test]
    fn empty_list_gives_defaults() {
        let config = merge_configs(&[]);
        assert_eq!(config.format.separator, Separator::BlankLines);
        assert!(config.input.strip_code_fences);
        assert!(!config.input.lenient);
        assert!(config.output.color);
        assert!(config.config_root.is_none());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn closest_file_wins_per_scalar() {
        let dir = TestDir::new();
        let near = dir.path().join("near/.pubq.toml");
        let far = dir.path().join(".pubq.toml");

        let config = merge_configs(&[
            parsed(&near, "[input]\nlenient = true\n"),
            parsed(
                &far,
                "[input]\nlenient = false\nstrip_code_fences = false\n[format]\nseparator = \"inline\"\n",
            ),
        ]);

        assert!(config.input.lenient);
        assert!(!config.input.strip_code_fences);
        assert_eq!(config.format.separator, Separator::Inline);
        assert_eq!(config.config_root.as_deref(), Some(dir.path().join("near").as_path()));
    }

    #[test]
    fn sources_record_root_flag() {
        let dir = TestDir::new();
        let path = dir.path().join(".pubq.toml");
        let config = merge_configs(&[parsed(&path, "root = true\n")]);

        assert_eq!(config.sources.len(), 1);
        assert!(config.sources[0].root);
        assert!(!config.sources[0].is_global);
    }
}
