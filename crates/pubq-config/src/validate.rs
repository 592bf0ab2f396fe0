//! Configuration validation.
//!
//! Reports settings that load fine but are unlikely to do what was meant.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Lenient recovery is on but code fences are kept, so fenced service output is salvaged
    /// term by term instead of parsed.
    LenientWithoutFenceStripping,
    /// The global config sets `root = true`, which has no effect there.
    RootInGlobalConfig {
        /// Path of the global config file.
        path: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LenientWithoutFenceStripping => write!(
                f,
                "input.lenient is enabled but input.strip_code_fences is disabled; \
                 fenced queries will only ever be recovered leniently"
            ),
            Self::RootInGlobalConfig { path } => {
                write!(f, "root = true has no effect in the global config: {path}")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.input.lenient && !config.input.strip_code_fences {
        warnings.push(ConfigWarning::LenientWithoutFenceStripping);
    }

    for source in config.sources.iter().filter(|s| s.is_global && s.root) {
        warnings.push(ConfigWarning::RootInGlobalConfig {
            path: source.path.display().to_string(),
        });
    }

    warnings
}
