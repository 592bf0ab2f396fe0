//! Configuration file discovery.
//!
//! Walks up from a starting directory collecting `.pubq.toml` files, then appends the global
//! `~/.pubq.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::{error::ConfigError, parse::is_root_config};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".pubq.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global last. Discovery stops at
/// the first file with `root = true`, in which case the global file is not consulted either.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    debug!(count = configs.len(), root = found_root, "discovered config files");
    configs
}

/// Returns the path to the global configuration file (`~/.pubq.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Like [`global_config_path`], but reports a missing home directory as an error.
pub fn require_global_config_path() -> Result<PathBuf, ConfigError> {
    global_config_path().ok_or(ConfigError::NoHomeDirectory)
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    fn local(configs: &[PathBuf]) -> Vec<&PathBuf> {
        configs.iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn no_configs() {
        let dir = TestDir::new();
        let sub = dir.create_dir("a/b/c");
        assert!(local(&discover_config_files(&sub)).is_empty());
    }

    #[test]
    fn closest_first() {
        let dir = TestDir::new();
        let top = dir.create_config_at_root();
        let mid = dir.create_config("a/b");
        let leaf = dir.create_config("a/b/c");
        let cwd = dir.create_dir("a/b/c/d");

        let configs = discover_config_files(&cwd);
        assert_eq!(local(&configs), vec![&leaf, &mid, &top]);
    }

    #[test]
    fn directory_named_like_config_is_skipped() {
        let dir = TestDir::new();
        fs::create_dir_all(dir.path().join(CONFIG_FILENAME)).unwrap();
        let sub = dir.create_dir("sub");
        assert!(local(&discover_config_files(&sub)).is_empty());
    }

    #[test]
    fn root_config_stops_discovery() {
        let dir = TestDir::new();
        dir.create_config_at_root();
        let root = dir.create_root_config("project");
        let child = dir.create_config("project/sub");
        let cwd = dir.create_dir("project/sub/deep");

        assert_eq!(discover_config_files(&cwd), vec![child, root]);
    }

    #[test]
    fn root_false_does_not_stop_discovery() {
        let dir = TestDir::new();
        let top = dir.create_config_at_root();
        let mid = dir.create_config_with_content("project", "root = false\n");
        let cwd = dir.create_dir("project/src");

        let configs = discover_config_files(&cwd);
        assert_eq!(local(&configs), vec![&mid, &top]);
    }

    #[test]
    fn global_path_uses_config_filename() {
        let path = require_global_config_path().unwrap();
        assert!(path.ends_with(CONFIG_FILENAME));
        assert!(is_global_config(&path));
        assert!(!is_global_config(Path::new("/elsewhere/.pubq.toml")));
    }
}
