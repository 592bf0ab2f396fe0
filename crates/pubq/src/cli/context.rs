//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use pubq_config::Config;
use pubq_session::{InputOptions, Session};

use crate::cli::output::Painter;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (defaults if no config files were found).
    pub config: Config,
    /// Styling for stdout.
    pub painter: Painter,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load(no_color: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        let painter = Painter::new(use_color(&config, no_color));
        Ok(Self {
            cwd,
            config,
            painter,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which must work even when an existing config file is invalid.
    pub fn load_cwd_only(no_color: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = Config::default();
        let painter = Painter::new(use_color(&config, no_color));
        Ok(Self {
            cwd,
            config,
            painter,
        })
    }

    /// Input options for sessions, from `[input]`. `lenient` forces lenient recovery on.
    pub fn input_options(&self, lenient: bool) -> InputOptions {
        InputOptions {
            strip_code_fences: self.config.input.strip_code_fences,
            lenient: lenient || self.config.input.lenient,
        }
    }

    /// Starts a session with the configured input options.
    pub fn session(&self, lenient: bool) -> Session {
        Session::with_options(self.input_options(lenient))
    }
}

/// Colors are used when enabled in config, not disabled on the command line, and stdout is a
/// terminal.
fn use_color(config: &Config, no_color: bool) -> bool {
    config.output.color && !no_color && io::stdout().is_terminal()
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
