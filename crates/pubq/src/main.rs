//! Command-line interface for `pubq`.

use std::{io, process::ExitCode};

use pubq::cli::{
    args::{Commands, parse_cli},
    commands,
    context::CommandContext,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(cli.no_color),
        _ => CommandContext::load(cli.no_color),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    debug!(cwd = %ctx.cwd.display(), sources = ctx.config.sources.len(), "loaded context");

    commands::run(cli.command, &ctx)
}

/// Installs the log subscriber on stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
