//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod edit;
pub mod fmt;
pub mod init;
pub mod parse;
pub mod record;
mod shared;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Check(input) => check::run(ctx, &input),
        Commands::Fmt(cmd) => fmt::run(ctx, &cmd),
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Edit(cmd) => edit::run(ctx, &cmd),
        Commands::Record { what } => record::run(ctx, &what),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
