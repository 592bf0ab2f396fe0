//! Implementation of `pubq parse`.

use std::process::ExitCode;

use crate::cli::{
    args::ParseCommand,
    commands::shared::load_session,
    context::CommandContext,
    output::{groups_table, print_json},
};

/// Shows the concept groups of a query.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let session = match load_session(ctx, cmd.input.query.as_deref(), false, false) {
        Ok(session) => session,
        Err(code) => return code,
    };

    if cmd.json {
        return print_json(session.query());
    }

    println!("{}", groups_table(session.query()));
    ExitCode::SUCCESS
}
