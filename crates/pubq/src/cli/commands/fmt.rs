//! Implementation of `pubq fmt`.

use std::process::ExitCode;

use crate::cli::{
    args::FmtCommand,
    commands::shared::{load_session, print_query, separator},
    context::CommandContext,
};

/// Prints a query in canonical form.
pub fn run(ctx: &CommandContext, cmd: &FmtCommand) -> ExitCode {
    let session = match load_session(ctx, cmd.input.query.as_deref(), cmd.lenient, false) {
        Ok(session) => session,
        Err(code) => return code,
    };

    print_query(ctx, session.query(), separator(ctx, cmd.inline));
    ExitCode::SUCCESS
}
