//! Implementation of `pubq check`.

use std::process::ExitCode;

use crate::cli::{
    args::QueryInput,
    commands::shared::{load_session, report},
    context::CommandContext,
};

/// Validates a query. Exits with failure and the rendered error if it does not parse.
pub fn run(ctx: &CommandContext, input: &QueryInput) -> ExitCode {
    let session = match load_session(ctx, input.query.as_deref(), false, false) {
        Ok(session) => session,
        Err(code) => return code,
    };

    if let Err(e) = session.handoff() {
        return report(&e);
    }

    let groups = session.query().len();
    let terms: usize = session.query().groups().iter().map(|g| g.len()).sum();
    println!(
        "{} {}",
        ctx.painter.success("valid"),
        ctx.painter.dim(&format!("({groups} groups, {terms} terms)"))
    );
    ExitCode::SUCCESS
}
