//! Implementation of `pubq edit`.

use std::process::ExitCode;

use pubq_session::{Session, SessionError};
use tracing::debug;

use crate::cli::{
    args::{EditCommand, EditOp},
    commands::shared::{load_session, print_query, report, separator},
    context::CommandContext,
};

/// Applies edits in order and prints the resulting query.
///
/// Nothing is printed if any edit fails.
pub fn run(ctx: &CommandContext, cmd: &EditCommand) -> ExitCode {
    let mut session = match load_session(ctx, cmd.input.query.as_deref(), false, true) {
        Ok(session) => session,
        Err(code) => return code,
    };

    for op in &cmd.ops {
        if let Err(e) = apply(&mut session, op) {
            return report(&e);
        }
    }

    print_query(ctx, session.query(), separator(ctx, cmd.inline));
    ExitCode::SUCCESS
}

/// Applies one edit to the session.
fn apply(session: &mut Session, op: &EditOp) -> Result<(), SessionError> {
    debug!(?op, "apply edit");
    match op {
        EditOp::AddGroup(terms) => {
            let index = session.add_group();
            if !terms.trim().is_empty() {
                session.set_group_terms(index, terms)?;
            }
        }
        EditOp::RemoveGroup(index) => {
            session.remove_group(*index)?;
        }
        EditOp::AddTerm(index, term) => {
            session.add_term(*index, term)?;
        }
        EditOp::RemoveTerm(index, term) => {
            session.remove_term(*index, term)?;
        }
        EditOp::SetGroup(index, text) => session.set_group_terms(*index, text)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edited(query: &str, ops: &[EditOp]) -> Result<String, SessionError> {
        let mut session = Session::from_serialized(query).unwrap();
        for op in ops {
            apply(&mut session, op)?;
        }
        Ok(session.serialize())
    }

    #[test]
    fn builds_from_scratch() {
        let out = edited(
            "",
            &[
                EditOp::AddGroup("covid OR coronavirus".into()),
                EditOp::AddGroup(String::new()),
                EditOp::AddTerm(1, "vaccine".into()),
            ],
        )
        .unwrap();
        assert_eq!(out, "(covid OR coronavirus)\n\nAND\n\n(vaccine)");
    }

    #[test]
    fn index_error_stops_editing() {
        let err = edited("(a)", &[EditOp::RemoveGroup(3)]).unwrap_err();
        assert!(matches!(err, SessionError::Index(_)));
    }

    #[test]
    fn set_group_replaces_terms() {
        let out = edited("(a OR b) AND (c)", &[EditOp::SetGroup(0, "x OR y".into())]).unwrap();
        assert_eq!(out, "(x OR y)\n\nAND\n\n(c)");
    }
}
