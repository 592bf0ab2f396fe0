//! Shared helpers for command implementations.

use std::{io, process::ExitCode};

use pubq_query::{BooleanQuery, Separator};
use pubq_session::{Session, SessionError};

use crate::cli::context::CommandContext;

/// Returns the query text from the argument, or from stdin when it is absent or `-`.
pub fn read_query(query: Option<&str>) -> Result<String, ExitCode> {
    match query {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => io::read_to_string(io::stdin()).map_err(|e| {
            eprintln!("error: failed to read query from stdin: {e}");
            ExitCode::FAILURE
        }),
    }
}

/// Reads a query into a fresh session with the configured input options.
///
/// Blank input gives an empty query when `allow_empty` is set.
pub fn load_session(
    ctx: &CommandContext,
    query: Option<&str>,
    lenient: bool,
    allow_empty: bool,
) -> Result<Session, ExitCode> {
    let text = read_query(query)?;
    let mut session = ctx.session(lenient);
    if allow_empty && text.trim().is_empty() {
        return Ok(session);
    }
    session.apply_pasted(&text).map_err(|e| report(&e))?;
    Ok(session)
}

/// Reports a session error on stderr and returns the failure exit code.
///
/// Grammar errors print as rendered, with their pointer and hint.
pub fn report(error: &SessionError) -> ExitCode {
    match error {
        SessionError::Grammar(e) => eprintln!("{e}"),
        other => eprintln!("error: {other}"),
    }
    ExitCode::FAILURE
}

/// Picks the group separator: `--inline` wins over `[format] separator`.
pub fn separator(ctx: &CommandContext, inline: bool) -> Separator {
    if inline {
        Separator::Inline
    } else {
        ctx.config.format.separator
    }
}

/// Prints a query on stdout.
pub fn print_query(ctx: &CommandContext, query: &BooleanQuery, separator: Separator) {
    println!("{}", ctx.painter.query(&query.to_query_string(separator)));
}
