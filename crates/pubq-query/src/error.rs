//! Error types for query parsing and editing.
//!
//! [`GrammarError`] is the only way text is rejected. It names the first grammar rule the input
//! broke, remembers where, and renders with the offending line and a pointer so callers can show
//! it to users verbatim.

use std::{error, fmt};

use thiserror::Error;

/// A well-formed query, shown to users when their input has the wrong shape.
pub const EXAMPLE_QUERY: &str =
    "(covid OR coronavirus) AND (vaccine OR vaccination) AND (efficacy OR effectiveness)";

/// The grammar rule an input violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarErrorKind {
    /// A double quote was opened and never closed.
    #[error("unclosed quote")]
    UnclosedQuote,

    /// The input has a different number of `(` and `)`.
    #[error("unbalanced parentheses: each group must be enclosed in parentheses")]
    UnbalancedParentheses,

    /// An `AND` appears inside a parenthesized group.
    #[error("AND not allowed inside a group: use OR to combine terms within a group")]
    AndInsideGroup,

    /// An `OR` joins two parenthesized groups.
    #[error("OR not allowed between groups: use AND to combine groups")]
    OrBetweenGroups,

    /// The input is not of the form `(terms) AND (terms) ...`.
    #[error("invalid query format: {detail}")]
    StructuralMismatch {
        /// What was found where the grammar expected something else.
        detail: String,
    },
}

/// A query that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    /// The rule that was violated.
    pub kind: GrammarErrorKind,
    /// Byte position in the input where the violation was detected, if there is one.
    pub position: Option<usize>,
    /// The text that was being parsed.
    pub input: String,
}

impl GrammarError {
    /// Creates a grammar error for `input`.
    pub fn new(kind: GrammarErrorKind, position: Option<usize>, input: &str) -> Self {
        Self {
            kind,
            position,
            input: input.to_string(),
        }
    }

    /// Creates a structural mismatch error.
    pub fn structural(detail: impl Into<String>, position: Option<usize>, input: &str) -> Self {
        Self::new(
            GrammarErrorKind::StructuralMismatch {
                detail: detail.into(),
            },
            position,
            input,
        )
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns a valid query to guide correction, for structural errors.
    pub fn example(&self) -> Option<&'static str> {
        match self.kind {
            GrammarErrorKind::StructuralMismatch { .. } => Some(EXAMPLE_QUERY),
            _ => None,
        }
    }

    /// Returns a suggestion for fixing the error.
    pub fn suggestion(&self) -> &'static str {
        match self.kind {
            GrammarErrorKind::UnclosedQuote => "Add a closing quote (\") to complete the phrase",
            GrammarErrorKind::UnbalancedParentheses => {
                "Make sure every ( has a matching ) and every group is wrapped in one pair"
            }
            GrammarErrorKind::AndInsideGroup => {
                "Split the group in two: (a OR b) AND (c OR d)"
            }
            GrammarErrorKind::OrBetweenGroups => {
                "Merge the alternatives into one group: (a OR b OR c)"
            }
            GrammarErrorKind::StructuralMismatch { .. } => {
                "Wrap terms in parentheses, use OR only within groups and AND only between groups"
            }
        }
    }

    /// Returns the input line containing the error position and the column within that line.
    fn located_line(&self) -> Option<(&str, usize)> {
        let position = self.position?.min(self.input.len());
        let line_start = self.input[..position].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.input[position..]
            .find('\n')
            .map_or(self.input.len(), |i| position + i);
        let column = self.input[line_start..position].chars().count();
        Some((&self.input[line_start..line_end], column))
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.kind)?;

        if let Some((line, column)) = self.located_line() {
            writeln!(f, "  {line}")?;
            writeln!(f, "  {}^", " ".repeat(column))?;
        }

        if let Some(example) = self.example() {
            writeln!(f, "example: {example}")?;
        }

        write!(f, "hint: {}", self.suggestion())
    }
}

impl error::Error for GrammarError {}

/// A group index outside the current bounds of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("group index {index} out of range (query has {len} groups)")]
pub struct IndexError {
    /// The index that was requested.
    pub index: usize,
    /// Number of groups in the query.
    pub len: usize,
}

/// A query that cannot be handed to a collaborator yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompleteQuery {
    /// The query has no groups at all.
    #[error("query has no groups")]
    Empty,

    /// Some groups have no terms. Indices are zero-based.
    #[error("query has empty groups: {}", describe_groups(.0))]
    EmptyGroups(Vec<usize>),
}

/// Formats zero-based group indices as a one-based list for messages.
fn describe_groups(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| format!("#{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_points_at_position() {
        let err = GrammarError::new(
            GrammarErrorKind::AndInsideGroup,
            Some(7),
            "(covid AND coronavirus)",
        );
        let display = err.to_string();
        assert!(display.contains("AND not allowed inside a group"));
        assert!(display.contains("  (covid AND coronavirus)\n"));
        assert!(display.contains("\n         ^\n"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn display_uses_line_of_multiline_input() {
        let input = "(covid)\n\nAND\n\n(vaccine AND x)";
        let err = GrammarError::new(GrammarErrorKind::AndInsideGroup, Some(23), input);
        let display = err.to_string();
        assert!(display.contains("  (vaccine AND x)\n"));
        assert!(!display.contains("(covid)"));
        assert!(display.contains("\n           ^\n"));
    }

    #[test]
    fn structural_error_carries_example() {
        let err = GrammarError::structural("expected '('", Some(0), "covid OR coronavirus");
        assert_eq!(err.example(), Some(EXAMPLE_QUERY));
        assert!(err.to_string().contains(EXAMPLE_QUERY));
        assert!(err.message().starts_with("invalid query format"));
    }

    #[test]
    fn other_errors_have_no_example() {
        let err = GrammarError::new(GrammarErrorKind::OrBetweenGroups, None, "(a) OR (b)");
        assert!(err.example().is_none());
        let display = err.to_string();
        assert!(!display.contains('^'));
        assert!(display.contains("OR not allowed between groups"));
    }

    #[test]
    fn index_error_message() {
        let err = IndexError { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "group index 3 out of range (query has 2 groups)"
        );
    }

    #[test]
    fn incomplete_query_message_is_one_based() {
        let err = IncompleteQuery::EmptyGroups(vec![0, 2]);
        assert_eq!(err.to_string(), "query has empty groups: #1, #3");
    }
}
