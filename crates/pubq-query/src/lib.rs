//! Boolean query model for PubMed searches.
//!
//! A query is an ordered list of concept groups joined by `AND`; each group is a list of
//! alternative terms joined by `OR`:
//!
//! ```text
//! (covid OR coronavirus) AND ("multiple sclerosis") AND (vaccine OR vaccination)
//! ```
//!
//! This crate converts between that text and a structured [`BooleanQuery`]:
//!
//! - **Parsing** validates the text and reports the first broken rule as a [`GrammarError`]
//!   (unbalanced parentheses, `AND` inside a group, `OR` between groups, or a structural
//!   mismatch with an example of the expected form).
//! - **Serialization** wraps each group in parentheses and quotes multi-word terms.
//! - **Editing** adds and removes groups and terms with idempotent set semantics, and tracks
//!   which terms were toggled in from synonym suggestions.
//!
//! # Example
//!
//! ```
//! use pubq_query::{Separator, parse};
//!
//! let mut query = parse("(covid) AND (vaccine OR vaccination)").unwrap();
//! query.add_term(0, "coronavirus").unwrap();
//! assert_eq!(
//!     query.to_query_string(Separator::Inline),
//!     "(covid OR coronavirus) AND (vaccine OR vaccination)"
//! );
//! ```

#![warn(missing_docs)]

mod error;
mod fence;
mod format;
mod lexer;
mod model;
mod parser;
mod terms;
mod validate;

pub use error::{EXAMPLE_QUERY, GrammarError, GrammarErrorKind, IncompleteQuery, IndexError};
pub use fence::{parse_generated, recover, strip_code_fences};
pub use format::Separator;
pub use lexer::{Token, TokenKind, tokenize};
pub use model::{BooleanQuery, ConceptGroup};
pub use parser::parse;
pub use terms::{join_terms, normalize_term, quote_term, remove_term_from_text, split_terms};
