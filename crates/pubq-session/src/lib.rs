//! Query authoring sessions for pubq.
//!
//! A [`Session`] owns one boolean query while it is being built: it accepts replacement
//! queries from the generation service or the user, keeps the last valid query when those
//! fail, tracks synonym suggestions per group, and produces the single-line query handed to
//! the search services. [`QueryRecord`] is the saved form of a query together with the
//! questions and statistics that belong to it.

#![warn(missing_docs)]

mod error;
mod record;
mod session;
mod synonyms;

pub use error::SessionError;
pub use record::{CollectedDocuments, QueryRecord};
pub use session::{InputOptions, Session};
pub use synonyms::{SynonymGroup, parse_synonym_response};
