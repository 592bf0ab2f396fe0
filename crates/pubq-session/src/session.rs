//! The query authoring session.

use std::fmt;

use pubq_query::{
    BooleanQuery, ConceptGroup, GrammarError, IndexError, Separator, parse, recover,
    strip_code_fences,
};
use tracing::{debug, warn};

use crate::{
    error::SessionError,
    record::QueryRecord,
    synonyms::{SynonymGroup, parse_synonym_response},
};

/// How a session reads query text handed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    /// Remove Markdown code fences from pasted text. Generated text is always unfenced.
    pub strip_code_fences: bool,
    /// Salvage groups and terms from text that fails to parse, instead of rejecting it.
    pub lenient: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            strip_code_fences: true,
            lenient: false,
        }
    }
}

/// Where a replacement query came from.
#[derive(Debug, Clone, Copy)]
enum Origin {
    /// Returned by the query generation service.
    Generated,
    /// Typed or pasted by the user.
    Pasted,
}

impl Origin {
    /// Name used in log events.
    fn name(self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Pasted => "pasted",
        }
    }
}

/// One user's work on one query.
///
/// The session owns the query and the synonym suggestions for its groups. A query is only
/// ever replaced by one that parsed; every failed replacement leaves the previous query in
/// place.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The current query.
    query: BooleanQuery,
    /// Synonym suggestions, one entry per group index.
    suggestions: Vec<SynonymGroup>,
    /// How incoming text is read.
    options: InputOptions,
}

impl Session {
    /// Creates a session with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with an empty query that reads input with `options`.
    pub fn with_options(options: InputOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Reconstructs a session from a persisted query string.
    ///
    /// Blank text means no query has been built yet and gives an empty query; anything else
    /// must parse.
    pub fn from_serialized(text: &str) -> Result<Self, GrammarError> {
        let query = if text.trim().is_empty() {
            BooleanQuery::new()
        } else {
            parse(text)?
        };
        Ok(Self {
            query,
            ..Self::default()
        })
    }

    /// Reconstructs a session from a saved record.
    pub fn from_record(record: &QueryRecord) -> Result<Self, GrammarError> {
        Self::from_serialized(&record.pubmed_query)
    }

    /// Writes the current query into `record`.
    ///
    /// An empty query is saved as blank text. A query with empty groups would not read back, so
    /// it is refused and `record` is left as it was.
    pub fn save_into(&self, record: &mut QueryRecord) -> Result<(), SessionError> {
        if !self.query.is_empty() {
            self.query.ensure_complete()?;
        }
        record.pubmed_query = self.query.serialize();
        Ok(())
    }

    /// Returns the current query.
    pub fn query(&self) -> &BooleanQuery {
        &self.query
    }

    /// Serializes the current query in the editing layout.
    pub fn serialize(&self) -> String {
        self.query.serialize()
    }

    /// Replaces the query with the result of a query generation call.
    ///
    /// `response` is the raw service output or the reason the call failed. Code fences are
    /// stripped before parsing. On any failure the current query is kept and the error is
    /// returned.
    pub fn apply_generated<E: fmt::Display>(
        &mut self,
        response: Result<String, E>,
    ) -> Result<(), SessionError> {
        let raw = response.map_err(|e| {
            warn!(error = %e, "generation failed, keeping last valid query");
            SessionError::Collaborator {
                message: e.to_string(),
            }
        })?;
        self.replace(&strip_code_fences(&raw), Origin::Generated)
    }

    /// Replaces the query with text supplied by the user.
    ///
    /// On failure the current query is kept and the error is returned.
    pub fn apply_pasted(&mut self, text: &str) -> Result<(), SessionError> {
        if self.options.strip_code_fences {
            self.replace(&strip_code_fences(text), Origin::Pasted)
        } else {
            self.replace(text, Origin::Pasted)
        }
    }

    /// Parses `text` and installs it as the query, dropping suggestions for the old groups.
    fn replace(&mut self, text: &str, origin: Origin) -> Result<(), SessionError> {
        let query = match parse(text) {
            Ok(query) => query,
            Err(e) => {
                let recovered = if self.options.lenient {
                    recover(text)
                } else {
                    BooleanQuery::new()
                };
                if recovered.is_empty() {
                    warn!(
                        origin = origin.name(),
                        error = %e.kind,
                        "rejected query, keeping last valid query"
                    );
                    return Err(e.into());
                }
                warn!(
                    origin = origin.name(),
                    error = %e.kind,
                    groups = recovered.len(),
                    "recovered query leniently"
                );
                recovered
            }
        };

        debug!(origin = origin.name(), groups = query.len(), "replaced query");
        self.query = query;
        self.suggestions.clear();
        Ok(())
    }

    /// Installs synonym suggestions, one entry per group index.
    pub fn set_synonyms(&mut self, groups: Vec<SynonymGroup>) {
        debug!(groups = groups.len(), "set synonym suggestions");
        self.suggestions = groups;
    }

    /// Installs synonym suggestions from a generation call.
    ///
    /// On failure the suggestions are cleared; groups keep the synonyms already toggled in.
    pub fn apply_synonym_response<E: fmt::Display>(
        &mut self,
        response: Result<String, E>,
    ) -> Result<(), SessionError> {
        let parsed = response
            .map_err(|e| SessionError::Collaborator {
                message: e.to_string(),
            })
            .and_then(|json| parse_synonym_response(&json));

        match parsed {
            Ok(groups) => {
                self.set_synonyms(groups);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "synonym generation failed, clearing suggestions");
                self.suggestions.clear();
                Err(e)
            }
        }
    }

    /// Returns the suggested synonyms for group `index`; empty if there are none.
    pub fn suggestions(&self, index: usize) -> &[String] {
        self.suggestions
            .get(index)
            .map(|group| group.synonyms.as_slice())
            .unwrap_or_default()
    }

    /// Returns whether `synonym` was toggled into group `index`.
    pub fn is_added(&self, index: usize, synonym: &str) -> bool {
        self.query
            .group(index)
            .is_some_and(|group| group.is_synonym_added(synonym))
    }

    /// Toggles a suggested synonym in or out of group `index`.
    ///
    /// The synonym must be one of the group's suggestions, or have been toggled in earlier.
    /// Returns whether it is in the group afterwards.
    pub fn toggle_synonym(&mut self, index: usize, synonym: &str) -> Result<bool, SessionError> {
        if self.query.group(index).is_none() {
            return Err(IndexError {
                index,
                len: self.query.len(),
            }
            .into());
        }
        let suggested = self
            .suggestions
            .get(index)
            .is_some_and(|group| group.suggests(synonym));
        if !suggested && !self.is_added(index, synonym) {
            return Err(SessionError::UnknownSynonym {
                index,
                synonym: synonym.to_string(),
            });
        }
        Ok(self.query.toggle_synonym(index, synonym)?)
    }

    /// Appends an empty group and returns its index.
    pub fn add_group(&mut self) -> usize {
        self.query.add_group()
    }

    /// Removes group `index` along with its suggestions.
    pub fn remove_group(&mut self, index: usize) -> Result<ConceptGroup, SessionError> {
        let removed = self.query.remove_group(index)?;
        if index < self.suggestions.len() {
            self.suggestions.remove(index);
        }
        Ok(removed)
    }

    /// Replaces group `index`'s terms with the OR-terms in `text`.
    pub fn set_group_terms(&mut self, index: usize, text: &str) -> Result<(), SessionError> {
        Ok(self.query.set_group_terms(index, text)?)
    }

    /// Adds a term to group `index`. Returns `false` if it was already there.
    pub fn add_term(&mut self, index: usize, term: &str) -> Result<bool, SessionError> {
        Ok(self.query.add_term(index, term)?)
    }

    /// Removes a term from group `index`. Returns `false` if it was not there.
    pub fn remove_term(&mut self, index: usize, term: &str) -> Result<bool, SessionError> {
        Ok(self.query.remove_term(index, term)?)
    }

    /// Returns the single-line query to send to the estimation and collection services.
    ///
    /// Fails if the query has no groups or any group is empty.
    pub fn handoff(&self) -> Result<String, SessionError> {
        self.query.ensure_complete()?;
        Ok(self.query.to_query_string(Separator::Inline))
    }
}
