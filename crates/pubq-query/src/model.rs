//! The structured query: an AND-list of concept groups, each an OR-list of terms.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{GrammarError, IncompleteQuery, IndexError},
    format::Separator,
    parser::parse,
    terms::{join_terms, normalize_term, split_terms},
};

/// One concept of a query: alternative terms joined by OR.
///
/// Terms behave as a set for membership but keep insertion order for display. The group also
/// remembers which of its terms were toggled in from synonym suggestions, so the suggestion list
/// can show its state without re-reading the terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptGroup {
    /// Terms in insertion order, stored without enclosing quotes.
    terms: Vec<String>,
    /// Terms that were added from a synonym suggestion list. Always a subset of `terms`.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    added_synonyms: BTreeSet<String>,
}

impl ConceptGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group from terms, normalizing each and dropping empties and duplicates.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut group = Self::new();
        for term in terms {
            group.push_term(&normalize_term(term.as_ref()));
        }
        group
    }

    /// Creates a group from flat `a OR b` text.
    pub fn from_text(text: &str) -> Self {
        Self::from_terms(split_terms(text))
    }

    /// Returns the terms in order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Returns the synonyms that were toggled into this group.
    pub fn added_synonyms(&self) -> &BTreeSet<String> {
        &self.added_synonyms
    }

    /// Returns true if the group has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if `term` (after normalization) is one of this group's terms.
    pub fn contains(&self, term: &str) -> bool {
        let term = normalize_term(term);
        self.terms.iter().any(|t| *t == term)
    }

    /// Returns true if `synonym` was toggled in from a suggestion list.
    pub fn is_synonym_added(&self, synonym: &str) -> bool {
        self.added_synonyms.contains(&normalize_term(synonym))
    }

    /// Returns the terms as flat `a OR b` text, without parentheses.
    pub fn text(&self) -> String {
        join_terms(&self.terms)
    }

    /// Returns the serialized group, always wrapped in one pair of parentheses.
    pub fn to_query_string(&self) -> String {
        format!("({})", self.text())
    }

    /// Appends a normalized term unless it is empty or already present.
    fn push_term(&mut self, term: &str) -> bool {
        if term.is_empty() || self.terms.iter().any(|t| t == term) {
            return false;
        }
        self.terms.push(term.to_string());
        true
    }

    /// Removes a normalized term and its synonym marker.
    fn drop_term(&mut self, term: &str) -> bool {
        let before = self.terms.len();
        self.terms.retain(|t| t != term);
        self.added_synonyms.remove(term);
        self.terms.len() != before
    }

    /// Replaces all terms, keeping only the synonym markers that still have a term.
    fn replace_terms(&mut self, terms: Vec<String>) {
        self.terms.clear();
        for term in &terms {
            self.push_term(term);
        }
        let kept = &self.terms;
        self.added_synonyms.retain(|s| kept.contains(s));
    }
}

/// A boolean query: concept groups joined by AND.
///
/// An empty query means "no query yet". Every edit that takes a group index checks it before
/// touching anything, so a failed edit leaves the query as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanQuery {
    /// Groups in order.
    groups: Vec<ConceptGroup>,
}

impl BooleanQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query from existing groups.
    pub fn from_groups(groups: Vec<ConceptGroup>) -> Self {
        Self { groups }
    }

    /// Parses PubMed query text. See [`parse`].
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        parse(text)
    }

    /// Returns the groups in order.
    pub fn groups(&self) -> &[ConceptGroup] {
        &self.groups
    }

    /// Returns the group at `index`, if any.
    pub fn group(&self, index: usize) -> Option<&ConceptGroup> {
        self.groups.get(index)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the query has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Appends an empty group and returns its index.
    pub fn add_group(&mut self) -> usize {
        self.groups.push(ConceptGroup::new());
        self.groups.len() - 1
    }

    /// Removes the group at `index` and returns it.
    pub fn remove_group(&mut self, index: usize) -> Result<ConceptGroup, IndexError> {
        self.check_index(index)?;
        debug!(index, "removing group");
        Ok(self.groups.remove(index))
    }

    /// Replaces a group's terms from free-form `a OR b` text.
    ///
    /// This is live per-group editing, so no grammar validation happens here. Synonym markers
    /// whose term disappeared are dropped.
    pub fn set_group_terms(&mut self, index: usize, text: &str) -> Result<(), IndexError> {
        let group = self.group_mut(index)?;
        group.replace_terms(split_terms(text));
        Ok(())
    }

    /// Adds a term to a group. Returns `false` if the term was already present (or empty).
    pub fn add_term(&mut self, index: usize, term: &str) -> Result<bool, IndexError> {
        let group = self.group_mut(index)?;
        let added = group.push_term(&normalize_term(term));
        debug!(index, term, added, "add term");
        Ok(added)
    }

    /// Adds a term that came from a synonym suggestion list and marks it as such.
    ///
    /// Returns `false` if the term was already present; it is marked as a synonym either way, so
    /// toggling it off later removes it.
    pub fn add_synonym(&mut self, index: usize, synonym: &str) -> Result<bool, IndexError> {
        let group = self.group_mut(index)?;
        let synonym = normalize_term(synonym);
        if synonym.is_empty() {
            return Ok(false);
        }
        let added = group.push_term(&synonym);
        group.added_synonyms.insert(synonym);
        Ok(added)
    }

    /// Removes a term from a group. Returns `false` if the term was not present.
    pub fn remove_term(&mut self, index: usize, term: &str) -> Result<bool, IndexError> {
        let group = self.group_mut(index)?;
        let removed = group.drop_term(&normalize_term(term));
        debug!(index, term, removed, "remove term");
        Ok(removed)
    }

    /// Toggles a suggested synonym: removes it if it was added, adds it otherwise.
    ///
    /// Returns whether the synonym is in the group afterwards.
    pub fn toggle_synonym(&mut self, index: usize, synonym: &str) -> Result<bool, IndexError> {
        let is_added = self.group_mut(index)?.is_synonym_added(synonym);
        if is_added {
            self.remove_term(index, synonym)?;
            Ok(false)
        } else {
            self.add_synonym(index, synonym)?;
            Ok(true)
        }
    }

    /// Returns the indices of groups with no terms.
    pub fn incomplete_groups(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Checks that the query can be handed to a collaborator: at least one group, none empty.
    pub fn ensure_complete(&self) -> Result<(), IncompleteQuery> {
        if self.groups.is_empty() {
            return Err(IncompleteQuery::Empty);
        }
        let empty = self.incomplete_groups();
        if empty.is_empty() {
            Ok(())
        } else {
            Err(IncompleteQuery::EmptyGroups(empty))
        }
    }

    /// Serializes the query with the given group separator.
    pub fn to_query_string(&self, separator: Separator) -> String {
        self.groups
            .iter()
            .map(ConceptGroup::to_query_string)
            .collect::<Vec<_>>()
            .join(separator.as_str())
    }

    /// Serializes the query in the editor form, groups separated by blank lines around `AND`.
    pub fn serialize(&self) -> String {
        self.to_query_string(Separator::BlankLines)
    }

    /// Returns a mutable group after checking the index.
    fn group_mut(&mut self, index: usize) -> Result<&mut ConceptGroup, IndexError> {
        let len = self.groups.len();
        self.groups.get_mut(index).ok_or(IndexError { index, len })
    }

    /// Checks that `index` refers to an existing group.
    fn check_index(&self, index: usize) -> Result<(), IndexError> {
        if index < self.groups.len() {
            Ok(())
        } else {
            Err(IndexError {
                index,
                len: self.groups.len(),
            })
        }
    }
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for BooleanQuery {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
