//! Saved query records.
//!
//! A record is the JSON document a review project keeps for each query: the questions and
//! answers that produced it, the serialized query, and the collection statistics gathered
//! for it.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;

/// A persisted query and the context it was built in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRecord {
    /// Record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Research questions the query was generated from.
    pub questions: Vec<String>,
    /// Answers given to the questions, keyed by question.
    pub answers: BTreeMap<String, String>,
    /// The serialized boolean query.
    pub pubmed_query: String,
    /// Documents collected per source.
    pub collected_documents: CollectedDocuments,
    /// Number of papers matching the query.
    pub paper_count: u64,
    /// Number of matching papers with free full text.
    pub free_full_text_count: u64,
    /// Matching papers per publication year.
    pub year_distribution: BTreeMap<u32, u64>,
}

/// Per-source document counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectedDocuments {
    /// Documents collected from PubMed.
    pub pubmed: u64,
    /// Documents collected from Semantic Scholar.
    pub semantic_scholar: u64,
    /// Duplicates dropped across sources, once deduplication has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_duplicates: Option<u64>,
}

impl QueryRecord {
    /// Reads a record from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let contents = fs::read_to_string(path).map_err(|source| SessionError::ReadRecord {
            path: path.to_path_buf(),
            source,
        })?;
        let record: Self =
            serde_json::from_str(&contents).map_err(|source| SessionError::ParseRecord {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), id = %record.id, "loaded record");
        Ok(record)
    }

    /// Writes the record to a JSON file, replacing any existing content.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = self.to_json()?;
        fs::write(path, json + "\n").map_err(|source| SessionError::WriteRecord {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), id = %self.id, "saved record");
        Ok(())
    }

    /// Returns the record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string_pretty(self).map_err(SessionError::SerializeRecord)
    }
}
