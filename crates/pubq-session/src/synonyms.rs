//! Synonym suggestions from the generation service.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Suggested alternatives for one concept group, keyed by the group's position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymGroup {
    /// The concept the group stands for.
    #[serde(default)]
    pub concept: String,
    /// A broader description of the concept.
    #[serde(default)]
    pub abstraction: String,
    /// Candidate terms that may be toggled into the group.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl SynonymGroup {
    /// Returns whether `synonym` is one of the suggestions.
    pub fn suggests(&self, synonym: &str) -> bool {
        self.synonyms.iter().any(|s| s == synonym)
    }
}

/// Body of a synonym generation response.
#[derive(Debug, Deserialize)]
struct SynonymResponse {
    /// One entry per concept group, in group order.
    synonym_groups: Vec<SynonymGroup>,
}

/// Parses a synonym generation response of the form `{"synonym_groups": [...]}`.
pub fn parse_synonym_response(json: &str) -> Result<Vec<SynonymGroup>, SessionError> {
    serde_json::from_str::<SynonymResponse>(json)
        .map(|response| response.synonym_groups)
        .map_err(SessionError::SynonymResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_response() {
        let json = r#"{
            "synonym_groups": [
                {"concept": "covid", "abstraction": "disease", "synonyms": ["coronavirus", "sars-cov-2"]},
                {"concept": "vaccine", "abstraction": "intervention", "synonyms": []}
            ]
        }"#;

        let groups = parse_synonym_response(json).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].concept, "covid");
        assert!(groups[0].suggests("sars-cov-2"));
        assert!(!groups[1].suggests("coronavirus"));
    }

    #[test]
    fn missing_fields_default() {
        let groups = parse_synonym_response(r#"{"synonym_groups": [{"synonyms": ["a"]}]}"#).unwrap();
        assert_eq!(groups[0].concept, "");
        assert_eq!(groups[0].synonyms, ["a"]);
    }

    #[test]
    fn non_list_is_rejected() {
        let err = parse_synonym_response(r#"{"synonym_groups": "none"}"#).unwrap_err();
        assert!(matches!(err, SessionError::SynonymResponse(_)));
    }
}
