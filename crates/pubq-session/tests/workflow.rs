//! End-to-end authoring workflow: load a record, generate, refine, save.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use pubq_session::{QueryRecord, Session, SessionError};

const RECORD: &str = r#"{
  "id": "review-7",
  "name": "Long covid",
  "description": "Persistent symptoms after infection",
  "questions": ["What are the long-term symptoms?"],
  "answers": {},
  "pubmedQuery": "",
  "collectedDocuments": {"pubmed": 0, "semanticScholar": 0},
  "paperCount": 0,
  "freeFullTextCount": 0,
  "yearDistribution": {}
}"#;

const GENERATED: &str = "```pubmed\n(\"long covid\" OR \"post-acute sequelae\") AND (fatigue OR dyspnea)\n```";

const SYNONYMS: &str = r#"{"synonym_groups": [
  {"concept": "long covid", "abstraction": "condition", "synonyms": ["pasc", "post covid syndrome"]},
  {"concept": "symptoms", "abstraction": "outcome", "synonyms": ["brain fog"]}
]}"#;

#[test]
fn build_refine_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("review-7.json");
    fs::write(&path, RECORD).unwrap();

    let mut record = QueryRecord::load(&path).unwrap();
    let mut session = Session::from_record(&record).unwrap();
    assert!(session.query().is_empty());

    session
        .apply_generated(Ok::<_, String>(GENERATED.to_string()))
        .unwrap();
    session
        .apply_synonym_response(Ok::<_, String>(SYNONYMS.to_string()))
        .unwrap();

    assert!(session.toggle_synonym(0, "post covid syndrome").unwrap());
    assert!(session.toggle_synonym(1, "brain fog").unwrap());
    session.remove_term(1, "dyspnea").unwrap();

    // A failing regeneration must not disturb the refined query.
    let before = session.serialize();
    let err = session
        .apply_generated(Err::<String, _>("service unavailable"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Collaborator { .. }));
    assert_eq!(session.serialize(), before);

    assert_eq!(
        session.handoff().unwrap(),
        "(\"long covid\" OR \"post-acute sequelae\" OR \"post covid syndrome\") AND (fatigue OR \"brain fog\")"
    );

    session.save_into(&mut record).unwrap();
    record.save(&path).unwrap();

    let reloaded = Session::from_record(&QueryRecord::load(&path).unwrap()).unwrap();
    assert_eq!(reloaded.serialize(), session.serialize());
    assert!(!reloaded.is_added(0, "post covid syndrome"));
}

#[test]
fn saved_record_keeps_unrelated_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");
    fs::write(&path, RECORD).unwrap();

    let mut record = QueryRecord::load(&path).unwrap();
    let mut session = Session::from_record(&record).unwrap();
    session.apply_pasted("(covid) AND (fatigue)").unwrap();
    session.save_into(&mut record).unwrap();
    record.save(&path).unwrap();

    let reloaded = QueryRecord::load(&path).unwrap();
    assert_eq!(reloaded.name, "Long covid");
    assert_eq!(reloaded.questions.len(), 1);
    assert_eq!(reloaded.pubmed_query, "(covid)\n\nAND\n\n(fatigue)");
}

#[test]
fn query_with_empty_group_is_not_saved() {
    let mut record = QueryRecord {
        pubmed_query: "(covid)".into(),
        ..QueryRecord::default()
    };
    let mut session = Session::from_record(&record).unwrap();
    session.add_group();

    let err = session.save_into(&mut record).unwrap_err();
    assert!(matches!(err, SessionError::Incomplete(_)));
    assert_eq!(record.pubmed_query, "(covid)");

    session.add_term(1, "fatigue").unwrap();
    session.save_into(&mut record).unwrap();
    let reloaded = Session::from_record(&record).unwrap();
    assert_eq!(reloaded.serialize(), "(covid)\n\nAND\n\n(fatigue)");
}
