//! Handling of query text produced by the query generation service.
//!
//! The service answers with a PubMed query, often wrapped in a Markdown code fence and not
//! always well formed. [`parse_generated`] strips the fence and parses strictly; [`recover`]
//! salvages whatever groups and terms it can from text that does not validate.

use tracing::debug;

use crate::{
    error::GrammarError,
    model::{BooleanQuery, ConceptGroup},
    parser::parse,
    terms::{AND, OR, normalize_term, split_on_keyword},
};

/// The Markdown code fence delimiter.
const FENCE: &str = "```";

/// Removes triple-backtick code fences and trims the result.
///
/// A language tag directly after an opening fence (```` ```pubmed ````) is removed along with
/// the fence when it runs to the end of its line.
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    let mut opening = true;

    while let Some(idx) = rest.find(FENCE) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + FENCE.len()..];

        if opening {
            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .unwrap_or(rest.len());
            let after_tag = &rest[tag_len..];
            if tag_len > 0 && (after_tag.is_empty() || after_tag.starts_with(['\n', '\r'])) {
                rest = after_tag;
            }
        }
        opening = !opening;
    }

    out.push_str(rest);
    out.trim().to_string()
}

/// Strips code fences from service output, then parses it strictly.
pub fn parse_generated(raw: &str) -> Result<BooleanQuery, GrammarError> {
    parse(&strip_code_fences(raw))
}

/// Salvages a query from text that may not validate.
///
/// Splits on every standalone `AND` regardless of parentheses, strips all leading `(` and
/// trailing `)` from each piece, splits on `OR`, and unwraps quoted terms. Empty terms and
/// groups are dropped. Never fails; the result may be empty.
pub fn recover(raw: &str) -> BooleanQuery {
    let text = strip_code_fences(raw);

    let groups: Vec<ConceptGroup> = split_on_keyword(&text, AND)
        .into_iter()
        .filter_map(|segment| {
            let segment = segment
                .trim()
                .trim_start_matches('(')
                .trim_end_matches(')');
            let group = ConceptGroup::from_terms(
                split_on_keyword(segment, OR)
                    .into_iter()
                    .map(recover_term),
            );
            (!group.is_empty()).then_some(group)
        })
        .collect();

    debug!(groups = groups.len(), "recovered query");
    BooleanQuery::from_groups(groups)
}

/// Cleans one term during recovery: stray parentheses and single quotes around it go.
fn recover_term(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c: char| c == '(' || c == ')').trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(trimmed);
    normalize_term(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_fences() {
        assert_eq!(strip_code_fences("```(covid)```"), "(covid)");
    }

    #[test]
    fn strips_language_tag() {
        assert_eq!(
            strip_code_fences("```pubmed\n(covid) AND (x)\n```"),
            "(covid) AND (x)"
        );
    }

    #[test]
    fn keeps_text_that_looks_like_a_tag_on_the_same_line() {
        assert_eq!(strip_code_fences("```covid```"), "covid");
    }

    #[test]
    fn no_fences_only_trims() {
        assert_eq!(strip_code_fences("  (covid)\n"), "(covid)");
    }

    #[test]
    fn surrounding_prose_is_kept() {
        assert_eq!(
            strip_code_fences("Here you go:\n```\n(a)\n```"),
            "Here you go:\n\n(a)"
        );
    }

    #[test]
    fn parse_generated_accepts_fenced_query() {
        let q = parse_generated("```\n(covid OR coronavirus) AND (vaccine)\n```").unwrap();
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn parse_generated_still_validates() {
        assert!(parse_generated("```covid OR coronavirus```").is_err());
    }

    #[test]
    fn recover_unwraps_extra_parentheses() {
        let q = recover("((covid OR coronavirus)) AND ((vaccine))");
        assert_eq!(q.to_string(), "(covid OR coronavirus)\n\nAND\n\n(vaccine)");
    }

    #[test]
    fn recover_handles_missing_parentheses() {
        let q = recover("covid OR coronavirus AND vaccine");
        assert_eq!(q.len(), 2);
        assert_eq!(q.group(0).unwrap().terms(), ["covid", "coronavirus"]);
    }

    #[test]
    fn recover_splits_and_inside_group() {
        let q = recover("(covid AND coronavirus)");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn recover_unquotes_and_requotes() {
        let q = recover("(\"long covid\" OR 'post covid')");
        assert_eq!(q.group(0).unwrap().terms(), ["long covid", "post covid"]);
        assert_eq!(q.to_string(), "(\"long covid\" OR \"post covid\")");
    }

    #[test]
    fn recover_drops_empty_pieces() {
        let q = recover("() AND (a OR ) AND");
        assert_eq!(q.len(), 1);
        assert_eq!(q.group(0).unwrap().terms(), ["a"]);
    }

    #[test]
    fn recover_empty_input() {
        assert!(recover("``` ```").is_empty());
    }
}
