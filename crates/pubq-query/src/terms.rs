//! Term-level text helpers.
//!
//! Terms are stored without enclosing quotes and quoted again on output. The helpers here also
//! cover the flat `a OR b OR c` text that group text boxes hold.

use std::borrow::Cow;

use crate::lexer::{Token, tokenize};

/// The keyword that joins terms within a group.
pub const OR: &str = "OR";

/// The keyword that joins groups.
pub const AND: &str = "AND";

/// Normalizes a term as typed or parsed.
///
/// Trims surrounding whitespace and strips one pair of enclosing double quotes when the quotes
/// wrap the whole term and there is no other quote inside. Anything else, such as a quoted
/// phrase followed by a field tag (`"breast cancer"[MeSH Terms]`), is kept verbatim as long as
/// it lexes as plain term text. Quotes that would not lex that way (a lone `"`, or phrases
/// around parentheses or a keyword) are dropped.
pub fn normalize_term(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        && !inner.contains('"')
    {
        return inner.trim().to_string();
    }
    if trimmed.contains('"') && !lexes_as_text(trimmed) {
        return trimmed.replace('"', "").trim().to_string();
    }
    trimmed.to_string()
}

/// Quotes a term for output unless it already lexes as one term on its own.
///
/// Terms with whitespace, parentheses, or spelled exactly like a keyword are wrapped in quotes.
/// Terms that carry their own quotes are written verbatim.
pub fn quote_term(term: &str) -> Cow<'_, str> {
    if !term.contains('"') && needs_quotes(term) {
        Cow::Owned(format!("\"{term}\""))
    } else {
        Cow::Borrowed(term)
    }
}

/// True if an unquoted term would not read back as a single word.
fn needs_quotes(term: &str) -> bool {
    term == AND
        || term == OR
        || term.contains(|c: char| c.is_whitespace() || c == '(' || c == ')')
}

/// True if `text` lexes into words and complete quoted phrases only.
fn lexes_as_text(text: &str) -> bool {
    tokenize(text).is_ok_and(|tokens| tokens.iter().all(Token::is_text))
}

/// Joins terms with ` OR `, quoting multi-word terms.
pub fn join_terms<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| quote_term(t.as_ref()))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Splits flat group text on the standalone `OR` keyword into normalized terms.
///
/// Empty pieces, as left by a dangling `OR` while the user is typing, are dropped.
pub fn split_terms(text: &str) -> Vec<String> {
    split_on_keyword(text, OR)
        .into_iter()
        .map(normalize_term)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Removes every occurrence of `term` from flat group text.
///
/// Works wherever the term sits (only term, first, middle, last) and never leaves a dangling
/// `OR` behind. The result is re-joined in canonical form.
pub fn remove_term_from_text(text: &str, term: &str) -> String {
    let target = normalize_term(term);
    let remaining: Vec<String> = split_terms(text)
        .into_iter()
        .filter(|t| *t != target)
        .collect();
    join_terms(&remaining)
}

/// Splits `text` on occurrences of `keyword` that stand alone as a word.
///
/// A match must not be adjacent to a letter, digit or underscore, so `ANDROGEN` does not split
/// on `AND`, while `)AND(` does. Matches inside double quotes are ignored.
pub fn split_on_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut in_quote = false;
    let mut prev: Option<char> = None;
    let mut skip_until = 0;

    for (offset, ch) in text.char_indices() {
        if offset < skip_until {
            prev = Some(ch);
            continue;
        }
        if ch == '"' {
            in_quote = !in_quote;
        } else if !in_quote
            && !prev.is_some_and(is_word_char)
            && text[offset..].starts_with(keyword)
            && !text[offset + keyword.len()..]
                .chars()
                .next()
                .is_some_and(is_word_char)
        {
            pieces.push(&text[piece_start..offset]);
            piece_start = offset + keyword.len();
            skip_until = piece_start;
        }
        prev = Some(ch);
    }

    pieces.push(&text[piece_start..]);
    pieces
}

/// Characters that make up a word for keyword boundary checks.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_one_pair_of_quotes() {
        assert_eq!(normalize_term("  \"multiple sclerosis\" "), "multiple sclerosis");
        assert_eq!(normalize_term("covid"), "covid");
    }

    #[test]
    fn normalize_keeps_field_tagged_phrase() {
        assert_eq!(
            normalize_term("\"breast cancer\"[MeSH Terms]"),
            "\"breast cancer\"[MeSH Terms]"
        );
    }

    #[test]
    fn normalize_keeps_inner_quotes() {
        assert_eq!(normalize_term("\"a\" \"b\""), "\"a\" \"b\"");
    }

    #[test]
    fn normalize_drops_quotes_that_do_not_lex() {
        assert_eq!(normalize_term("covid\"19"), "covid19");
        assert_eq!(normalize_term("\"a\" AND \"b\""), "a AND b");
        assert_eq!(normalize_term("\"a\"(b)"), "a(b)");
    }

    #[test]
    fn keywords_and_parentheses_are_quoted() {
        assert_eq!(quote_term("AND"), "\"AND\"");
        assert_eq!(quote_term("OR"), "\"OR\"");
        assert_eq!(quote_term("covid(19)"), "\"covid(19)\"");
        assert_eq!(quote_term("and"), "and");
    }

    #[test]
    fn quote_only_multiword_terms() {
        assert_eq!(quote_term("covid"), "covid");
        assert_eq!(quote_term("multiple sclerosis"), "\"multiple sclerosis\"");
        assert_eq!(
            quote_term("\"breast cancer\"[MeSH Terms]"),
            "\"breast cancer\"[MeSH Terms]"
        );
    }

    #[test]
    fn split_on_standalone_keyword_only() {
        assert_eq!(
            split_on_keyword("ANDROGEN AND ORAL", AND),
            vec!["ANDROGEN ", " ORAL"]
        );
        assert_eq!(split_on_keyword("(a)AND(b)", AND), vec!["(a)", "(b)"]);
        assert_eq!(split_on_keyword("a and b", AND), vec!["a and b"]);
    }

    #[test]
    fn split_ignores_keywords_in_quotes() {
        assert_eq!(
            split_on_keyword("\"salt OR pepper\" OR spice", OR),
            vec!["\"salt OR pepper\" ", " spice"]
        );
    }

    #[test]
    fn split_terms_drops_dangling_or() {
        assert_eq!(split_terms("covid OR "), vec!["covid"]);
        assert_eq!(split_terms("OR covid"), vec!["covid"]);
        assert_eq!(split_terms("covid OR OR sars"), vec!["covid", "sars"]);
        assert!(split_terms("   ").is_empty());
    }

    #[test]
    fn join_quotes_phrases() {
        assert_eq!(
            join_terms(&["covid", "multiple sclerosis"]),
            "covid OR \"multiple sclerosis\""
        );
    }

    #[test]
    fn remove_only_term() {
        assert_eq!(remove_term_from_text("covid", "covid"), "");
    }

    #[test]
    fn remove_first_term() {
        assert_eq!(
            remove_term_from_text("covid OR sars OR mers", "covid"),
            "sars OR mers"
        );
    }

    #[test]
    fn remove_middle_term() {
        assert_eq!(
            remove_term_from_text("covid OR sars OR mers", "sars"),
            "covid OR mers"
        );
    }

    #[test]
    fn remove_last_term() {
        assert_eq!(
            remove_term_from_text("covid OR sars OR mers", "mers"),
            "covid OR sars"
        );
    }

    #[test]
    fn remove_does_not_touch_substrings() {
        assert_eq!(
            remove_term_from_text("covid OR covid-19", "covid"),
            "covid-19"
        );
    }

    #[test]
    fn remove_absent_term_is_canonical_noop() {
        assert_eq!(remove_term_from_text("covid OR sars", "mers"), "covid OR sars");
    }
}
