//! Grammar validation.
//!
//! Checks a token stream against the supported subset of PubMed syntax. Rules are checked in a
//! fixed order and the first one violated is reported:
//!
//! 1. parentheses balance
//! 2. no `AND` inside a parenthesized group
//! 3. no `OR` between two parenthesized groups
//!
//! The overall shape, `(terms) [AND (terms)]*`, is checked by the parser, which only runs once
//! these pass.

use crate::{
    error::{GrammarError, GrammarErrorKind},
    lexer::{Token, TokenKind},
};

/// Runs the token-level rules over `tokens` lexed from `input`.
pub fn check_rules(tokens: &[Token], input: &str) -> Result<(), GrammarError> {
    check_balanced(tokens, input)?;
    check_no_and_in_group(tokens, input)?;
    check_no_or_between_groups(tokens, input)
}

/// Rule 1: equal numbers of `(` and `)`.
///
/// Reports the first unmatched `)`, or else the last unmatched `(`.
fn check_balanced(tokens: &[Token], input: &str) -> Result<(), GrammarError> {
    let mut open: Vec<usize> = Vec::new();
    let mut first_stray_close = None;
    let mut opens = 0usize;
    let mut closes = 0usize;

    for token in tokens {
        match token.kind {
            TokenKind::LParen => {
                opens += 1;
                open.push(token.span.start);
            }
            TokenKind::RParen => {
                closes += 1;
                if open.pop().is_none() && first_stray_close.is_none() {
                    first_stray_close = Some(token.span.start);
                }
            }
            _ => {}
        }
    }

    if opens == closes {
        return Ok(());
    }

    let position = if closes > opens {
        first_stray_close
    } else {
        open.last().copied()
    };
    Err(GrammarError::new(
        GrammarErrorKind::UnbalancedParentheses,
        position,
        input,
    ))
}

/// Rule 2: `AND` only appears outside parentheses.
fn check_no_and_in_group(tokens: &[Token], input: &str) -> Result<(), GrammarError> {
    let mut depth = 0usize;

    for token in tokens {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::And if depth > 0 => {
                return Err(GrammarError::new(
                    GrammarErrorKind::AndInsideGroup,
                    Some(token.span.start),
                    input,
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Rule 3: `OR` never sits between a `)` and a `(`.
fn check_no_or_between_groups(tokens: &[Token], input: &str) -> Result<(), GrammarError> {
    for window in tokens.windows(3) {
        if let [before, op, after] = window
            && before.kind == TokenKind::RParen
            && op.kind == TokenKind::Or
            && after.kind == TokenKind::LParen
        {
            return Err(GrammarError::new(
                GrammarErrorKind::OrBetweenGroups,
                Some(op.span.start),
                input,
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn check(input: &str) -> Result<(), GrammarError> {
        let tokens = tokenize(input).unwrap();
        check_rules(&tokens, input)
    }

    fn kind(input: &str) -> GrammarErrorKind {
        check(input).unwrap_err().kind
    }

    #[test]
    fn valid_query_passes() {
        assert!(check("(covid OR coronavirus) AND (vaccine OR vaccination)").is_ok());
    }

    #[test]
    fn missing_close_paren() {
        let err = check("(covid OR coronavirus").unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::UnbalancedParentheses);
        assert_eq!(err.position, Some(0));
    }

    #[test]
    fn extra_close_paren() {
        let err = check("(covid)) AND (x)").unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::UnbalancedParentheses);
        assert_eq!(err.position, Some(7));
    }

    #[test]
    fn parens_inside_quotes_do_not_count() {
        assert!(check("(\"covid (sars\")").is_ok());
    }

    #[test]
    fn and_inside_group() {
        let err = check("(covid AND coronavirus)").unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::AndInsideGroup);
        assert_eq!(err.position, Some(7));
    }

    #[test]
    fn and_inside_quotes_is_allowed() {
        assert!(check("(\"salt AND pepper\")").is_ok());
    }

    #[test]
    fn lowercase_and_is_a_term() {
        assert!(check("(covid and coronavirus)").is_ok());
    }

    #[test]
    fn or_between_groups() {
        let err = check("(covid) OR (vaccine)").unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::OrBetweenGroups);
        assert_eq!(err.position, Some(8));
    }

    #[test]
    fn or_between_groups_across_newlines() {
        assert_eq!(
            kind("(covid)\n\nOR\n\n(vaccine)"),
            GrammarErrorKind::OrBetweenGroups
        );
    }

    #[test]
    fn unbalanced_wins_over_and_inside_group() {
        assert_eq!(
            kind("(covid AND coronavirus"),
            GrammarErrorKind::UnbalancedParentheses
        );
    }

    #[test]
    fn and_inside_group_wins_over_or_between_groups() {
        assert_eq!(
            kind("(a AND b) OR (c)"),
            GrammarErrorKind::AndInsideGroup
        );
    }

    #[test]
    fn bare_or_is_left_to_structure_check() {
        assert!(check("covid OR coronavirus").is_ok());
    }
}
