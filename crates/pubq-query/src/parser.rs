//! Query parser.
//!
//! Validates PubMed query text and turns it into a [`BooleanQuery`].
//!
//! # Grammar
//!
//! ```text
//! query → group ("AND" group)*
//! group → "(" term ("OR" term)* ")"
//! term  → (WORD | PHRASE)+
//! ```
//!
//! A term is the source text from its first word to its last, so `covid vaccine` stays one
//! term and `"breast cancer"[MeSH Terms]` keeps its field tag. There is no nesting: a `(` inside
//! a group is a structural error.

use tracing::debug;

use crate::{
    error::GrammarError,
    lexer::{Token, TokenKind, tokenize},
    model::{BooleanQuery, ConceptGroup},
    terms::normalize_term,
    validate::check_rules,
};

/// Recursive descent parser over a validated token stream.
struct Parser<'a> {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// The source text, for term spans and error context.
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>, input: &'a str) -> Self {
        Self {
            tokens,
            position: 0,
            input,
        }
    }

    /// Parses: query → group ("AND" group)*
    fn parse(mut self) -> Result<BooleanQuery, GrammarError> {
        if self.tokens.is_empty() {
            return Err(GrammarError::structural("query is empty", None, self.input));
        }

        let mut groups = vec![self.parse_group()?];

        while let Some(token) = self.peek() {
            if token.kind != TokenKind::And {
                return Err(self.error_at_current(format!(
                    "expected AND between groups, found {}",
                    describe(token)
                )));
            }
            self.advance(); // consume AND
            groups.push(self.parse_group()?);
        }

        Ok(BooleanQuery::from_groups(groups))
    }

    /// Parses: group → "(" term ("OR" term)* ")"
    fn parse_group(&mut self) -> Result<ConceptGroup, GrammarError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::LParen => self.advance(),
            Some(token) => {
                return Err(self.error_at_current(format!(
                    "expected '(' to start a group, found {}",
                    describe(token)
                )));
            }
            None => return Err(self.error_at_end("expected a group after AND")),
        }

        let mut terms = vec![self.parse_term()?];

        loop {
            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Or) => {
                    self.advance(); // consume OR
                    terms.push(self.parse_term()?);
                }
                Some(TokenKind::RParen) => {
                    self.advance(); // consume )
                    break;
                }
                Some(TokenKind::LParen) => {
                    return Err(self.error_at_current("nested parentheses are not supported"));
                }
                Some(_) => {
                    return Err(self.error_at_current("expected OR or ')' after a term"));
                }
                None => return Err(self.error_at_end("expected ')' to close the group")),
            }
        }

        Ok(ConceptGroup::from_terms(terms))
    }

    /// Parses: term → (WORD | PHRASE)+
    fn parse_term(&mut self) -> Result<String, GrammarError> {
        let start = self.position;
        while self.peek().is_some_and(Token::is_text) {
            self.advance();
        }

        if self.position == start {
            let detail = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::RParen) => "expected a term before ')'",
                Some(TokenKind::Or) => "expected a term before OR",
                Some(TokenKind::LParen) => "nested parentheses are not supported",
                _ => "expected a term",
            };
            return Err(match self.peek() {
                Some(_) => self.error_at_current(detail),
                None => self.error_at_end(detail),
            });
        }

        let first = &self.tokens[start].span;
        let last = &self.tokens[self.position - 1].span;
        let term = normalize_term(&self.input[first.start..last.end]);
        if term.is_empty() {
            return Err(GrammarError::structural(
                "expected a term",
                Some(first.start),
                self.input,
            ));
        }
        Ok(term)
    }

    /// Creates a structural error at the current token.
    fn error_at_current(&self, detail: impl Into<String>) -> GrammarError {
        let position = self.peek().map(|t| t.span.start);
        GrammarError::structural(detail, position, self.input)
    }

    /// Creates a structural error at the end of the input.
    fn error_at_end(&self, detail: impl Into<String>) -> GrammarError {
        GrammarError::structural(detail, Some(self.input.trim_end().len()), self.input)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Describes a token for error messages.
fn describe(token: &Token) -> String {
    match &token.kind {
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::And => "AND".to_string(),
        TokenKind::Or => "OR".to_string(),
        TokenKind::Word(word) => format!("'{word}'"),
        TokenKind::Phrase(phrase) => format!("\"{phrase}\""),
    }
}

/// Parses PubMed query text into a [`BooleanQuery`].
///
/// The text must be one or more parenthesized groups joined by `AND`, with `OR` between terms
/// inside each group. On failure the error names the first rule broken; nothing is partially
/// parsed.
pub fn parse(input: &str) -> Result<BooleanQuery, GrammarError> {
    let result = tokenize(input).and_then(|tokens| {
        check_rules(&tokens, input)?;
        Parser::new(tokens, input).parse()
    });

    match &result {
        Ok(query) => debug!(groups = query.len(), "parsed query"),
        Err(e) => debug!(error = %e.kind, position = ?e.position, "rejected query"),
    }

    result
}
