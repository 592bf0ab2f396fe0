//! Query lexer (tokenizer).
//!
//! Converts PubMed query text into a stream of tokens with byte spans. The validator, the
//! parser and the terminal highlighter all work from this one token stream.

use std::{iter::Peekable, ops::Range, str::CharIndices};

use crate::error::{GrammarError, GrammarErrorKind};

/// The kind of a token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// The AND keyword (upper case, standalone).
    And,

    /// The OR keyword (upper case, standalone).
    Or,

    /// A bare word.
    Word(String),

    /// A quoted phrase (the quotes are stripped, content preserved).
    Phrase(String),
}

/// A token together with the byte range it covers in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Byte range in the original input, including any quotes.
    pub span: Range<usize>,
}

impl Token {
    /// Returns true if this token is a word or a phrase.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, TokenKind::Word(_) | TokenKind::Phrase(_))
    }
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with byte offsets and one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, GrammarError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, GrammarError> {
        self.skip_whitespace();

        let Some(&(start, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_phrase(start).map(Some),
            '(' => {
                self.chars.next();
                Ok(Some(Token {
                    kind: TokenKind::LParen,
                    span: start..start + 1,
                }))
            }
            ')' => {
                self.chars.next();
                Ok(Some(Token {
                    kind: TokenKind::RParen,
                    span: start..start + 1,
                }))
            }
            _ => Ok(Some(self.read_word_or_keyword(start))),
        }
    }

    /// Reads a quoted phrase starting at `start`.
    fn read_phrase(&mut self, start: usize) -> Result<Token, GrammarError> {
        self.chars.next(); // consume opening quote

        let mut content = String::new();

        for (offset, ch) in self.chars.by_ref() {
            if ch == '"' {
                return Ok(Token {
                    kind: TokenKind::Phrase(content),
                    span: start..offset + 1,
                });
            }
            content.push(ch);
        }

        Err(GrammarError::new(
            GrammarErrorKind::UnclosedQuote,
            Some(start),
            self.input,
        ))
    }

    /// Reads a word, recognizing the AND and OR keywords.
    fn read_word_or_keyword(&mut self, start: usize) -> Token {
        let mut end = start;

        while let Some(&(offset, ch)) = self.chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }
            end = offset + ch.len_utf8();
            self.chars.next();
        }

        let word = &self.input[start..end];
        let kind = match word {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            _ => TokenKind::Word(word.to_string()),
        };

        Token {
            kind,
            span: start..end,
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, ch)| ch.is_whitespace()).is_some() {}
    }
}

/// Tokenizes PubMed query text.
///
/// Keywords are case-sensitive: `AND` and `OR` are operators, `and` and `or` are plain words.
/// Anything inside double quotes is a single phrase token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, GrammarError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn word(s: &str) -> TokenKind {
        TokenKind::Word(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![]);
        assert_eq!(kinds("  \n\t "), vec![]);
    }

    #[test]
    fn single_group() {
        assert_eq!(
            kinds("(covid OR coronavirus)"),
            vec![
                TokenKind::LParen,
                word("covid"),
                TokenKind::Or,
                word("coronavirus"),
                TokenKind::RParen
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            kinds("covid and vaccine or"),
            vec![word("covid"), word("and"), word("vaccine"), word("or")]
        );
    }

    #[test]
    fn keyword_inside_word_is_a_word() {
        assert_eq!(kinds("ANDROGEN ORAL"), vec![word("ANDROGEN"), word("ORAL")]);
    }

    #[test]
    fn keyword_adjacent_to_parens() {
        assert_eq!(
            kinds("(a)AND(b)"),
            vec![
                TokenKind::LParen,
                word("a"),
                TokenKind::RParen,
                TokenKind::And,
                TokenKind::LParen,
                word("b"),
                TokenKind::RParen
            ]
        );
    }

    #[test]
    fn phrase_is_one_token() {
        assert_eq!(
            kinds("\"covid AND (vaccine)\""),
            vec![TokenKind::Phrase("covid AND (vaccine)".into())]
        );
    }

    #[test]
    fn phrase_followed_by_field_tag() {
        assert_eq!(
            kinds("\"breast cancer\"[MeSH Terms]"),
            vec![
                TokenKind::Phrase("breast cancer".into()),
                word("[MeSH"),
                word("Terms]")
            ]
        );
    }

    #[test]
    fn spans_cover_source_text() {
        let input = "(\"multiple sclerosis\" OR ms)";
        let tokens = tokenize(input).unwrap();
        assert_eq!(&input[tokens[1].span.clone()], "\"multiple sclerosis\"");
        assert_eq!(&input[tokens[2].span.clone()], "OR");
        assert_eq!(&input[tokens[3].span.clone()], "ms");
        assert_eq!(tokens[4].span, 27..28);
    }

    #[test]
    fn spans_with_multibyte_text() {
        let input = "(Sjögren OR x)";
        let tokens = tokenize(input).unwrap();
        assert_eq!(&input[tokens[1].span.clone()], "Sjögren");
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("(\"multiple sclerosis OR ms)").unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::UnclosedQuote);
        assert_eq!(err.position, Some(1));
    }

    #[test]
    fn newlines_are_whitespace() {
        assert_eq!(
            kinds("(a)\n\nAND\n\n(b)"),
            vec![
                TokenKind::LParen,
                word("a"),
                TokenKind::RParen,
                TokenKind::And,
                TokenKind::LParen,
                word("b"),
                TokenKind::RParen
            ]
        );
    }
}
