//! Tokenizer shared by the SDL and query parsers.

use std::fmt;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Name(String),
    String(String),
    Punct(char),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "Name \"{name}\""),
            Self::String(value) => write!(f, "String \"{value}\""),
            Self::Punct(c) => write!(f, "\"{c}\""),
            Self::Eof => f.write_str("<EOF>"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Deepest `{` or `[` nesting either parser accepts.
pub(crate) const MAX_DEPTH: usize = 256;

const PUNCTUATORS: &[char] = &['{', '}', '(', ')', '[', ']', ':', '!', '@', '=', '|'];

/// Split `source` into tokens. Commas and `#` comments are insignificant.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let (mut line, mut column) = (1usize, 1usize);

    while let Some(&c) = chars.peek() {
        let (start_line, start_column) = (line, column);
        match c {
            '\n' => {
                chars.next();
                line += 1;
                column = 1;
            }
            c if c.is_whitespace() || c == ',' || c == '\u{feff}' => {
                chars.next();
                column += 1;
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                    column += 1;
                }
            }
            '"' => {
                chars.next();
                column += 1;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => {
                            column += 1;
                            break;
                        }
                        Some('\n') | None => {
                            return Err(ParseError::new(
                                "Syntax Error: Unterminated string.",
                                start_line,
                                start_column,
                            ));
                        }
                        Some(c) => {
                            column += 1;
                            value.push(c);
                        }
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::String(value),
                    line: start_line,
                    column: start_column,
                });
            }
            c if c == '_' || c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '_' || c.is_ascii_alphanumeric() {
                        name.push(c);
                        chars.next();
                        column += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Name(name),
                    line: start_line,
                    column: start_column,
                });
            }
            c if PUNCTUATORS.contains(&c) => {
                chars.next();
                column += 1;
                tokens.push(Token {
                    kind: TokenKind::Punct(c),
                    line: start_line,
                    column: start_column,
                });
            }
            other => {
                return Err(ParseError::new(
                    format!("Syntax Error: Unexpected character \"{other}\"."),
                    start_line,
                    start_column,
                ));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        column,
    });
    Ok(tokens)
}

/// Cursor over a token list with the expectation helpers both parsers use.
pub(crate) struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        // The token list always ends with Eof, and `next` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.peek().kind == TokenKind::Punct(c)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Name(name) if name == keyword)
    }

    /// Consume `c` if it is next.
    pub fn eat_punct(&mut self, c: char) -> bool {
        if self.is_punct(c) {
            self.next();
            true
        } else {
            false
        }
    }

    pub fn expect_punct(&mut self, c: char) -> Result<Token, ParseError> {
        if self.is_punct(c) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&format!("\"{c}\"")))
        }
    }

    pub fn expect_name(&mut self) -> Result<(String, Token), ParseError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.next();
                Ok((name, token))
            }
            _ => Err(self.unexpected("Name")),
        }
    }

    pub fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.next();
                Ok(value)
            }
            _ => Err(self.unexpected("String")),
        }
    }

    /// Error for the current token, naming what was expected.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let message = if token.kind == TokenKind::Eof {
            "Syntax Error: Unexpected <EOF>.".to_string()
        } else {
            format!("Syntax Error: Expected {expected}, found {}.", token.kind)
        };
        ParseError::new(message, token.line, token.column)
    }

    /// Error for the current token when nesting passes [`MAX_DEPTH`].
    pub fn too_deep(&self) -> ParseError {
        let token = self.peek();
        ParseError::new(
            format!("Syntax Error: Nesting exceeds {MAX_DEPTH} levels."),
            token.line,
            token.column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_skips_commas_and_comments() {
        assert_eq!(
            kinds("a, b # trailing\n c"),
            vec![
                TokenKind::Name("a".into()),
                TokenKind::Name("b".into()),
                TokenKind::Name("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_tracks_positions() {
        let tokens = tokenize("type\n  Query {").unwrap();
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 9));
    }

    #[test]
    fn test_tokenize_rejects_unknown_character() {
        let err = tokenize("type Query { a: Int% }").unwrap_err();
        assert_eq!(err.message, "Syntax Error: Unexpected character \"%\".");
        assert_eq!((err.line, err.column), (1, 20));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("@key(fields: \"upc)").unwrap_err();
        assert_eq!(err.message, "Syntax Error: Unterminated string.");
    }
}
