//! Scanner for Horn-clause source text.
//!
//! A character automaton that turns source text into tokens (atoms,
//! variables, numerals and punctuation), tracking a one-based line and a
//! zero-based column for every token. Whitespace separates tokens and is
//! never emitted. Scanning stops at the first character that cannot start
//! or continue a token.

use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use crate::error::{LexError, LexErrorKind};
use crate::token::{Literal, Span, Token, TokenKind};

/// Characters allowed inside a quoted atom besides letters, digits, `_` and space.
const QUOTED_SPECIALS: &str = "+-*/\\^~:.?#$&";

/// Letters, digits and underscore continue a variable or a bare atom.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_quoted_char(c: char) -> bool {
    is_ident_continue(c) || c == ' ' || QUOTED_SPECIALS.contains(c)
}

/// Scanner over one source text.
///
/// Iterating yields tokens until the input is exhausted or the first
/// lexical error, which is yielded once and ends the iteration.
pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    /// Byte offset of the next unconsumed character
    offset: usize,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            offset: 0,
            line: 1,
            column: 0,
            failed: false,
        }
    }

    /// Zero-width span at the next unconsumed character.
    pub fn here(&self) -> Span {
        Span::new(self.offset, 0, self.line, self.column)
    }

    /// Peek at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consume and return the next character.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.offset = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Span from `start` up to the current position.
    fn span_from(&self, start: Span) -> Span {
        Span::new(start.offset, self.offset - start.offset, start.line, start.column)
    }

    /// Span covering the next character, or zero-width at end of input.
    fn span_of_next(&self, next: Option<char>) -> Span {
        Span::new(
            self.offset,
            next.map_or(0, char::len_utf8),
            self.line,
            self.column,
        )
    }

    /// Read a variable name or bare atom.
    fn read_identifier(&mut self, first: char) -> String {
        let mut ident = String::new();
        ident.push(first);
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    /// Read a quoted atom; the opening quote is already consumed.
    fn read_quoted_atom(&mut self) -> Result<String, LexError> {
        let mut atom = String::new();
        loop {
            match self.peek() {
                Some('\'') => {
                    self.advance();
                    return Ok(atom);
                }
                Some(c) if is_quoted_char(c) => {
                    atom.push(c);
                    self.advance();
                }
                found => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedQuotedAtom { found },
                        self.span_of_next(found),
                    ))
                }
            }
        }
    }

    /// Read a numeral; leading zeros are allowed.
    fn read_numeral(&mut self, first: char, start: Span) -> Result<u64, LexError> {
        let mut value = Some(u64::from(first as u8 - b'0'));
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            self.advance();
            value = value
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add(u64::from(digit)));
        }
        value.ok_or_else(|| LexError::new(LexErrorKind::NumeralOverflow, self.span_from(start)))
    }

    /// Consume the `-` completing `?-` or `:-`.
    fn expect_dash(&mut self, lead: char) -> Result<(), LexError> {
        match self.peek() {
            Some('-') => {
                self.advance();
                Ok(())
            }
            found => Err(LexError::new(
                LexErrorKind::IncompleteOperator { lead, found },
                self.span_of_next(found),
            )),
        }
    }

    /// Get the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let start = self.here();
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(None),
        };

        let (kind, literal) = match c {
            c if c.is_ascii_uppercase() || c == '_' => {
                (TokenKind::Variable, Literal::Text(self.read_identifier(c)))
            }
            c if c.is_ascii_lowercase() => {
                (TokenKind::Atom, Literal::Text(self.read_identifier(c)))
            }
            '\'' => (TokenKind::Atom, Literal::Text(self.read_quoted_atom()?)),
            c if c.is_ascii_digit() => {
                (TokenKind::Numeral, Literal::Integer(self.read_numeral(c, start)?))
            }
            '?' => {
                self.expect_dash('?')?;
                (TokenKind::Query, Literal::Text("?-".to_string()))
            }
            ':' => {
                self.expect_dash(':')?;
                (TokenKind::Rule, Literal::Text(":-".to_string()))
            }
            ',' => (TokenKind::Comma, Literal::Text(",".to_string())),
            '.' => (TokenKind::Dot, Literal::Text(".".to_string())),
            '(' => (TokenKind::LParen, Literal::Text("(".to_string())),
            ')' => (TokenKind::RParen, Literal::Text(")".to_string())),
            _ => {
                return Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    self.span_from(start),
                ))
            }
        };

        Ok(Some(Token::new(kind, literal, self.span_from(start))))
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Scan a whole source text.
///
/// Returns the tokens produced before any failure, and at most one
/// lexical error.
pub fn scan(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for item in Lexer::new(source) {
        match item {
            Ok(token) => tokens.push(token),
            Err(err) => {
                debug!(line = err.line(), column = err.column(), "scan stopped: {}", err.kind);
                errors.push(err);
            }
        }
    }
    debug!(tokens = tokens.len(), failed = !errors.is_empty(), "scan complete");
    (tokens, errors)
}
