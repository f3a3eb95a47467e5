//! Token definitions for the Horn-clause scanner.
//!
//! Defines the token kinds produced by the scanner (atoms, variables,
//! numerals and punctuation) together with their source positions.

use std::fmt;

/// Source location for error reporting.
///
/// `line` is one-based, `column` is zero-based and counts characters.
/// `offset` and `len` are byte positions into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            len,
            line,
            column,
        }
    }

    /// Zero-width span immediately following this one on the same line.
    pub fn after(self) -> Self {
        Self {
            offset: self.offset + self.len,
            len: 0,
            line: self.line,
            column: self.column + self.len,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.offset, span.len).into()
    }
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// (
    LParen,
    /// )
    RParen,
    /// . (end of clause)
    Dot,
    /// , (argument and goal separator)
    Comma,
    /// :- (clause neck)
    Rule,
    /// ?- (query)
    Query,
    /// Unsigned integer literal
    Numeral,
    /// Uppercase or underscore identifier
    Variable,
    /// Lowercase identifier or quoted atom
    Atom,
    /// End-of-stream sentinel. Never produced by the scanner.
    Eof,
}

impl TokenKind {
    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Rule => "':-'",
            TokenKind::Query => "'?-'",
            TokenKind::Numeral => "numeral",
            TokenKind::Variable => "variable",
            TokenKind::Atom => "atom",
            TokenKind::Eof => "end of input",
        }
    }

    /// Returns true if this kind can start a term.
    pub fn can_start_term(self) -> bool {
        matches!(
            self,
            TokenKind::Atom | TokenKind::Variable | TokenKind::Numeral
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token payload: source text, or the value of a numeral.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Text(String),
    Integer(u64),
}

impl Literal {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Literal::Text(s) => Some(s),
            Literal::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Literal::Integer(n) => Some(*n),
            Literal::Text(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => f.write_str(s),
            Literal::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// A scanned token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Literal,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: Literal, span: Span) -> Self {
        Self {
            kind,
            literal,
            span,
        }
    }

    /// The end-of-stream sentinel at `span`.
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, Literal::Text(String::new()), span)
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    /// How this token reads in a diagnostic.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => self.kind.name().to_string(),
            TokenKind::Atom | TokenKind::Variable | TokenKind::Numeral => {
                format!("{} `{}`", self.kind.name(), self.literal)
            }
            _ => format!("`{}`", self.literal),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<12} {:^5} {:^5}",
            format!("{:?}", self.kind).to_lowercase(),
            self.literal,
            self.span.line,
            self.span.column
        )
    }
}
