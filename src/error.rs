//! Diagnostics produced by the scanner and the parser.
//!
//! Both kinds carry a [`Span`] and integrate with [`miette`] so a driver can
//! render them against the source text.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::parser::ParseFailure;
use crate::token::{Span, Token, TokenKind};

/// A lexical error. Scanning of the file stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind} at {span}")]
#[diagnostic(code(horn_syntax::lexical))]
pub struct LexError {
    pub kind: LexErrorKind,
    #[label("here")]
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The offending character, if the error was not raised at end of input.
    pub fn character(&self) -> Option<char> {
        match self.kind {
            LexErrorKind::UnexpectedCharacter(c) => Some(c),
            LexErrorKind::IncompleteOperator { found, .. } => found,
            LexErrorKind::UnterminatedQuotedAtom { found } => found,
            LexErrorKind::NumeralOverflow => None,
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    /// `?` or `:` not followed by `-`.
    #[error("expected '-' after {lead:?}, found {}", describe_char(.found))]
    IncompleteOperator { lead: char, found: Option<char> },

    /// A character outside the quoted-atom alphabet, or end of input, before
    /// the closing quote.
    #[error("unterminated quoted atom, found {}", describe_char(.found))]
    UnterminatedQuotedAtom { found: Option<char> },

    #[error("numeral does not fit in 64 bits")]
    NumeralOverflow,
}

fn describe_char(c: &Option<char>) -> String {
    match c {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

/// A token that does not fit the grammar at its position.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("expected {}, found {}", describe_expected(.expected), .found.describe())]
#[diagnostic(code(horn_syntax::syntax))]
pub struct SyntaxError {
    /// Every token kind that would have been accepted, in grammar order.
    pub expected: Vec<TokenKind>,
    pub found: Token,
    #[label("here")]
    pub span: Span,
}

impl SyntaxError {
    pub fn new(expected: Vec<TokenKind>, found: Token) -> Self {
        let span = found.span;
        Self {
            expected,
            found,
            span,
        }
    }

    pub fn expects(&self, kind: TokenKind) -> bool {
        self.expected.contains(&kind)
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.name().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(|k| k.name()).collect();
            format!("one of {} or {}", init.join(", "), last.name())
        }
    }
}

/// Failure of the one-call [`parse_source`](crate::parse_source) pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexical(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] ParseFailure),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Literal;

    #[test]
    fn test_lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('%'), Span::new(3, 1, 2, 0));
        assert_eq!(err.to_string(), "unexpected character '%' at 2:0");
        assert_eq!(err.character(), Some('%'));

        let err = LexError::new(
            LexErrorKind::IncompleteOperator {
                lead: '?',
                found: None,
            },
            Span::new(1, 0, 1, 1),
        );
        assert_eq!(err.to_string(), "expected '-' after '?', found end of input at 1:1");
        assert_eq!(err.character(), None);
    }

    #[test]
    fn test_syntax_error_display() {
        let found = Token::new(TokenKind::Dot, Literal::Text(".".into()), Span::new(6, 1, 1, 6));
        let err = SyntaxError::new(
            vec![TokenKind::Atom, TokenKind::Variable, TokenKind::Numeral],
            found,
        );
        assert_eq!(
            err.to_string(),
            "expected one of atom, variable or numeral, found `.`"
        );
        assert_eq!((err.line(), err.column()), (1, 6));
        assert!(err.expects(TokenKind::Numeral));
        assert!(!err.expects(TokenKind::Dot));
    }

    #[test]
    fn test_single_expectation() {
        let err = SyntaxError::new(vec![TokenKind::Dot], Token::eof(Span::default()));
        assert_eq!(err.to_string(), "expected '.', found end of input");
    }
}
