//! horn_syntax: scanner and parser for a minimal Horn-clause notation.
//!
//! A source file holds facts and rules followed by exactly one query,
//! built from atoms, variables, unsigned numerals and compound terms.
//! This crate checks that such a file is lexically and syntactically
//! well formed and builds its syntax tree. It performs no resolution.
//!
//! # Pipeline
//!
//! - [`scan`] turns text into [`Token`]s with line/column positions and
//!   stops at the first unrecognized character.
//! - [`TokenStream`] gives the parser one token of lookahead.
//! - [`parse`] builds a [`Program`], collecting every [`SyntaxError`] of
//!   the file instead of stopping at the first one.
//!
//! # Example
//!
//! ```
//! let source = "parent(tom, bob).\n\
//!               ancestor(X, Y) :- parent(X, Y).\n\
//!               ?- ancestor(tom, bob).";
//! let program = horn_syntax::parse_source(source).unwrap();
//! assert_eq!(program.clauses.len(), 2);
//! assert_eq!(program.query.goals[0].functor, "ancestor");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod stream;
pub mod token;


pub use ast::{Clause, PartialProgram, Predicate, Program, Query, Term};
pub use error::{Error, LexError, LexErrorKind, SyntaxError};
pub use lexer::{scan, Lexer};
pub use parser::{parse, ParseFailure, Parser};
pub use stream::TokenStream;
pub use token::{Literal, Span, Token, TokenKind};

/// Scan and parse a whole source text.
///
/// A lexical error stops before parsing; otherwise every syntax error of
/// the source is reported in the returned [`ParseFailure`].
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(source).tokenize()?;
    Ok(parse(tokens)?)
}
