//! Parser for Horn-clause programs.
//!
//! Implements a recursive descent parser with one procedure per grammar
//! production:
//!
//! ```text
//! program        := clause* query
//! clause         := predicate ( ':-' predicate_list )? '.'
//! query          := '?-' predicate_list '.'
//! predicate_list := predicate ( ',' predicate )*
//! predicate      := atom ( '(' term_list ')' )?
//! term_list      := term ( ',' term )*
//! term           := variable | numeral | atom ( '(' term_list ')' )?
//! ```
//!
//! Every production returns a `Result`; a failing production records a
//! [`SyntaxError`] before returning. A malformed clause is skipped up to and
//! including the next `.` so later clauses still get checked, and all
//! diagnostics of a source are reported together.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{Clause, PartialProgram, Predicate, Program, Query, Term};
use crate::error::SyntaxError;
use crate::stream::TokenStream;
use crate::token::{Literal, Token, TokenKind};

/// Kinds that may start a term.
const TERM_START: [TokenKind; 3] = [TokenKind::Atom, TokenKind::Variable, TokenKind::Numeral];

/// Marker for a failed production. The diagnostic is already recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Failed;

type PResult<T> = Result<T, Failed>;

/// A source that did not parse cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("parsing failed with {} syntax error(s)", .diagnostics.len())]
#[diagnostic(code(horn_syntax::parse))]
pub struct ParseFailure {
    /// Clauses recovered despite the errors, and the query if it parsed.
    pub partial: PartialProgram,
    /// Never empty, ordered by position
    #[related]
    pub diagnostics: Vec<SyntaxError>,
}

/// Parser for one token sequence.
pub struct Parser {
    stream: TokenStream,
    diagnostics: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(tokens: impl Into<TokenStream>) -> Self {
        Self {
            stream: tokens.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Record a diagnostic against the current token.
    fn fail(&mut self, expected: Vec<TokenKind>) -> Failed {
        let found = self.stream.current().clone();
        trace!(line = found.line(), column = found.column(), "syntax error");
        self.diagnostics.push(SyntaxError::new(expected, found));
        Failed
    }

    /// Consume a token of `kind`. On mismatch the diagnostic lists `also`
    /// (optional continuations that were not taken) before `kind`.
    fn expect(&mut self, kind: TokenKind, also: &[TokenKind]) -> PResult<Token> {
        if self.stream.check(kind) {
            Ok(self.stream.bump())
        } else {
            let mut expected = also.to_vec();
            expected.push(kind);
            Err(self.fail(expected))
        }
    }

    /// Skip the rest of a malformed clause: up to and including the next
    /// `.`, or up to a `?-`, or to the end of the stream.
    fn synchronize(&mut self) {
        let start = self.stream.position();
        loop {
            match self.stream.kind() {
                TokenKind::Eof | TokenKind::Query => break,
                TokenKind::Dot => {
                    self.stream.advance();
                    break;
                }
                _ => {
                    self.stream.advance();
                }
            }
        }
        debug!(
            skipped = self.stream.position() - start,
            "resynchronized after malformed clause"
        );
    }

    /// Parse a complete program. This is the single entry point.
    pub fn program(mut self) -> Result<Program, ParseFailure> {
        let mut clauses = Vec::new();

        let query = loop {
            match self.stream.kind() {
                TokenKind::Query => break self.query().ok(),
                TokenKind::Eof => {
                    // A missing query after earlier errors is not reported again.
                    if self.diagnostics.is_empty() {
                        self.fail(vec![TokenKind::Atom, TokenKind::Query]);
                    }
                    break None;
                }
                _ => match self.clause() {
                    Ok(clause) => clauses.push(clause),
                    Err(Failed) => self.synchronize(),
                },
            }
        };

        if query.is_some() && !self.stream.at_end() {
            self.fail(vec![TokenKind::Eof]);
        }

        debug!(
            clauses = clauses.len(),
            query = query.is_some(),
            diagnostics = self.diagnostics.len(),
            "parse complete"
        );

        match query {
            Some(query) if self.diagnostics.is_empty() => Ok(Program { clauses, query }),
            query => Err(ParseFailure {
                partial: PartialProgram { clauses, query },
                diagnostics: self.diagnostics,
            }),
        }
    }

    /// clause := predicate ( ':-' predicate_list )? '.'
    fn clause(&mut self) -> PResult<Clause> {
        trace!("clause");
        let head = self.predicate()?;

        if self.stream.check(TokenKind::Rule) {
            self.stream.advance();
            let body = self.predicate_list()?;
            self.expect_list_end(&body, TokenKind::Dot)?;
            Ok(Clause::rule(head, body))
        } else {
            let mut also = open_args(&head).to_vec();
            also.push(TokenKind::Rule);
            self.expect(TokenKind::Dot, &also)?;
            Ok(Clause::fact(head))
        }
    }

    /// query := '?-' predicate_list '.'
    fn query(&mut self) -> PResult<Query> {
        trace!("query");
        let start = self.expect(TokenKind::Query, &[])?;
        let goals = self.predicate_list()?;
        self.expect_list_end(&goals, TokenKind::Dot)?;
        Ok(Query {
            goals,
            span: start.span,
        })
    }

    /// predicate_list := predicate ( ',' predicate )*
    fn predicate_list(&mut self) -> PResult<Vec<Predicate>> {
        let mut predicates = vec![self.predicate()?];
        while self.stream.check(TokenKind::Comma) {
            self.stream.advance();
            predicates.push(self.predicate()?);
        }
        Ok(predicates)
    }

    /// Close a predicate list with `end`; a comma or an argument list
    /// would also have been accepted here.
    fn expect_list_end(&mut self, list: &[Predicate], end: TokenKind) -> PResult<Token> {
        let mut also = list.last().map_or(&[][..], open_args).to_vec();
        also.push(TokenKind::Comma);
        self.expect(end, &also)
    }

    /// predicate := atom ( '(' term_list ')' )?
    fn predicate(&mut self) -> PResult<Predicate> {
        trace!("predicate");
        let functor = self.expect(TokenKind::Atom, &[])?;
        let args = self.arguments()?;
        Ok(Predicate::new(text(functor.literal), args, functor.span))
    }

    /// The optional parenthesized argument list after an atom, shared by
    /// predicates and structures.
    fn arguments(&mut self) -> PResult<Option<Vec<Term>>> {
        if !self.stream.check(TokenKind::LParen) {
            return Ok(None);
        }
        self.stream.advance();
        let args = self.term_list()?;

        let mut also = match args.last() {
            Some(Term::Atom(_)) => vec![TokenKind::LParen],
            _ => Vec::new(),
        };
        also.push(TokenKind::Comma);
        self.expect(TokenKind::RParen, &also)?;
        Ok(Some(args))
    }

    /// term_list := term ( ',' term )*
    fn term_list(&mut self) -> PResult<Vec<Term>> {
        trace!("term_list");
        let mut terms = vec![self.term()?];
        while self.stream.check(TokenKind::Comma) {
            self.stream.advance();
            terms.push(self.term()?);
        }
        Ok(terms)
    }

    /// term := variable | numeral | atom ( '(' term_list ')' )?
    fn term(&mut self) -> PResult<Term> {
        let token = self.stream.current();
        match (token.kind, &token.literal) {
            (TokenKind::Variable, _) => Ok(Term::Variable(text(self.stream.bump().literal))),
            (TokenKind::Numeral, &Literal::Integer(n)) => {
                self.stream.advance();
                Ok(Term::Numeral(n))
            }
            (TokenKind::Atom, _) => {
                let functor = text(self.stream.bump().literal);
                match self.arguments()? {
                    Some(args) => Ok(Term::Structure { functor, args }),
                    None => Ok(Term::Atom(functor)),
                }
            }
            _ => Err(self.fail(TERM_START.to_vec())),
        }
    }
}

/// `(` may follow a predicate that has no argument list yet.
fn open_args(predicate: &Predicate) -> &'static [TokenKind] {
    if predicate.args.is_none() {
        &[TokenKind::LParen]
    } else {
        &[]
    }
}

fn text(literal: Literal) -> String {
    match literal {
        Literal::Text(s) => s,
        Literal::Integer(n) => n.to_string(),
    }
}

/// Parse a scanned token sequence.
pub fn parse(tokens: impl Into<TokenStream>) -> Result<Program, ParseFailure> {
    Parser::new(tokens).program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_str(src: &str) -> Result<Program, ParseFailure> {
        parse(Lexer::new(src).tokenize().unwrap())
    }

    fn failure(src: &str) -> ParseFailure {
        parse_str(src).unwrap_err()
    }

    fn args(terms: &[Term]) -> Option<Vec<Term>> {
        Some(terms.to_vec())
    }

    #[test]
    fn test_parse_fact() {
        let program = parse_str("parent(tom, bob).\n?- parent(tom, bob).").unwrap();
        assert_eq!(program.clauses.len(), 1);
        assert!(program.clauses[0].is_fact());
        assert_eq!(program.clauses[0].head.functor, "parent");
        assert_eq!(
            program.clauses[0].head.args,
            args(&[Term::atom("tom"), Term::atom("bob")])
        );
    }

    #[test]
    fn test_parse_rule() {
        let program =
            parse_str("grandparent(X, Z) :- parent(X, Y), parent(Y, Z).\n?- grandparent(a, b).")
                .unwrap();
        assert_eq!(program.clauses.len(), 1);
        assert!(!program.clauses[0].is_fact());
        assert_eq!(program.clauses[0].goals().len(), 2);
        assert_eq!(program.clauses[0].goals()[1].functor, "parent");
    }

    #[test]
    fn test_parse_query_only() {
        let program = parse_str("?- halt.").unwrap();
        assert!(program.clauses.is_empty());
        assert_eq!(program.query.goals.len(), 1);
        assert_eq!(program.query.goals[0].args, None);
        assert_eq!(program.query.span.column, 0);
    }

    #[test]
    fn test_zero_arity_predicates() {
        let program = parse_str("run :- setup, 'do it', teardown.\n?- run.").unwrap();
        let clause = &program.clauses[0];
        assert_eq!(clause.head.arity(), 0);
        let goals: Vec<&str> = clause.goals().iter().map(|p| p.functor.as_str()).collect();
        assert_eq!(goals, vec!["setup", "do it", "teardown"]);
    }

    #[test]
    fn test_parse_nested_structures() {
        let program = parse_str("?- p(f(g(X,1),Y)).").unwrap();
        assert_eq!(
            program.query.goals[0].args(),
            &[Term::structure(
                "f",
                vec![
                    Term::structure("g", vec![Term::var("X"), Term::Numeral(1)]),
                    Term::var("Y"),
                ],
            )]
        );
    }

    #[test]
    fn test_atom_versus_structure() {
        let program = parse_str("?- p(a, b(c), 'q r', 007).").unwrap();
        assert_eq!(
            program.query.goals[0].args(),
            &[
                Term::atom("a"),
                Term::structure("b", vec![Term::atom("c")]),
                Term::atom("q r"),
                Term::Numeral(7),
            ]
        );
    }

    #[test]
    fn test_predicate_positions() {
        let program = parse_str("a.\n  b(X) :- c(X).\n?- b(1).").unwrap();
        let clause = &program.clauses[1];
        assert_eq!((clause.span.line, clause.span.column), (2, 2));
        assert_eq!(clause.goals()[0].span.column, 10);
        assert_eq!(program.query.span.line, 3);
    }

    #[test]
    fn test_missing_dot_recovers() {
        let err = failure("a(X) :- b(X)\nc(1).\nd(2).\n?- a(1).");
        assert_eq!(err.diagnostics.len(), 1);
        let diag = &err.diagnostics[0];
        assert!(diag.expects(TokenKind::Dot));
        assert!(diag.expects(TokenKind::Comma));
        assert_eq!(diag.found.kind, TokenKind::Atom);
        assert_eq!((diag.line(), diag.column()), (2, 0));
        // `c(1).` was swallowed by recovery, `d(2).` was parsed.
        assert_eq!(err.partial.clauses.len(), 1);
        assert_eq!(err.partial.clauses[0].head.functor, "d");
        assert!(err.partial.query.is_some());
    }

    #[test]
    fn test_missing_dot_before_query() {
        let err = failure("likes(a, b)\n?- likes(a, b).");
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.diagnostics[0].expected, vec![TokenKind::Rule, TokenKind::Dot]);
        assert_eq!(err.diagnostics[0].found.kind, TokenKind::Query);
        assert!(err.partial.clauses.is_empty());
        assert!(err.partial.query.is_some());
    }

    #[test]
    fn test_bare_head_expectations() {
        let err = failure("foo bar.\n?- foo.");
        assert_eq!(
            err.diagnostics[0].expected,
            vec![TokenKind::LParen, TokenKind::Rule, TokenKind::Dot]
        );
    }

    #[test]
    fn test_multiple_errors_in_order() {
        let err = failure("f(.\ng(a b).\nok.\nX.\n?- ok.");
        let positions: Vec<(usize, usize)> = err
            .diagnostics
            .iter()
            .map(|d| (d.line(), d.column()))
            .collect();
        assert_eq!(positions, vec![(1, 2), (2, 4), (4, 0)]);
        assert_eq!(
            err.diagnostics[1].expected,
            vec![TokenKind::LParen, TokenKind::Comma, TokenKind::RParen]
        );
        assert_eq!(err.diagnostics[2].expected, vec![TokenKind::Atom]);
        assert_eq!(err.partial.clauses.len(), 1);
        assert_eq!(err.partial.clauses[0].head.functor, "ok");
    }

    #[test]
    fn test_empty_argument_list() {
        let err = failure("?- f().");
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.diagnostics[0].expected, TERM_START.to_vec());
        assert_eq!(err.diagnostics[0].found.kind, TokenKind::RParen);
        assert!(err.partial.query.is_none());
    }

    #[test]
    fn test_missing_query() {
        let err = failure("a.\nb.");
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(
            err.diagnostics[0].expected,
            vec![TokenKind::Atom, TokenKind::Query]
        );
        assert_eq!(err.diagnostics[0].found.kind, TokenKind::Eof);
        assert_eq!(err.partial.clauses.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let err = parse(Vec::<Token>::new()).unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!((err.diagnostics[0].line(), err.diagnostics[0].column()), (1, 0));
    }

    #[test]
    fn test_numeral_token_without_integer_literal() {
        use crate::token::Span;

        let mut tokens = Lexer::new("?- p(1).").tokenize().unwrap();
        let numeral = &mut tokens[3];
        assert_eq!(numeral.kind, TokenKind::Numeral);
        numeral.literal = Literal::Text("1".to_string());
        let span: Span = numeral.span;

        let err = parse(tokens).unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert!(err.diagnostics[0].expects(TokenKind::Numeral));
        assert_eq!(err.diagnostics[0].found.span, span);
    }

    #[test]
    fn test_malformed_query_keeps_clauses() {
        let err = failure("a.\nb :- a.\n?- b(.");
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.partial.clauses.len(), 2);
        assert!(err.partial.query.is_none());
    }

    #[test]
    fn test_query_missing_dot() {
        let err = failure("?- a, b");
        assert_eq!(
            err.diagnostics[0].expected,
            vec![TokenKind::LParen, TokenKind::Comma, TokenKind::Dot]
        );
        assert_eq!(err.diagnostics[0].found.kind, TokenKind::Eof);
    }

    #[test]
    fn test_trailing_tokens_after_query() {
        let err = failure("?- a.\nb.");
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.diagnostics[0].expected, vec![TokenKind::Eof]);
        assert_eq!(err.diagnostics[0].line(), 2);
        assert!(err.partial.query.is_some());
    }

    #[test]
    fn test_recovery_at_end_without_dot() {
        let err = failure("a(X :- b");
        assert_eq!(err.diagnostics.len(), 1);
        assert!(err.partial.clauses.is_empty());
    }

    #[test]
    fn test_failure_display() {
        let err = failure("f(.\n?- f(a).");
        assert_eq!(err.to_string(), "parsing failed with 1 syntax error(s)");
    }
}
