//! Abstract Syntax Tree definitions.
//!
//! Defines the data structures representing a parsed program:
//! terms, predicates, clauses, the terminal query, and the program itself.
//! Nodes are built once by the parser and never mutated afterwards.

use crate::token::Span;

/// A complete program: clauses followed by the mandatory query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Facts and rules, in source order
    pub clauses: Vec<Clause>,
    /// The terminal query
    pub query: Query,
}

impl Program {
    pub fn facts(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| c.is_fact())
    }

    pub fn rules(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| !c.is_fact())
    }
}

/// Whatever was recovered from a source that failed to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialProgram {
    pub clauses: Vec<Clause>,
    /// Absent when the query was missing or malformed.
    pub query: Option<Query>,
}

/// A clause: fact or rule.
///
/// A fact has no body: `parent(tom, bob).`
/// A rule has a body: `grandparent(X, Z) :- parent(X, Y), parent(Y, Z).`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub head: Predicate,
    pub body: Option<Vec<Predicate>>,
    /// Position of the head's functor
    pub span: Span,
}

impl Clause {
    /// Create a new fact (clause without a body).
    pub fn fact(head: Predicate) -> Self {
        let span = head.span;
        Self {
            head,
            body: None,
            span,
        }
    }

    /// Create a new rule.
    pub fn rule(head: Predicate, body: Vec<Predicate>) -> Self {
        let span = head.span;
        Self {
            head,
            body: Some(body),
            span,
        }
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_none()
    }

    /// The body goals; empty for facts.
    pub fn goals(&self) -> &[Predicate] {
        self.body.as_deref().unwrap_or(&[])
    }

    /// Get the predicate name and arity of this clause.
    pub fn predicate_key(&self) -> (&str, usize) {
        (&self.head.functor, self.head.arity())
    }
}

/// The terminal query: `?- goal, goal, ... .`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Never empty
    pub goals: Vec<Predicate>,
    /// Position of the `?-` token
    pub span: Span,
}

/// A clause head or goal: a functor with an optional argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub functor: String,
    /// `None` for a bare atom used as a predicate
    pub args: Option<Vec<Term>>,
    /// Position of the functor token
    pub span: Span,
}

impl Predicate {
    pub fn new(functor: impl Into<String>, args: Option<Vec<Term>>, span: Span) -> Self {
        Self {
            functor: functor.into(),
            args,
            span,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.as_ref().map_or(0, Vec::len)
    }

    pub fn args(&self) -> &[Term] {
        self.args.as_deref().unwrap_or(&[])
    }
}

/// A first-order term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Atom (symbol), bare or quoted
    Atom(String),
    /// Variable
    Variable(String),
    /// Unsigned integer literal
    Numeral(u64),
    /// Compound term: functor(arg1, arg2, ...)
    Structure { functor: String, args: Vec<Term> },
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Create a structure. `args` must not be empty.
    pub fn structure(functor: impl Into<String>, args: Vec<Term>) -> Self {
        debug_assert!(!args.is_empty(), "structures have arity >= 1");
        Term::Structure {
            functor: functor.into(),
            args,
        }
    }
}
