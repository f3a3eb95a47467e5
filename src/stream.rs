//! Forward-only cursor over a scanned token sequence.

use crate::token::{Span, Token, TokenKind};

/// Owns the tokens of one source and a cursor into them.
///
/// Past the last token, [`current`](Self::current) returns an end-of-stream
/// sentinel positioned right after the last real token.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map_or(Span::new(0, 0, 1, 0), |t| t.span.after());
        Self {
            tokens,
            cursor: 0,
            eof: Token::eof(end),
        }
    }

    /// The token at the cursor, or the sentinel.
    pub fn current(&self) -> &Token {
        self.tokens.get(self.cursor).unwrap_or(&self.eof)
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Move forward one token and return the new current token.
    /// Stays on the sentinel once the end is reached.
    pub fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Return the current token and move past it.
    pub fn bump(&mut self) -> Token {
        let token = self.current().clone();
        self.advance();
        token
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
