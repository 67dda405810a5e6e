//! Token sources: where freshly generated tokens come from.

use rand::Rng;

use crate::board::Token;

/// Supplies new tokens for the initial fill and for gravity refill.
pub trait TokenSource {
    /// Next token in `0..palette_size`. Callers never pass a zero palette.
    fn next_token(&mut self, palette_size: u8) -> Token;
}

/// Any `rand` generator draws tokens uniformly from the palette.
impl<R: Rng> TokenSource for R {
    fn next_token(&mut self, palette_size: u8) -> Token {
        self.random_range(0..palette_size)
    }
}

/// Replays a fixed token sequence, wrapping around when exhausted.
///
/// Useful for puzzles with a known refill and for pinning cascades in tests.
/// Tokens larger than the palette are reduced modulo the palette size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScript {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenScript {
    pub fn new(tokens: impl Into<Vec<Token>>) -> Self {
        Self {
            tokens: tokens.into(),
            cursor: 0,
        }
    }

    /// Number of tokens handed out so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl TokenSource for TokenScript {
    fn next_token(&mut self, palette_size: u8) -> Token {
        if self.tokens.is_empty() || palette_size == 0 {
            return 0;
        }
        let token = self.tokens[self.cursor % self.tokens.len()] % palette_size;
        self.cursor += 1;
        token
    }
}
