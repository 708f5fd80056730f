//! RNG module - deterministic token generation
//!
//! Board generation and refills draw tokens through the [`TokenSource`] trait
//! so the host decides where randomness comes from. [`SimpleRng`] is the
//! default source: a small LCG that makes every game reproducible from its
//! seed.

use crate::types::Token;

/// Source of new tokens for board generation and refill
pub trait TokenSource {
    /// Draw a token from the first `palette` entries of [`Token::PALETTE`].
    ///
    /// Must never return [`Token::Empty`].
    fn next_token(&mut self, palette: usize) -> Token;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of an LCG cycle with a short period; use the high half.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Current generator state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TokenSource for SimpleRng {
    fn next_token(&mut self, palette: usize) -> Token {
        let palette = palette.clamp(1, Token::PALETTE.len());
        Token::PALETTE[self.next_range(palette as u32) as usize]
    }
}
