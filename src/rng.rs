//! Random sources for selection and cosmetic rolls.
//!
//! Everything random in a generation call goes through [`RandomSource`], so
//! tests can script the exact outcomes while the binaries use a seeded or
//! OS-seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait RandomSource {
    /// Returns an index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize, reason: &str) -> usize;

    /// Returns a fresh value for result keys.
    fn next_nonce(&mut self) -> u64;

    /// True with probability `1 / denominator`.
    fn one_in(&mut self, denominator: u32, reason: &str) -> bool {
        self.pick_index(denominator as usize, reason) == 0
    }

    /// Picks an element uniformly, or `None` for an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T], reason: &str) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.pick_index(items.len(), reason)])
        }
    }
}

/// Production source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: StdRng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, OS-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRng {
    fn pick_index(&mut self, len: usize, _reason: &str) -> usize {
        self.rng.random_range(0..len)
    }

    fn next_nonce(&mut self) -> u64 {
        self.rng.random()
    }
}

/// Test source that replays a fixed list of indices.
///
/// Each scripted value is reduced modulo the requested range, so a script can
/// be written without knowing every pool size in advance. Nonces are a plain
/// counter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    outcomes: VecDeque<usize>,
    nonce: u64,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<usize>) -> Self {
        Self {
            outcomes: outcomes.into(),
            nonce: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }
}

impl RandomSource for ScriptedRng {
    fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        let outcome = match self.outcomes.pop_front() {
            Some(outcome) => outcome,
            None => panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more scripted values.",
                reason
            ),
        };

        #[cfg(test)]
        println!("[RNG] Consumed {} (of {}) for: {}", outcome, len, reason);

        outcome % len
    }

    fn next_nonce(&mut self) -> u64 {
        self.nonce += 1;
        self.nonce
    }
}
