//! Random tokens and the process-wide random source
//!
//! The harness owns a single [`SeededRandom`], seeded once from the wall
//! clock at startup. Callers borrow it as `&mut dyn RandomSource`, which lets
//! tests substitute a fixed seed or a scripted sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Alphabet used for path-prefix tokens
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Source of uniform random indices
pub trait RandomSource {
    /// Uniform index in `0..upper`. `upper` must be non-zero.
    fn pick(&mut self, upper: usize) -> usize;
}

/// `StdRng`-backed random source
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
    seed: u64,
}

impl SeededRandom {
    /// Seed from the nanoseconds of the current wall-clock time
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(nanos)
    }

    /// Deterministic source, used by tests and reproducible runs
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Random alphanumeric token of exactly `length` characters
pub fn generate_token(rng: &mut dyn RandomSource, length: usize) -> String {
    (0..length)
        .map(|_| TOKEN_ALPHABET[rng.pick(TOKEN_ALPHABET.len())] as char)
        .collect()
}
