//! Deterministic RNG helpers.
//!
//! This is intentionally small and dependency-free. It is **not** cryptographic. Every search entry
//! point takes `&mut dyn DeterministicRng` so tests can pin a seed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform in `[0, 1)` using the top 53 bits.
    fn next_f64_unit(&mut self) -> f64 {
        let x = self.next_u64() >> 11;
        (x as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `[lo, hi)`; returns `lo` when the range is degenerate.
    fn gen_range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64_unit()
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    fn gen_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "gen_index on empty range");
        (((self.next_u64() as u128) * (n as u128)) >> 64) as usize
    }

    /// Uniform integer in `lo..=hi`.
    fn gen_range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        lo + self.gen_index(hi - lo + 1)
    }
}

/// SplitMix64: good seeding RNG and small deterministic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.step()
    }
}
