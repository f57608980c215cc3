use crate::{constrain, DeterministicRng, RealVector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Legal range of one action vector (`stepsize` dimensions).
///
/// `increment` is only read by grid search; a missing or non-positive entry pins that dimension
/// to `min`. `min[i] <= max[i]` is a caller precondition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionBounds {
    pub min: RealVector,
    pub max: RealVector,
    #[cfg_attr(feature = "serde", serde(default))]
    pub increment: RealVector,
}

impl ActionBounds {
    pub fn new(min: impl Into<RealVector>, max: impl Into<RealVector>) -> Self {
        let min = min.into();
        let max = max.into();
        debug_assert_eq!(min.len(), max.len(), "bounds length mismatch");
        Self {
            increment: RealVector::zeros(min.len()),
            min,
            max,
        }
    }

    pub fn with_increment(mut self, increment: impl Into<RealVector>) -> Self {
        self.increment = increment.into();
        self
    }

    pub fn stepsize(&self) -> usize {
        self.min.len()
    }

    /// Equal lengths and `min <= max` everywhere.
    pub fn is_well_formed(&self) -> bool {
        self.min.len() == self.max.len()
            && self.min.iter().zip(self.max.iter()).all(|(lo, hi)| lo <= hi)
    }

    pub fn increment_at(&self, i: usize) -> f64 {
        self.increment.get(i).copied().unwrap_or(0.0)
    }

    /// Bounds for `depth` consecutive steps, flattened.
    pub fn tile(&self, depth: usize) -> ActionBounds {
        let repeat = |v: &RealVector| -> RealVector {
            (0..depth).flat_map(|_| v.iter().copied()).collect()
        };
        let increment: RealVector = (0..self.stepsize()).map(|i| self.increment_at(i)).collect();
        ActionBounds {
            min: repeat(&self.min),
            max: repeat(&self.max),
            increment: repeat(&increment),
        }
    }

    pub fn contains(&self, v: &[f64]) -> bool {
        v.len() == self.min.len()
            && v
                .iter()
                .zip(self.min.iter().zip(self.max.iter()))
                .all(|(x, (lo, hi))| x >= lo && x <= hi)
    }

    pub fn constrain(&self, v: &mut [f64]) {
        constrain(v, &self.min, &self.max);
    }

    /// Uniform draw inside the bounds.
    pub fn sample(&self, rng: &mut dyn DeterministicRng) -> RealVector {
        self.min
            .iter()
            .zip(self.max.iter())
            .map(|(lo, hi)| rng.gen_range_f64(*lo, *hi))
            .collect()
    }
}

/// One-shot exploration entry point: a random legal action, no model or objective involved.
pub fn random_action(bounds: &ActionBounds, rng: &mut dyn DeterministicRng) -> RealVector {
    bounds.sample(rng)
}
