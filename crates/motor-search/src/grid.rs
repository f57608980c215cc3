use core::cmp::Ordering;

use motor_core::{
    lexical_compare, ActionBounds, DynamicsModel, RealVector, Result, Scene, SeekError,
};
use tracing::debug;

use crate::{Evaluation, SearchResult, TrajEval, Trajectory};

/// Mixed-radix counter over a discretised box.
///
/// Each digit `i` ranges over `min[i], min[i] + inc[i], ...` up to `max[i]`. Digits are kept as
/// integer counters, so float accumulation never adds or drops a grid point. A missing or
/// non-positive increment pins the digit to `min[i]`.
#[derive(Debug, Clone)]
pub struct Odometer {
    min: Vec<f64>,
    increment: Vec<f64>,
    radix: Vec<usize>,
    digits: Vec<usize>,
    value: RealVector,
}

impl Odometer {
    pub fn new(bounds: &ActionBounds) -> Self {
        let n = bounds.stepsize();
        let mut radix = Vec::with_capacity(n);
        let mut increment = Vec::with_capacity(n);
        for i in 0..n {
            let (lo, hi, inc) = (bounds.min[i], bounds.max[i], bounds.increment_at(i));
            if inc > 0.0 && hi >= lo {
                radix.push(((hi - lo) / inc + 1e-9).floor() as usize + 1);
            } else {
                radix.push(1);
            }
            increment.push(inc);
        }

        Self {
            min: bounds.min.to_vec(),
            increment,
            radix,
            digits: vec![0; n],
            value: bounds.min.clone(),
        }
    }

    pub fn current(&self) -> &RealVector {
        &self.value
    }

    /// Total number of points, saturating.
    pub fn combinations(&self) -> usize {
        self.radix.iter().fold(1usize, |acc, r| acc.saturating_mul(*r))
    }

    /// Advance to the next point. Returns false once every digit has wrapped.
    pub fn next(&mut self) -> bool {
        for i in (0..self.digits.len()).rev() {
            self.digits[i] += 1;
            if self.digits[i] < self.radix[i] {
                self.value[i] = self.min[i] + self.digits[i] as f64 * self.increment[i];
                return true;
            }
            self.digits[i] = 0;
            self.value[i] = self.min[i];
        }
        false
    }
}

/// Exhaustive enumeration of every discretised `depth`-step trajectory.
///
/// Ties on the objective go to the trajectory with the smaller squared norm.
#[derive(Debug, Clone)]
pub struct GridSearch {
    step_bounds: ActionBounds,
    depth: usize,
}

impl GridSearch {
    pub fn new(step_bounds: ActionBounds, depth: usize) -> Self {
        Self { step_bounds, depth }
    }

    pub fn combinations(&self) -> usize {
        Odometer::new(&self.step_bounds.tile(self.depth)).combinations()
    }

    pub fn run<S, M>(&self, eval: &mut TrajEval<'_, S, M>) -> Result<SearchResult>
    where
        S: Scene,
        M: DynamicsModel<S> + ?Sized,
    {
        let flat_bounds = self.step_bounds.tile(self.depth);
        if flat_bounds.stepsize() == 0 {
            return Err(SeekError::EmptyTrajectory);
        }

        let mut odometer = Odometer::new(&flat_bounds);
        let mut best: Option<(RealVector, Evaluation, f64)> = None;
        let mut visited = 0usize;

        loop {
            let candidate = odometer.current();
            let evaluation = eval.eval(candidate)?;
            let norm = candidate.squared_norm();
            visited += 1;

            let better = match &best {
                None => true,
                Some((_, incumbent, incumbent_norm)) => {
                    match lexical_compare(&evaluation.value, &incumbent.value) {
                        Ordering::Less => true,
                        Ordering::Equal => norm < *incumbent_norm,
                        Ordering::Greater => false,
                    }
                }
            };
            if better {
                best = Some((candidate.clone(), evaluation, norm));
            }

            if !odometer.next() {
                break;
            }
        }

        let (point, evaluation, _) = best.ok_or(SeekError::EmptyTrajectory)?;
        debug!(visited, value = ?evaluation.value, "grid search finished");
        Ok(SearchResult {
            trajectory: Trajectory::from_flat(&point, self.step_bounds.stepsize()),
            final_state: evaluation.final_state,
            value: evaluation.value,
        })
    }
}
