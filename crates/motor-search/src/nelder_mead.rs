use core::cmp::Ordering;

use motor_core::{
    argmin_max_min, lexical_compare, ActionBounds, DeterministicRng, DynamicsModel, Extremes,
    RealVector, Result, Scene, SeekError,
};
use tracing::trace;

use crate::{Evaluation, TrajEval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NelderMeadConfig {
    /// Fixed iteration count; there is no convergence test.
    pub iterations: usize,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self { iterations: 50 }
    }
}

/// Best vertex found by [`ConstrainedNelderMead::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Optimum {
    pub point: RealVector,
    pub value: RealVector,
    pub final_state: RealVector,
}

/// Derivative-free simplex search over one bounded flat action vector.
///
/// Reflection and expansion points are clamped into the bounds; contraction and shrink stay
/// inside the hull of in-bounds vertices, so every vertex is always legal.
#[derive(Debug, Clone)]
pub struct ConstrainedNelderMead {
    bounds: ActionBounds,
    config: NelderMeadConfig,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl ConstrainedNelderMead {
    /// `bounds` covers the whole flat vector (see [`ActionBounds::tile`]).
    pub fn new(bounds: ActionBounds) -> Self {
        Self {
            bounds,
            config: NelderMeadConfig::default(),
        }
    }

    pub fn with_config(mut self, config: NelderMeadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bounds(&self) -> &ActionBounds {
        &self.bounds
    }

    pub fn ndim(&self) -> usize {
        self.bounds.stepsize()
    }

    pub fn run<S, M>(
        &self,
        eval: &mut TrajEval<'_, S, M>,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Optimum>
    where
        S: Scene,
        M: DynamicsModel<S> + ?Sized,
    {
        let ndim = self.ndim();
        if ndim == 0 {
            return Err(SeekError::EmptyTrajectory);
        }

        let mut vertices: Vec<RealVector> = Vec::with_capacity(ndim + 1);
        let mut evals: Vec<Evaluation> = Vec::with_capacity(ndim + 1);
        for _ in 0..=ndim {
            let vertex = self.bounds.sample(rng);
            evals.push(eval.eval(&vertex)?);
            vertices.push(vertex);
        }

        let mut ext = extremes(&evals);
        for iteration in 0..self.config.iterations {
            ext = extremes(&evals);
            let Extremes {
                worst,
                nextworst,
                best,
            } = ext;

            let centroid = centroid_excluding(&vertices, worst);
            let toward = &centroid - &vertices[worst];

            let mut reflect = &centroid + &(&toward * REFLECT);
            self.bounds.constrain(&mut reflect);
            let reflected = eval.eval(&reflect)?;

            let vs_best = lexical_compare(&reflected.value, &evals[best].value);
            if vs_best != Ordering::Less
                && lexical_compare(&reflected.value, &evals[nextworst].value) == Ordering::Less
            {
                trace!(iteration, "nelder-mead reflect");
                vertices[worst] = reflect;
                evals[worst] = reflected;
                continue;
            }

            if vs_best == Ordering::Less {
                let mut expand = &centroid + &(&toward * EXPAND);
                self.bounds.constrain(&mut expand);
                let expanded = eval.eval(&expand)?;
                if lexical_compare(&expanded.value, &reflected.value) == Ordering::Less {
                    trace!(iteration, "nelder-mead expand");
                    vertices[worst] = expand;
                    evals[worst] = expanded;
                } else {
                    trace!(iteration, "nelder-mead reflect (expansion rejected)");
                    vertices[worst] = reflect;
                    evals[worst] = reflected;
                }
                continue;
            }

            let contract = &vertices[worst] + &(&toward * CONTRACT);
            let contracted = eval.eval(&contract)?;
            if lexical_compare(&contracted.value, &evals[worst].value) == Ordering::Less {
                trace!(iteration, "nelder-mead contract");
                vertices[worst] = contract;
                evals[worst] = contracted;
                continue;
            }

            trace!(iteration, "nelder-mead shrink");
            for i in 0..vertices.len() {
                if i == best {
                    continue;
                }
                let offset = &vertices[i] - &vertices[best];
                let moved = &vertices[best] + &(&offset * SHRINK);
                evals[i] = eval.eval(&moved)?;
                vertices[i] = moved;
            }
        }

        let best = ext.best;
        let Evaluation { value, final_state } = evals.swap_remove(best);
        Ok(Optimum {
            point: vertices.swap_remove(best),
            value,
            final_state,
        })
    }
}

fn extremes(evals: &[Evaluation]) -> Extremes {
    let values: Vec<&[f64]> = evals.iter().map(|e| e.value.as_slice()).collect();
    argmin_max_min(&values)
}

fn centroid_excluding(vertices: &[RealVector], skip: usize) -> RealVector {
    let ndim = vertices[0].len();
    let mut sum = RealVector::zeros(ndim);
    for (i, v) in vertices.iter().enumerate() {
        if i == skip {
            continue;
        }
        for (s, x) in sum.iter_mut().zip(v.iter()) {
            *s += x;
        }
    }
    let count = (vertices.len() - 1).max(1) as f64;
    &sum * (1.0 / count)
}
