use core::cmp::Ordering;
use std::iter;

use motor_core::{
    lexical_compare, ActionBounds, DeterministicRng, DynamicsModel, MultiObjective, RealVector,
    Result, Scene,
};
use tracing::debug;

use crate::{ConstrainedNelderMead, NelderMeadConfig, SearchResult, TrajEval, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeSearchConfig {
    /// Upper bound on `expand()` calls per search.
    pub iterations: usize,
    /// Extend a random nonleaf instead of a leaf once `avg_depth / avg_bf` exceeds this.
    pub threshold: f64,
    /// Longest local descent, and longest repetition of one random action.
    pub max_steps: usize,
    /// Simplex settings for each single-step descent.
    pub simplex: NelderMeadConfig,
}

impl Default for TreeSearchConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            threshold: 1.0,
            max_steps: 4,
            simplex: NelderMeadConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct SearchNode {
    trajectory: Vec<RealVector>,
    state: RealVector,
    value: RealVector,
    tried_seek: bool,
}

/// Stochastic tree of partial trajectories.
///
/// Nodes live in an arena and are addressed by index; `leafs` and `nonleafs` are index sets into
/// it. Children that fail to extend are never pushed, so every arena entry is reachable.
pub struct TreeSearch<'m, S, M: ?Sized> {
    eval: TrajEval<'m, S, M>,
    step_bounds: ActionBounds,
    descent: ConstrainedNelderMead,
    config: TreeSearchConfig,
    nodes: Vec<SearchNode>,
    leafs: Vec<usize>,
    nonleafs: Vec<usize>,
    best: usize,
    total_depth: usize,
}

impl<'m, S, M> TreeSearch<'m, S, M>
where
    S: Scene,
    M: DynamicsModel<S> + ?Sized,
{
    /// Root the tree at the scene's current state. `step_bounds` bounds a single action.
    pub fn new(
        model: &'m M,
        objective: &'m MultiObjective,
        scene: &S,
        step_bounds: ActionBounds,
        config: TreeSearchConfig,
    ) -> Self {
        let eval = TrajEval::new(model, objective, scene, step_bounds.stepsize());
        let root = SearchNode {
            trajectory: Vec::new(),
            state: scene.properties(),
            value: objective.evaluate(scene),
            tried_seek: false,
        };
        let descent = ConstrainedNelderMead::new(step_bounds.clone()).with_config(config.simplex);

        Self {
            eval,
            step_bounds,
            descent,
            config,
            nodes: vec![root],
            leafs: vec![0],
            nonleafs: Vec::new(),
            best: 0,
            total_depth: 0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leafs(&self) -> usize {
        self.leafs.len()
    }

    pub fn num_nonleafs(&self) -> usize {
        self.nonleafs.len()
    }

    pub fn avg_depth(&self) -> f64 {
        self.total_depth as f64 / self.nodes.len() as f64
    }

    /// Average branching factor; infinite while nothing has been extended.
    pub fn avg_bf(&self) -> f64 {
        self.nodes.len() as f64 / self.nonleafs.len() as f64
    }

    pub fn root_value(&self) -> &RealVector {
        &self.nodes[0].value
    }

    pub fn best_value(&self) -> &RealVector {
        &self.nodes[self.best].value
    }

    /// Grow the tree by one node. Returns true iff the new node beats the best so far.
    pub fn expand(&mut self, rng: &mut dyn DeterministicRng) -> bool {
        let pick_nonleaf = !self.nonleafs.is_empty()
            && self.avg_depth() / self.avg_bf() > self.config.threshold;

        let (slot, parent) = if pick_nonleaf {
            let slot = rng.gen_index(self.nonleafs.len());
            (slot, self.nonleafs[slot])
        } else {
            let slot = rng.gen_index(self.leafs.len());
            (slot, self.leafs[slot])
        };

        let Some(child) = self.extend(parent, rng) else {
            return false;
        };

        if !pick_nonleaf {
            self.leafs.swap_remove(slot);
            self.nonleafs.push(parent);
        }

        let improved = lexical_compare(&child.value, &self.nodes[self.best].value) == Ordering::Less;
        let child_idx = self.nodes.len();
        self.total_depth += child.trajectory.len();
        self.nodes.push(child);
        self.leafs.push(child_idx);
        if improved {
            self.best = child_idx;
        }
        improved
    }

    /// Expand up to `config.iterations` times, stopping at the first improvement.
    ///
    /// This is a first-improvement search: the loop ends as soon as any node beats the root,
    /// even if iterations remain.
    pub fn search(&mut self, rng: &mut dyn DeterministicRng) -> SearchResult {
        for iteration in 0..self.config.iterations {
            if self.expand(rng) {
                debug!(
                    iteration,
                    nodes = self.nodes.len(),
                    "tree search improved on root"
                );
                break;
            }
        }
        self.best_result()
    }

    pub fn best_result(&self) -> SearchResult {
        let best = &self.nodes[self.best];
        SearchResult {
            trajectory: Trajectory::from_steps(self.step_bounds.stepsize(), best.trajectory.clone()),
            final_state: best.state.clone(),
            value: best.value.clone(),
        }
    }

    fn extend(&mut self, parent: usize, rng: &mut dyn DeterministicRng) -> Option<SearchNode> {
        let outcome = if self.nodes[parent].tried_seek {
            self.random_step(parent, rng).map(Some)
        } else {
            self.nodes[parent].tried_seek = true;
            self.seek(parent, rng)
        };

        match outcome {
            Ok(child) => child,
            Err(err) => {
                debug!(parent, %err, "tree node extension failed");
                None
            }
        }
    }

    /// Greedy local descent: one single-step simplex optimisation per step, kept only while it
    /// strictly improves. `Ok(None)` means the very first step did not improve.
    fn seek(&mut self, parent: usize, rng: &mut dyn DeterministicRng) -> Result<Option<SearchNode>> {
        let node = &self.nodes[parent];
        let mut trajectory = node.trajectory.clone();
        let mut state = node.state.clone();
        let mut value = node.value.clone();

        let mut improving = 0;
        while improving < self.config.max_steps {
            self.eval.set_initial_state(&state);
            let step = self.descent.run(&mut self.eval, rng)?;
            if lexical_compare(&step.value, &value) != Ordering::Less {
                break;
            }
            trajectory.push(step.point);
            state = step.final_state;
            value = step.value;
            improving += 1;
        }

        if improving == 0 {
            return Ok(None);
        }
        Ok(Some(SearchNode {
            trajectory,
            state,
            value,
            tried_seek: false,
        }))
    }

    /// One random legal action, repeated between 1 and `max_steps` times.
    fn random_step(&mut self, parent: usize, rng: &mut dyn DeterministicRng) -> Result<SearchNode> {
        let action = self.step_bounds.sample(rng);
        let reps = rng.gen_range_inclusive(1, self.config.max_steps.max(1));
        let flat: RealVector = (0..reps).flat_map(|_| action.iter().copied()).collect();

        let start = self.nodes[parent].state.clone();
        self.eval.set_initial_state(&start);
        let evaluation = self.eval.eval(&flat)?;

        let mut trajectory = self.nodes[parent].trajectory.clone();
        trajectory.extend(iter::repeat(action).take(reps));
        Ok(SearchNode {
            trajectory,
            state: evaluation.final_state,
            value: evaluation.value,
            tried_seek: false,
        })
    }
}
