use core::cmp::Ordering;
use std::collections::VecDeque;

use motor_core::{
    lexical_compare, squared_distance, ActionBounds, DynamicsModel, MultiObjective, RealVector,
    Result, Scene, SplitMix64,
};
use motor_search::{
    simulate, ConstrainedNelderMead, GridSearch, NelderMeadConfig, SearchResult, TrajEval,
    Trajectory, TreeSearch, TreeSearchConfig,
};
use tracing::debug;

use crate::{parse_objectives, ConfigError, ControllerConfig};

/// Which search fills the plan cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Tree,
    Simplex,
    Grid,
}

impl Strategy {
    /// `"tree"` and `"simplex"` select those searches; any other name selects grid search.
    pub fn from_name(name: &str) -> Self {
        match name {
            "tree" => Self::Tree,
            "simplex" => Self::Simplex,
            _ => Self::Grid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Simplex => "simplex",
            Self::Grid => "grid",
        }
    }
}

impl From<&str> for Strategy {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Result of one [`Controller::seek`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SeekOutcome {
    /// The search itself failed.
    NoOutput,
    /// No plan improves on the current state.
    LocalMinimum,
    /// Next action of the current plan.
    Success(RealVector),
}

impl SeekOutcome {
    pub fn code(&self) -> u8 {
        match self {
            Self::NoOutput => 0,
            Self::LocalMinimum => 1,
            Self::Success(_) => 2,
        }
    }

    pub fn action(&self) -> Option<&RealVector> {
        match self {
            Self::Success(action) => Some(action),
            _ => None,
        }
    }
}

/// Remaining actions of the last accepted plan and what they were predicted to achieve.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCache {
    pub actions: VecDeque<RealVector>,
    pub final_state: RealVector,
    pub value: RealVector,
}

impl PlanCache {
    fn from_result(result: SearchResult) -> Self {
        Self {
            actions: result.trajectory.into_steps().into(),
            final_state: result.final_state,
            value: result.value,
        }
    }
}

/// Plans `depth` steps ahead and serves the plan one action per [`Controller::seek`] call.
///
/// A cached plan is reused as long as it still promises an improvement and the model, re-run
/// from the live state, still ends where it originally predicted. Otherwise the controller
/// replans. The model is owned so callers can retrain it between calls via
/// [`Controller::model_mut`]; drift picks up the change.
pub struct Controller<M> {
    model: M,
    objective: MultiObjective,
    bounds: ActionBounds,
    depth: usize,
    strategy: Strategy,
    drift_threshold: f64,
    simplex: NelderMeadConfig,
    tree: TreeSearchConfig,
    rng: SplitMix64,
    cache: Option<PlanCache>,

    search_calls: u64,
    cache_hits: u64,
    invalidations: u64,
}

impl<M> Controller<M> {
    pub fn new(
        model: M,
        objective: MultiObjective,
        bounds: ActionBounds,
        depth: usize,
        strategy: impl Into<Strategy>,
    ) -> Self {
        let defaults = ControllerConfig::default();
        let simplex = defaults.simplex.to_config();
        Self {
            model,
            objective,
            bounds,
            depth,
            strategy: strategy.into(),
            drift_threshold: defaults.drift_threshold,
            simplex,
            tree: defaults.tree.to_config(depth, simplex),
            rng: SplitMix64::new(defaults.seed),
            cache: None,
            search_calls: 0,
            cache_hits: 0,
            invalidations: 0,
        }
    }

    /// Build a controller from a validated config. The objective chain comes from
    /// `config.objectives`.
    pub fn from_config(model: M, config: &ControllerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let simplex = config.simplex.to_config();
        let objective = parse_objectives(&config.objectives);
        Ok(Self::new(
            model,
            objective,
            config.bounds.clone(),
            config.depth,
            Strategy::from_name(&config.strategy),
        )
        .with_drift_threshold(config.drift_threshold)
        .with_simplex_config(simplex)
        .with_tree_config(config.tree.to_config(config.depth, simplex))
        .with_seed(config.seed))
    }

    pub fn with_drift_threshold(mut self, threshold: f64) -> Self {
        self.drift_threshold = threshold;
        self
    }

    pub fn with_simplex_config(mut self, config: NelderMeadConfig) -> Self {
        self.simplex = config;
        self
    }

    pub fn with_tree_config(mut self, config: TreeSearchConfig) -> Self {
        self.tree = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SplitMix64::new(seed);
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn objective(&self) -> &MultiObjective {
        &self.objective
    }

    pub fn bounds(&self) -> &ActionBounds {
        &self.bounds
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn drift_threshold(&self) -> f64 {
        self.drift_threshold
    }

    pub fn simplex_config(&self) -> &NelderMeadConfig {
        &self.simplex
    }

    pub fn tree_config(&self) -> &TreeSearchConfig {
        &self.tree
    }

    pub fn cached_plan(&self) -> Option<&PlanCache> {
        self.cache.as_ref()
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    /// Number of searches run.
    pub fn search_calls(&self) -> u64 {
        self.search_calls
    }

    /// Number of calls served from a still-valid cached plan.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Number of cached plans discarded as stale.
    pub fn invalidations(&self) -> u64 {
        self.invalidations
    }

    /// Next action toward a lower objective value from `scene`'s current state.
    pub fn seek<S>(&mut self, scene: &S) -> SeekOutcome
    where
        S: Scene,
        M: DynamicsModel<S>,
    {
        let curr_val = self.objective.evaluate(scene);

        if self.cache.is_some() {
            match self.stale_reason(scene, &curr_val) {
                Some(reason) => {
                    debug!(reason, "discarding cached plan");
                    self.cache = None;
                    self.invalidations += 1;
                }
                None => self.cache_hits += 1,
            }
        }

        if self.cache.is_none() {
            self.search_calls += 1;
            match self.plan(scene) {
                Err(err) => {
                    debug!(strategy = self.strategy.as_str(), %err, "search failed");
                    return SeekOutcome::NoOutput;
                }
                Ok(result) => {
                    let improves = lexical_compare(&result.value, &curr_val) == Ordering::Less;
                    if improves && !result.trajectory.is_empty() {
                        debug!(
                            strategy = self.strategy.as_str(),
                            steps = result.trajectory.len(),
                            value = ?result.value,
                            "cached new plan"
                        );
                        self.cache = Some(PlanCache::from_result(result));
                    } else {
                        debug!(value = ?result.value, current = ?curr_val, "search found no improvement");
                    }
                }
            }
        }

        let Some(cache) = self.cache.as_mut() else {
            return SeekOutcome::LocalMinimum;
        };
        let action = cache.actions.pop_front();
        if cache.actions.is_empty() {
            self.cache = None;
        }
        match action {
            Some(action) => SeekOutcome::Success(action),
            None => SeekOutcome::LocalMinimum,
        }
    }

    fn stale_reason<S>(&self, scene: &S, curr_val: &RealVector) -> Option<&'static str>
    where
        S: Scene,
        M: DynamicsModel<S>,
    {
        let cache = self.cache.as_ref()?;
        if lexical_compare(curr_val, &cache.value) != Ordering::Greater {
            return Some("current state already as good as the plan");
        }

        let mut scratch = scene.clone_named("motor-validate");
        let remaining = cache.actions.iter().map(|a| a.as_slice());
        match simulate(&self.model, &mut scratch, &scene.properties(), remaining) {
            Err(_) => Some("remaining plan no longer simulates"),
            Ok(predicted) => {
                let drift = squared_distance(&predicted, &cache.final_state);
                (drift > self.drift_threshold).then_some("predicted final state drifted")
            }
        }
    }

    fn plan<S>(&mut self, scene: &S) -> Result<SearchResult>
    where
        S: Scene,
        M: DynamicsModel<S>,
    {
        let stepsize = self.bounds.stepsize();
        match self.strategy {
            Strategy::Simplex => {
                let mut eval = TrajEval::new(&self.model, &self.objective, scene, stepsize);
                let optimum = ConstrainedNelderMead::new(self.bounds.tile(self.depth))
                    .with_config(self.simplex)
                    .run(&mut eval, &mut self.rng)?;
                Ok(SearchResult {
                    trajectory: Trajectory::from_flat(&optimum.point, stepsize),
                    final_state: optimum.final_state,
                    value: optimum.value,
                })
            }
            Strategy::Tree => {
                let mut tree = TreeSearch::new(
                    &self.model,
                    &self.objective,
                    scene,
                    self.bounds.clone(),
                    self.tree,
                );
                Ok(tree.search(&mut self.rng))
            }
            Strategy::Grid => {
                let mut eval = TrajEval::new(&self.model, &self.objective, scene, stepsize);
                GridSearch::new(self.bounds.clone(), self.depth).run(&mut eval)
            }
        }
    }
}
