use motor_core::{DynamicsModel, MultiObjective, RealVector, Result, Scene, SeekError};

/// Roll `steps` forward through `model`, starting at `initial`.
///
/// `scene` is a scratch copy: its properties are overwritten with the running state before every
/// prediction so relations are extracted from the right configuration. The first rejected
/// prediction aborts the rollout. An empty sequence returns `initial` unchanged.
pub fn simulate<'a, S, M, I>(
    model: &M,
    scene: &mut S,
    initial: &[f64],
    steps: I,
) -> Result<RealVector>
where
    S: Scene,
    M: DynamicsModel<S> + ?Sized,
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut state = RealVector::from(initial);
    for (step, action) in steps.into_iter().enumerate() {
        scene.set_properties(&state);
        let relations = scene.relations();
        let input = RealVector::concat(&[state.as_slice(), action]);
        state = model
            .predict(scene.signature(), &relations, &input)
            .ok_or(SeekError::Prediction { step })?;
    }
    Ok(state)
}

/// Outcome of evaluating one candidate trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: RealVector,
    pub final_state: RealVector,
}

/// Repeated trajectory evaluation against a fixed starting point.
///
/// Owns a working copy of the scene, cloned once, so the caller's scene is never touched no
/// matter how many candidates are evaluated.
pub struct TrajEval<'m, S, M: ?Sized> {
    model: &'m M,
    objective: &'m MultiObjective,
    scratch: S,
    initial: RealVector,
    stepsize: usize,
    evaluations: u64,
}

impl<'m, S, M> TrajEval<'m, S, M>
where
    S: Scene,
    M: DynamicsModel<S> + ?Sized,
{
    pub fn new(model: &'m M, objective: &'m MultiObjective, scene: &S, stepsize: usize) -> Self {
        Self {
            model,
            objective,
            scratch: scene.clone_named("motor-scratch"),
            initial: scene.properties(),
            stepsize,
            evaluations: 0,
        }
    }

    pub fn stepsize(&self) -> usize {
        self.stepsize
    }

    pub fn initial_state(&self) -> &RealVector {
        &self.initial
    }

    /// Rebase subsequent evaluations on `state`.
    pub fn set_initial_state(&mut self, state: &[f64]) {
        self.initial = RealVector::from(state);
    }

    /// Number of candidate trajectories evaluated so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Evaluate a flat trajectory (`k * stepsize` long) from the initial state.
    pub fn eval(&mut self, flat: &[f64]) -> Result<Evaluation> {
        if self.stepsize == 0 {
            return Err(SeekError::EmptyTrajectory);
        }
        debug_assert_eq!(flat.len() % self.stepsize, 0, "flat length not a multiple of stepsize");

        self.evaluations += 1;
        let final_state = simulate(
            self.model,
            &mut self.scratch,
            &self.initial,
            flat.chunks_exact(self.stepsize),
        )?;
        let value = self.value_at(&final_state);
        Ok(Evaluation { value, final_state })
    }

    /// Multi-objective value with the scratch scene placed at `state`.
    pub fn value_at(&mut self, state: &[f64]) -> RealVector {
        self.scratch.set_properties(state);
        self.objective.evaluate(&self.scratch)
    }
}
