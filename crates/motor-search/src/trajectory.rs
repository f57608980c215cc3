use motor_core::RealVector;

/// Per-step action vectors, each `stepsize` long.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    stepsize: usize,
    steps: Vec<RealVector>,
}

impl Trajectory {
    pub fn new(stepsize: usize) -> Self {
        Self {
            stepsize,
            steps: Vec::new(),
        }
    }

    pub fn from_steps(stepsize: usize, steps: Vec<RealVector>) -> Self {
        debug_assert!(steps.iter().all(|s| s.len() == stepsize), "step length mismatch");
        Self { stepsize, steps }
    }

    /// Re-segment a flat vector of length `depth * stepsize`.
    pub fn from_flat(flat: &[f64], stepsize: usize) -> Self {
        if stepsize == 0 {
            return Self::new(0);
        }
        debug_assert_eq!(flat.len() % stepsize, 0, "flat length not a multiple of stepsize");
        Self {
            stepsize,
            steps: flat.chunks_exact(stepsize).map(RealVector::from).collect(),
        }
    }

    pub fn flatten(&self) -> RealVector {
        self.steps.iter().flat_map(|s| s.iter().copied()).collect()
    }

    pub fn stepsize(&self) -> usize {
        self.stepsize
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[RealVector] {
        &self.steps
    }

    pub fn push(&mut self, step: RealVector) {
        debug_assert_eq!(step.len(), self.stepsize, "step length mismatch");
        self.steps.push(step);
    }

    pub fn into_steps(self) -> Vec<RealVector> {
        self.steps
    }
}

/// Output of every search method.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub trajectory: Trajectory,
    /// State predicted after the whole trajectory.
    pub final_state: RealVector,
    /// Multi-objective value at `final_state`.
    pub value: RealVector,
}
