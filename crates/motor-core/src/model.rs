use crate::{PointScene, RealVector, Scene, Vec3};

/// Learned forward dynamics, treated as a black box.
///
/// `input` is `[state, action]` concatenated. Returning `None` means the input is inapplicable or
/// out of distribution. Implementations must be side-effect free: search calls `predict` many
/// times per decision step and expects identical answers for identical inputs.
pub trait DynamicsModel<S: Scene> {
    fn predict(
        &self,
        signature: &S::Signature,
        relations: &S::Relations,
        input: &[f64],
    ) -> Option<RealVector>;
}

impl<S, M> DynamicsModel<S> for &M
where
    S: Scene,
    M: DynamicsModel<S> + ?Sized,
{
    fn predict(
        &self,
        signature: &S::Signature,
        relations: &S::Relations,
        input: &[f64],
    ) -> Option<RealVector> {
        (**self).predict(signature, relations, input)
    }
}

/// Reference model for [`PointScene`]: translates one movable node by the action.
///
/// Only the first three action components are used (x, y, z). Predictions that would move the
/// node outside `workspace` fail, which stands in for an out-of-distribution query.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorModel {
    /// Index of the driven node in the scene's movable list.
    pub target: usize,
    pub gain: f64,
    /// Optional per-component clamp on the applied displacement.
    pub max_step: Option<f64>,
    pub workspace: Option<(Vec3, Vec3)>,
}

impl Default for IntegratorModel {
    fn default() -> Self {
        Self {
            target: 0,
            gain: 1.0,
            max_step: None,
            workspace: None,
        }
    }
}

impl IntegratorModel {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = Some(max_step);
        self
    }

    pub fn with_workspace(mut self, min: Vec3, max: Vec3) -> Self {
        self.workspace = Some((min, max));
        self
    }
}

impl DynamicsModel<PointScene> for IntegratorModel {
    fn predict(
        &self,
        signature: &<PointScene as Scene>::Signature,
        _relations: &<PointScene as Scene>::Relations,
        input: &[f64],
    ) -> Option<RealVector> {
        let state_len = signature.state_len();
        if input.len() < state_len || self.target >= signature.movable.len() {
            return None;
        }

        let (state, action) = input.split_at(state_len);
        let mut next = RealVector::from(state);
        let base = 3 * self.target;
        for (i, a) in action.iter().take(3).enumerate() {
            let mut delta = a * self.gain;
            if let Some(limit) = self.max_step {
                delta = delta.max(-limit).min(limit);
            }
            next[base + i] += delta;
        }

        if let Some((lo, hi)) = self.workspace {
            let p = Vec3::new(next[base], next[base + 1], next[base + 2]);
            let inside = p.x >= lo.x
                && p.x <= hi.x
                && p.y >= lo.y
                && p.y <= hi.y
                && p.z >= lo.z
                && p.z <= hi.z;
            if !inside {
                return None;
            }
        }

        Some(next)
    }
}
