use thiserror::Error;

/// Failures that abort a single search or simulation call.
///
/// Unresolvable scene objects are not errors: objectives report them as `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeekError {
    #[error("dynamics model rejected step {step} of the trajectory")]
    Prediction { step: usize },

    #[error("search space has no dimensions")]
    EmptyTrajectory,
}

pub type Result<T> = std::result::Result<T, SeekError>;
