//! Search methods over a learned black-box dynamics model.
//!
//! All three methods rank candidates with [`motor_core::lexical_compare`] over the
//! multi-objective vector; there is no scalar fitness anywhere.
//!
//! - [`ConstrainedNelderMead`]: bounded simplex search over one flat multi-step action vector.
//! - [`TreeSearch`]: stochastic tree of partial trajectories, local descent plus random steps.
//! - [`GridSearch`]: exhaustive mixed-radix enumeration of discretised action sequences.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod grid;
pub mod nelder_mead;
pub mod sim;
pub mod trajectory;
pub mod tree;

pub use grid::{GridSearch, Odometer};
pub use nelder_mead::{ConstrainedNelderMead, NelderMeadConfig, Optimum};
pub use sim::{simulate, Evaluation, TrajEval};
pub use trajectory::{SearchResult, Trajectory};
pub use tree::{TreeSearch, TreeSearchConfig};
