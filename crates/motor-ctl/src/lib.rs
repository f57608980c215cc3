//! Stateful plan-caching controller over the `motor-search` strategies.
//!
//! [`Controller::seek`] is called once per decision step. It keeps the last planned trajectory,
//! checks it against the live state and model, replans when it has gone stale, and hands out one
//! action per call.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod objective_spec;

pub use config::{ConfigError, ControllerConfig, SimplexSection, TreeSection};
pub use controller::{Controller, PlanCache, SeekOutcome, Strategy};
pub use objective_spec::{build_objective, parse_objectives, ObjectiveSpec, SpecError};
