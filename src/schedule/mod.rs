// src/schedule/mod.rs

//! Incremental scheduling.
//!
//! - [`scheduler`] holds the available-output set and the queue of waiting
//!   tasks, and runs the cascade.
//! - [`staleness`] decides whether a task's outputs are current.
//! - [`outcome`] defines what `add` and `finish` report.

pub mod outcome;
pub mod scheduler;
pub mod staleness;

pub use outcome::{
    AddOutcome, Resolution, ResolutionStatus, RunSummary, StuckTask, UnresolvedReport,
};
pub use scheduler::Scheduler;
pub use staleness::{Freshness, StalenessOracle};
