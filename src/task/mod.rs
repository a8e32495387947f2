// src/task/mod.rs

//! Task declarations and their invocation.
//!
//! - [`descriptor`] defines the immutable [`TaskDescriptor`], its typed
//!   [`InputPath`]s and the [`TaskBody`] boundary.
//! - [`runner`] resolves path templates against the project root and calls
//!   task bodies.

pub mod descriptor;
pub mod runner;

pub use descriptor::{InputPath, ResolvedPaths, SlotName, TaskBody, TaskDescriptor};
pub use runner::Runner;
