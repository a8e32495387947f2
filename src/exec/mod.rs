// src/exec/mod.rs

//! Process execution for declaratively configured tasks.
//!
//! - [`command`] provides [`ShellCommand`], a [`TaskBody`](crate::task::TaskBody)
//!   that runs a shell command with the task's resolved paths.

pub mod command;

pub use command::{placeholders, ShellCommand, SlotKind};
