// src/schedule/outcome.rs

//! Result types returned by the scheduler.

use std::fmt;
use std::path::PathBuf;

/// How a task was resolved within a wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// The body ran and returned successfully.
    Executed,
    /// Outputs were already current; the body was skipped.
    UpToDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub task: String,
    pub status: ResolutionStatus,
}

/// Structured result of [`Scheduler::add`](crate::schedule::Scheduler::add).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Some tracked input is not available yet; the task was queued.
    Deferred,
    /// The task was eligible. Lists every task resolved in the resulting
    /// wave, in processing order; the added task is always first.
    Ran(Vec<Resolution>),
}

impl AddOutcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, AddOutcome::Deferred)
    }

    pub fn resolutions(&self) -> &[Resolution] {
        match self {
            AddOutcome::Deferred => &[],
            AddOutcome::Ran(resolved) => resolved,
        }
    }

    /// Status of `task` in this wave, if it was resolved here.
    pub fn status_of(&self, task: &str) -> Option<ResolutionStatus> {
        self.resolutions()
            .iter()
            .find(|r| r.task == task)
            .map(|r| r.status)
    }
}

/// Counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub up_to_date: usize,
}

/// A task that never became eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckTask {
    pub name: String,
    pub missing: Vec<PathBuf>,
}

/// Diagnostic produced by `finish` when tasks are left pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReport {
    pub stuck: Vec<StuckTask>,
    /// Every output known to be available, sorted.
    pub available: Vec<PathBuf>,
}

impl UnresolvedReport {
    pub fn stuck_task(&self, name: &str) -> Option<&StuckTask> {
        self.stuck.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for UnresolvedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} task(s) could not be run", self.stuck.len())?;
        for task in &self.stuck {
            writeln!(f, "  {}: waiting for", task.name)?;
            for path in &task.missing {
                writeln!(f, "    {}", path.display())?;
            }
        }
        write!(f, "available outputs:")?;
        if self.available.is_empty() {
            write!(f, " (none)")?;
        }
        for path in &self.available {
            write!(f, "\n  {}", path.display())?;
        }
        Ok(())
    }
}
