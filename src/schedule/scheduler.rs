// src/schedule/scheduler.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::errors::{PipelineError, Result};
use crate::schedule::outcome::{
    AddOutcome, Resolution, ResolutionStatus, RunSummary, StuckTask, UnresolvedReport,
};
use crate::schedule::staleness::{Freshness, StalenessOracle};
use crate::task::{Runner, TaskDescriptor};

/// A submitted task that is not yet eligible, with the resolved tracked
/// inputs it is waiting for.
#[derive(Debug)]
struct PendingTask {
    task: TaskDescriptor,
    needed: Vec<PathBuf>,
}

/// Incremental task scheduler for a single pipeline run.
///
/// Dependencies are never declared: a task becomes eligible once every one of
/// its tracked input paths has been published as some earlier task's output.
/// The scheduler:
/// - remembers which output paths are available (this set only grows)
/// - queues tasks whose inputs are not available yet
/// - runs (or skips, when up to date) eligible tasks
/// - cascades through the queue after every resolved task, within the same
///   `add` call
///
/// Everything is synchronous; `add` returns only when the whole wave it
/// started has been processed.
#[derive(Debug)]
pub struct Scheduler {
    runner: Runner,
    oracle: StalenessOracle,
    available: BTreeSet<PathBuf>,
    pending: Vec<PendingTask>,
    /// Name of the task whose body failed, once the run is aborted.
    failed: Option<String>,
    summary: RunSummary,
}

impl Scheduler {
    /// Scheduler for a project rooted at `root`, checking staleness against
    /// the real filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_oracle(root, StalenessOracle::default())
    }

    pub fn with_oracle(root: impl Into<PathBuf>, oracle: StalenessOracle) -> Self {
        Self {
            runner: Runner::new(root),
            oracle,
            available: BTreeSet::new(),
            pending: Vec::new(),
            failed: None,
            summary: RunSummary::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.runner.root()
    }

    /// Submit a task.
    ///
    /// If its tracked inputs are all available the task is resolved right
    /// away, followed by every queued task this unblocks, transitively.
    /// Otherwise it is queued and [`AddOutcome::Deferred`] is returned.
    ///
    /// A failing task body aborts the run: the error is returned here and
    /// every later `add` fails with [`PipelineError::Aborted`].
    ///
    /// Submitting a task while another task of the same name is still queued
    /// fails with [`PipelineError::InvalidTask`]. Re-adding a task that has
    /// already been resolved is fine.
    pub fn add(&mut self, task: TaskDescriptor) -> Result<AddOutcome> {
        if self.failed.is_some() {
            warn!(task = %task.name(), "pipeline already aborted; refusing task");
            return Err(PipelineError::Aborted {
                task: task.name().to_string(),
            });
        }
        if self.pending_tasks().any(|name| name == task.name()) {
            return Err(PipelineError::InvalidTask(format!(
                "task '{}' is already waiting for its inputs",
                task.name()
            )));
        }

        let needed = self.runner.needed_inputs(&task);
        if !self.can_run(&needed) {
            debug!(
                task = %task.name(),
                missing = ?self.missing_inputs(&needed),
                "inputs not available yet; queueing task"
            );
            self.pending.push(PendingTask { task, needed });
            return Ok(AddOutcome::Deferred);
        }

        let resolved = self.run_wave(PendingTask { task, needed })?;
        Ok(AddOutcome::Ran(resolved))
    }

    /// Check that every submitted task was resolved.
    ///
    /// On failure the error carries each stuck task with its missing inputs
    /// plus the full list of available outputs.
    pub fn finish(&self) -> Result<()> {
        if self.pending.is_empty() {
            info!(
                executed = self.summary.executed,
                up_to_date = self.summary.up_to_date,
                "all tasks resolved"
            );
            return Ok(());
        }

        let stuck: Vec<StuckTask> = self
            .pending
            .iter()
            .map(|entry| StuckTask {
                name: entry.task.name().to_string(),
                missing: self.missing_inputs(&entry.needed),
            })
            .collect();

        for task in &stuck {
            error!(task = %task.name, missing = ?task.missing, "task never became runnable");
        }
        for path in &self.available {
            info!(path = %path.display(), "available output");
        }

        Err(PipelineError::Unresolved(UnresolvedReport {
            stuck,
            available: self.available.iter().cloned().collect(),
        }))
    }

    pub fn is_available(&self, path: &Path) -> bool {
        self.available.contains(path)
    }

    /// Outputs published so far, sorted.
    pub fn available(&self) -> impl Iterator<Item = &Path> {
        self.available.iter().map(PathBuf::as_path)
    }

    /// Names of queued tasks, in submission order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|entry| entry.task.name())
    }

    pub fn is_aborted(&self) -> bool {
        self.failed.is_some()
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Current staleness of `task`, without running anything.
    pub fn freshness(&self, task: &TaskDescriptor) -> Freshness {
        self.oracle.check(
            &self.runner.identity_path(task),
            &self.runner.needed_inputs(task),
            &self.runner.output_paths(task),
        )
    }

    fn can_run(&self, needed: &[PathBuf]) -> bool {
        needed.iter().all(|path| self.available.contains(path))
    }

    fn missing_inputs(&self, needed: &[PathBuf]) -> Vec<PathBuf> {
        needed
            .iter()
            .filter(|path| !self.available.contains(*path))
            .cloned()
            .collect()
    }

    /// Resolve `first` and everything it unblocks.
    ///
    /// Work is kept on a stack, so a freshly unblocked task runs before
    /// anything pushed earlier.
    fn run_wave(&mut self, first: PendingTask) -> Result<Vec<Resolution>> {
        let mut stack = vec![first];
        let mut resolved = Vec::new();

        while let Some(PendingTask { task, needed }) = stack.pop() {
            let identity = self.runner.identity_path(&task);
            let outputs = self.runner.output_paths(&task);

            let status = match self.oracle.check(&identity, &needed, &outputs) {
                Freshness::UpToDate => {
                    info!(task = %task.name(), "up-to-date");
                    self.summary.up_to_date += 1;
                    ResolutionStatus::UpToDate
                }
                reason => {
                    info!(task = %task.name(), reason = ?reason, "running");
                    if let Err(err) = self.runner.run(&task) {
                        self.failed = Some(task.name().to_string());
                        return Err(err);
                    }
                    self.summary.executed += 1;
                    ResolutionStatus::Executed
                }
            };

            // Published even when skipped: outputs from an earlier run are
            // still valid.
            self.available.extend(outputs);
            resolved.push(Resolution {
                task: task.name().to_string(),
                status,
            });

            let available = &self.available;
            let (ready, waiting): (Vec<PendingTask>, Vec<PendingTask>) =
                std::mem::take(&mut self.pending)
                    .into_iter()
                    .partition(|entry| entry.needed.iter().all(|p| available.contains(p)));
            self.pending = waiting;

            for entry in &ready {
                debug!(
                    task = %entry.task.name(),
                    unblocked_by = %task.name(),
                    "inputs now available; scheduling"
                );
            }
            stack.extend(ready);
        }

        Ok(resolved)
    }
}
