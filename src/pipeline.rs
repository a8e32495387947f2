// src/pipeline.rs

//! Turning a validated pipeline file into tasks and driving a run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::config::{PipelineFile, TaskConfig};
use crate::errors::Result;
use crate::exec::ShellCommand;
use crate::schedule::{RunSummary, Scheduler};
use crate::task::{InputPath, TaskDescriptor};

/// Build one [`TaskDescriptor`] per `[[task]]`, in file order.
///
/// Inputs flagged `external = true`, or matching a `[config].external` glob,
/// become [`InputPath::External`]. Tasks without a `script` use the pipeline
/// file as their identity.
pub fn build_tasks(
    pipeline: &PipelineFile,
    pipeline_path: &Path,
    root: &Path,
) -> Result<Vec<TaskDescriptor>> {
    pipeline
        .tasks()
        .iter()
        .map(|task| build_task(pipeline, task, pipeline_path, root))
        .collect()
}

fn build_task(
    pipeline: &PipelineFile,
    task: &TaskConfig,
    pipeline_path: &Path,
    root: &Path,
) -> Result<TaskDescriptor> {
    let name = task.effective_name().unwrap_or_default();

    let inputs: BTreeMap<_, _> = task
        .inputs
        .iter()
        .map(|(slot, spec)| {
            let path = PathBuf::from(spec.path());
            let input = if spec.explicit_external() || pipeline.is_external(spec.path()) {
                InputPath::External(path)
            } else {
                InputPath::Tracked(path)
            };
            (slot.clone(), input)
        })
        .collect();

    let outputs: BTreeMap<_, _> = task
        .outputs
        .iter()
        .map(|(slot, path)| (slot.clone(), PathBuf::from(path)))
        .collect();

    let identity = match &task.script {
        Some(script) => PathBuf::from(script),
        None => std::path::absolute(pipeline_path)
            .with_context(|| format!("resolving pipeline path {:?}", pipeline_path))?,
    };

    debug!(task = %name, identity = ?identity, "built task from pipeline file");

    TaskDescriptor::new(
        name,
        identity,
        inputs,
        outputs,
        ShellCommand::new(task.cmd.clone(), root),
    )
}

/// Create `[config].create_dirs` under `root`.
pub fn prepare_dirs(pipeline: &PipelineFile, root: &Path) -> Result<()> {
    for dir in &pipeline.config().create_dirs {
        let path = root.join(dir);
        fs::create_dir_all(&path).with_context(|| format!("creating directory {:?}", path))?;
        debug!(path = ?path, "ensured directory exists");
    }
    Ok(())
}

/// Submit every task in order, then check nothing was left behind.
pub fn run_tasks(
    scheduler: &mut Scheduler,
    tasks: impl IntoIterator<Item = TaskDescriptor>,
) -> Result<RunSummary> {
    for task in tasks {
        scheduler.add(task)?;
    }
    scheduler.finish()?;

    let summary = scheduler.summary();
    info!(
        executed = summary.executed,
        up_to_date = summary.up_to_date,
        "pipeline finished"
    );
    Ok(summary)
}
