// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod schedule;
pub mod task;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, PipelineFile};
use crate::schedule::{Freshness, Scheduler};
use crate::task::{InputPath, TaskDescriptor};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - pipeline file loading
/// - project root resolution and directory setup
/// - task construction
/// - the scheduler run (or a dry-run report)
pub fn run(args: CliArgs) -> Result<()> {
    let pipeline_path = args.pipeline.clone();
    let pipeline = load_and_validate(&pipeline_path)
        .with_context(|| format!("loading pipeline {:?}", pipeline_path))?;

    let root = project_root(&args, &pipeline, &pipeline_path)?;
    info!(root = %root.display(), tasks = pipeline.tasks().len(), "loaded pipeline");

    let tasks = pipeline::build_tasks(&pipeline, &pipeline_path, &root)?;

    if args.dry_run {
        print_dry_run(&Scheduler::new(&root), &tasks);
        return Ok(());
    }

    pipeline::prepare_dirs(&pipeline, &root)?;

    let mut scheduler = Scheduler::new(&root);
    pipeline::run_tasks(&mut scheduler, tasks)?;
    Ok(())
}

/// `--root` if given, else derived from the pipeline file, made absolute.
fn project_root(args: &CliArgs, pipeline: &PipelineFile, pipeline_path: &Path) -> Result<PathBuf> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => pipeline.root_dir(pipeline_path),
    };
    std::fs::canonicalize(&root).with_context(|| format!("resolving project root {:?}", root))
}

/// Dry-run output: tasks in submission order with their paths and whether
/// their outputs currently look up to date.
fn print_dry_run(scheduler: &Scheduler, tasks: &[TaskDescriptor]) {
    println!("pathflow dry-run");
    println!("  root = {}", scheduler.root().display());
    println!();

    println!("tasks ({}):", tasks.len());
    for task in tasks {
        println!("  - {}", task.name());
        println!("      identity: {}", task.identity().display());
        for (slot, input) in task.inputs() {
            let marker = match input {
                InputPath::Tracked(_) => "",
                InputPath::External(_) => " (external)",
            };
            println!("      in  {slot}: {}{marker}", input.template().display());
        }
        for (slot, output) in task.outputs() {
            println!("      out {slot}: {}", output.display());
        }
        let status = match scheduler.freshness(task) {
            Freshness::UpToDate => "up-to-date".to_string(),
            Freshness::MissingInput(p) => format!("would run (missing input {})", p.display()),
            Freshness::MissingOutput(p) => format!("would run (missing output {})", p.display()),
            Freshness::OutputOlder { output, input } => format!(
                "would run ({} is older than {})",
                output.display(),
                input.display()
            ),
        };
        println!("      status: {status}");
    }

    debug!("dry-run complete (no execution)");
}
