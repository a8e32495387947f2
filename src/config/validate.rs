// src/config/validate.rs

use std::collections::HashSet;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::{PipelineFile, RawPipelineFile, TaskConfig};
use crate::errors::{PipelineError, Result};
use crate::exec::{placeholders, SlotKind};

impl TryFrom<RawPipelineFile> for PipelineFile {
    type Error = PipelineError;

    fn try_from(raw: RawPipelineFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_tasks(&raw)?;
        validate_task_names(&raw)?;
        for task in &raw.task {
            validate_task(task)?;
        }
        let external = build_external_globs(&raw.config.external)?;
        Ok(PipelineFile::new_unchecked(raw.config, raw.task, external))
    }
}

fn ensure_has_tasks(cfg: &RawPipelineFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(PipelineError::ConfigError(
            "pipeline must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_names(cfg: &RawPipelineFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, task) in cfg.task.iter().enumerate() {
        let name = match task.effective_name() {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(PipelineError::ConfigError(format!(
                    "task #{} needs a `name` or a `script`",
                    index + 1
                )));
            }
        };
        if !seen.insert(name.clone()) {
            return Err(PipelineError::ConfigError(format!(
                "duplicate task name '{name}'"
            )));
        }
    }
    Ok(())
}

fn validate_task(task: &TaskConfig) -> Result<()> {
    let name = task.effective_name().unwrap_or_default();

    if task.cmd.trim().is_empty() {
        return Err(PipelineError::ConfigError(format!(
            "task '{name}' has an empty `cmd`"
        )));
    }
    if task.script.as_deref().is_some_and(str::is_empty) {
        return Err(PipelineError::ConfigError(format!(
            "task '{name}' has an empty `script`"
        )));
    }
    for (slot, input) in &task.inputs {
        if input.path().is_empty() {
            return Err(PipelineError::ConfigError(format!(
                "task '{name}' has an empty path for input '{slot}'"
            )));
        }
    }
    for (slot, output) in &task.outputs {
        if output.is_empty() {
            return Err(PipelineError::ConfigError(format!(
                "task '{name}' has an empty path for output '{slot}'"
            )));
        }
    }

    for (kind, slot) in placeholders(&task.cmd) {
        let declared = match kind {
            SlotKind::Input => task.inputs.contains_key(&slot),
            SlotKind::Output => task.outputs.contains_key(&slot),
        };
        if !declared {
            let (prefix, section) = match kind {
                SlotKind::Input => ("in", "inputs"),
                SlotKind::Output => ("out", "outputs"),
            };
            return Err(PipelineError::ConfigError(format!(
                "task '{name}' uses {{{prefix}.{slot}}} in `cmd` but declares no such slot in `{section}`"
            )));
        }
    }

    Ok(())
}

fn build_external_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            PipelineError::ConfigError(format!("invalid external pattern '{pattern}': {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| PipelineError::ConfigError(format!("building external patterns: {e}")))
}
