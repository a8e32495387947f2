// src/task/runner.rs

//! Path resolution and body invocation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error};

use crate::errors::{PipelineError, Result};
use crate::task::descriptor::{ResolvedPaths, TaskDescriptor};

/// Resolves task path templates against a project root and runs task bodies.
///
/// Templates are joined onto the root; absolute templates are used as is.
/// There are no retries, timeouts or sandboxing: whatever the body does to
/// the filesystem stays done.
#[derive(Debug, Clone)]
pub struct Runner {
    root: PathBuf,
}

impl Runner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, template: &Path) -> PathBuf {
        self.root.join(template)
    }

    /// Every input slot, external ones included.
    pub fn resolve_inputs(&self, task: &TaskDescriptor) -> ResolvedPaths {
        task.inputs()
            .iter()
            .map(|(slot, input)| (slot.clone(), self.resolve(input.template())))
            .collect()
    }

    pub fn resolve_outputs(&self, task: &TaskDescriptor) -> ResolvedPaths {
        task.outputs()
            .iter()
            .map(|(slot, template)| (slot.clone(), self.resolve(template)))
            .collect()
    }

    /// Resolved paths of the tracked inputs only; these gate readiness.
    pub fn needed_inputs(&self, task: &TaskDescriptor) -> Vec<PathBuf> {
        task.inputs()
            .values()
            .filter(|input| !input.is_external())
            .map(|input| self.resolve(input.template()))
            .collect()
    }

    pub fn output_paths(&self, task: &TaskDescriptor) -> Vec<PathBuf> {
        task.outputs()
            .values()
            .map(|template| self.resolve(template))
            .collect()
    }

    pub fn identity_path(&self, task: &TaskDescriptor) -> PathBuf {
        self.resolve(task.identity())
    }

    /// Invoke the task body. Any body error becomes [`PipelineError::TaskFailed`].
    pub fn run(&self, task: &TaskDescriptor) -> Result<()> {
        let started = Instant::now();
        match task.execute(&self.root) {
            Ok(()) => {
                debug!(
                    task = %task.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "task body returned successfully"
                );
                Ok(())
            }
            Err(source) => {
                error!(task = %task.name(), error = %format!("{source:#}"), "task body failed");
                Err(PipelineError::TaskFailed {
                    task: task.name().to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::task::descriptor::InputPath;

    fn task() -> TaskDescriptor {
        let inputs = BTreeMap::from([
            ("gen".to_string(), InputPath::Tracked("output/gen".into())),
            ("raw".to_string(), InputPath::External("botw/Actor".into())),
        ]);
        let outputs = BTreeMap::from([
            ("dir".to_string(), PathBuf::from("output/Actor")),
            ("abs".to_string(), PathBuf::from("/elsewhere/x.yaml")),
        ]);
        TaskDescriptor::new(
            "t",
            "tasks/t.py",
            inputs,
            outputs,
            |_: &ResolvedPaths, _: &ResolvedPaths| anyhow::bail!("broken pipe"),
        )
        .unwrap()
    }

    #[test]
    fn needed_inputs_skip_external() {
        let runner = Runner::new("/proj");
        assert_eq!(runner.needed_inputs(&task()), vec![PathBuf::from("/proj/output/gen")]);
    }

    #[test]
    fn absolute_templates_are_kept() {
        let runner = Runner::new("/proj");
        let outputs = runner.output_paths(&task());
        assert!(outputs.contains(&PathBuf::from("/elsewhere/x.yaml")));
        assert!(outputs.contains(&PathBuf::from("/proj/output/Actor")));
        assert_eq!(runner.identity_path(&task()), PathBuf::from("/proj/tasks/t.py"));
    }

    #[test]
    fn body_error_is_wrapped_verbatim() {
        let runner = Runner::new("/proj");
        match runner.run(&task()) {
            Err(PipelineError::TaskFailed { task, source }) => {
                assert_eq!(task, "t");
                assert_eq!(source.to_string(), "broken pipe");
            }
            other => panic!("expected TaskFailed, got {other:?}"),
        }
    }
}
