// src/task/descriptor.rs

//! Immutable declaration of a single pipeline step.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{PipelineError, Result};
use crate::task::runner::Runner;

/// Name of an input or output slot (e.g. `"actor_dir"`).
pub type SlotName = String;

/// Slot name → absolute path, as handed to a [`TaskBody`].
pub type ResolvedPaths = BTreeMap<SlotName, PathBuf>;

/// A declared input path.
///
/// `Tracked` inputs must be produced by some other task in the run before the
/// consumer becomes eligible. `External` inputs belong to an upstream data
/// source and are assumed to exist; they never gate readiness and never
/// appear in the available output set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPath {
    Tracked(PathBuf),
    External(PathBuf),
}

impl InputPath {
    pub fn template(&self) -> &Path {
        match self {
            InputPath::Tracked(p) | InputPath::External(p) => p,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, InputPath::External(_))
    }
}

/// The executable part of a task.
///
/// Receives resolved absolute input and output paths and performs all I/O.
/// Any error is fatal to the whole pipeline run.
pub trait TaskBody: Send + Sync {
    fn run(&self, inputs: &ResolvedPaths, outputs: &ResolvedPaths) -> anyhow::Result<()>;
}

impl<F> TaskBody for F
where
    F: Fn(&ResolvedPaths, &ResolvedPaths) -> anyhow::Result<()> + Send + Sync,
{
    fn run(&self, inputs: &ResolvedPaths, outputs: &ResolvedPaths) -> anyhow::Result<()> {
        self(inputs, outputs)
    }
}

/// One pipeline step: name, identity, declared inputs/outputs and a body.
///
/// Cloning is cheap; the body is shared.
#[derive(Clone)]
pub struct TaskDescriptor {
    name: String,
    identity: PathBuf,
    inputs: BTreeMap<SlotName, InputPath>,
    outputs: BTreeMap<SlotName, PathBuf>,
    body: Arc<dyn TaskBody>,
}

impl TaskDescriptor {
    /// Build a descriptor, rejecting empty names and empty path templates.
    ///
    /// `identity` is the step's defining unit (script or pipeline file); its
    /// modification time counts as an extra input when deciding staleness.
    pub fn new(
        name: impl Into<String>,
        identity: impl Into<PathBuf>,
        inputs: BTreeMap<SlotName, InputPath>,
        outputs: BTreeMap<SlotName, PathBuf>,
        body: impl TaskBody + 'static,
    ) -> Result<Self> {
        let name = name.into();
        let identity = identity.into();

        if name.trim().is_empty() {
            return Err(PipelineError::InvalidTask(
                "task name must not be empty".to_string(),
            ));
        }
        if identity.as_os_str().is_empty() {
            return Err(PipelineError::InvalidTask(format!(
                "task '{name}' has an empty identity path"
            )));
        }
        for (slot, input) in &inputs {
            if input.template().as_os_str().is_empty() {
                return Err(PipelineError::InvalidTask(format!(
                    "task '{name}' has an empty path for input '{slot}'"
                )));
            }
        }
        for (slot, output) in &outputs {
            if output.as_os_str().is_empty() {
                return Err(PipelineError::InvalidTask(format!(
                    "task '{name}' has an empty path for output '{slot}'"
                )));
            }
        }

        Ok(Self {
            name,
            identity,
            inputs,
            outputs,
            body: Arc::new(body),
        })
    }

    /// Like [`TaskDescriptor::new`], naming the task after its script file.
    pub fn from_script(
        script: impl Into<PathBuf>,
        inputs: BTreeMap<SlotName, InputPath>,
        outputs: BTreeMap<SlotName, PathBuf>,
        body: impl TaskBody + 'static,
    ) -> Result<Self> {
        let script = script.into();
        let name = script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, script, inputs, outputs, body)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> &Path {
        &self.identity
    }

    pub fn inputs(&self) -> &BTreeMap<SlotName, InputPath> {
        &self.inputs
    }

    pub fn outputs(&self) -> &BTreeMap<SlotName, PathBuf> {
        &self.outputs
    }

    /// Resolve all templates against `root` and invoke the body.
    ///
    /// Resolution happens here, at call time, never earlier.
    pub fn execute(&self, root: &Path) -> anyhow::Result<()> {
        let runner = Runner::new(root);
        let inputs = runner.resolve_inputs(self);
        let outputs = runner.resolve_outputs(self);
        self.body.run(&inputs, &outputs)
    }
}

impl fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}
