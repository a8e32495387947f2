#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use pathflow::task::{InputPath, TaskBody, TaskDescriptor};

use crate::recording_body::{ExecutionLog, RecordingBody};

/// Builder for `TaskDescriptor` to simplify test setup.
///
/// The identity defaults to `tasks/<name>`, relative to the project root.
pub struct TaskBuilder {
    name: String,
    identity: PathBuf,
    inputs: BTreeMap<String, InputPath>,
    outputs: BTreeMap<String, PathBuf>,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            identity: PathBuf::from("tasks").join(name),
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn identity(mut self, path: &str) -> Self {
        self.identity = PathBuf::from(path);
        self
    }

    pub fn input(mut self, slot: &str, path: &str) -> Self {
        self.inputs
            .insert(slot.to_string(), InputPath::Tracked(PathBuf::from(path)));
        self
    }

    pub fn external(mut self, slot: &str, path: &str) -> Self {
        self.inputs
            .insert(slot.to_string(), InputPath::External(PathBuf::from(path)));
        self
    }

    pub fn output(mut self, slot: &str, path: &str) -> Self {
        self.outputs.insert(slot.to_string(), PathBuf::from(path));
        self
    }

    pub fn build_with(self, body: impl TaskBody + 'static) -> TaskDescriptor {
        TaskDescriptor::new(self.name, self.identity, self.inputs, self.outputs, body)
            .expect("Failed to build valid task from builder")
    }

    /// Build with a [`RecordingBody`] that logs into `log`.
    pub fn recorded(self, log: &ExecutionLog) -> TaskDescriptor {
        let body = RecordingBody::new(&self.name, log);
        self.build_with(body)
    }

    /// Build with a body that records, then fails with `message`.
    pub fn failing(self, log: &ExecutionLog, message: &str) -> TaskDescriptor {
        let body = RecordingBody::failing(&self.name, log, message);
        self.build_with(body)
    }
}
