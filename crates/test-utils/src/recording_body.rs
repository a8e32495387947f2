use std::fs;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use pathflow::task::{ResolvedPaths, TaskBody};

/// Shared, ordered record of which task bodies ran.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    names: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.names.lock().unwrap().push(name.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names.lock().unwrap().iter().filter(|n| *n == name).count()
    }
}

/// A body that:
/// - records its task name in an [`ExecutionLog`]
/// - writes a small file at every output path (creating parent dirs)
/// - optionally fails instead, with a fixed message
pub struct RecordingBody {
    name: String,
    log: ExecutionLog,
    fail_with: Option<String>,
}

impl RecordingBody {
    pub fn new(name: &str, log: &ExecutionLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            fail_with: None,
        }
    }

    pub fn failing(name: &str, log: &ExecutionLog, message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(name, log)
        }
    }
}

impl TaskBody for RecordingBody {
    fn run(&self, _inputs: &ResolvedPaths, outputs: &ResolvedPaths) -> anyhow::Result<()> {
        self.log.record(&self.name);
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        for path in outputs.values() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
            }
            fs::write(path, self.name.as_bytes()).with_context(|| format!("writing {:?}", path))?;
        }
        Ok(())
    }
}
