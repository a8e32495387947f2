#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pathflow::schedule::Scheduler;
use pathflow_test_utils::fixtures::{secs_ago, write_file_at};
use tempfile::TempDir;

pub use pathflow_test_utils::init_tracing;

/// A throwaway project root with old identity scripts for every task name
/// passed to [`Project::with_scripts`].
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Create `tasks/<name>` for each name, dated well in the past.
    pub fn with_scripts(names: &[&str]) -> Self {
        let project = Self::new();
        for name in names {
            project.write_old(&format!("tasks/{name}"), 1000);
        }
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file dated `age_secs` seconds ago.
    pub fn write_old(&self, rel: &str, age_secs: u64) {
        write_file_at(&self.path(rel), rel, secs_ago(age_secs));
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.root())
    }
}
