// src/schedule/staleness.rs

//! Modification-time based staleness checks.
//!
//! A task is up to date when every output is at least as new as the newest
//! of its tracked inputs and its identity file. Directories are represented
//! by their first entry in name order, on the assumption that all files in a
//! generated directory are written together. Content changes that keep the
//! timestamp are not detected.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::fs::{FileSystem, RealFileSystem};

/// Outcome of a staleness check, with the first reason found when stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    UpToDate,
    /// An input (or the identity) is missing, an empty directory, or has no
    /// readable modification time.
    MissingInput(PathBuf),
    /// Same as `MissingInput`, for an output.
    MissingOutput(PathBuf),
    /// `output` was last written before `input` changed.
    OutputOlder { output: PathBuf, input: PathBuf },
}

impl Freshness {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Freshness::UpToDate)
    }
}

#[derive(Debug, Clone)]
pub struct StalenessOracle {
    fs: Arc<dyn FileSystem>,
}

impl Default for StalenessOracle {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl StalenessOracle {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn is_up_to_date(&self, identity: &Path, inputs: &[PathBuf], outputs: &[PathBuf]) -> bool {
        self.check(identity, inputs, outputs).is_up_to_date()
    }

    /// Decide whether `outputs` are current with respect to `inputs` and
    /// `identity`. All paths must already be resolved.
    pub fn check(&self, identity: &Path, inputs: &[PathBuf], outputs: &[PathBuf]) -> Freshness {
        let mut newest: Option<(SystemTime, &Path)> = None;

        for input in inputs.iter().map(PathBuf::as_path).chain(std::iter::once(identity)) {
            let Some(time) = self.representative_mtime(input) else {
                return Freshness::MissingInput(input.to_path_buf());
            };
            if newest.is_none_or(|(t, _)| time > t) {
                newest = Some((time, input));
            }
        }

        for output in outputs {
            let Some(time) = self.representative_mtime(output) else {
                return Freshness::MissingOutput(output.clone());
            };
            if let Some((input_time, input)) = newest {
                if time < input_time {
                    return Freshness::OutputOlder {
                        output: output.clone(),
                        input: input.to_path_buf(),
                    };
                }
            }
        }

        Freshness::UpToDate
    }

    /// The file whose modification time stands in for `path`.
    ///
    /// A file is its own representative. A directory is represented by its
    /// first entry sorted by name. Missing paths and empty directories have
    /// no representative.
    pub fn representative_file(&self, path: &Path) -> Option<PathBuf> {
        if self.fs.is_dir(path) {
            let mut entries = match self.fs.read_dir(path) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(path = ?path, error = %err, "cannot list directory; treating as missing");
                    return None;
                }
            };
            entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            return entries.into_iter().next();
        }
        if self.fs.exists(path) {
            return Some(path.to_path_buf());
        }
        None
    }

    fn representative_mtime(&self, path: &Path) -> Option<SystemTime> {
        let file = self.representative_file(path)?;
        match self.fs.modified(&file) {
            Ok(time) => Some(time),
            Err(err) => {
                debug!(path = ?file, error = %err, "cannot read modification time; treating as missing");
                None
            }
        }
    }
}
