// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::schedule::UnresolvedReport;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// A task body returned an error. The body's error is kept verbatim as
    /// the source.
    #[error("task '{task}' failed: {source:#}")]
    TaskFailed {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    /// `add` was called after an earlier task failed in this run.
    #[error("pipeline aborted by earlier failure; task '{task}' was not run")]
    Aborted { task: String },

    #[error("{0}")]
    Unresolved(UnresolvedReport),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PipelineError>;
