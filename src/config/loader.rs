// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PipelineFile, RawPipelineFile};
use crate::errors::Result;

/// Load a pipeline file from a given path and return the raw `RawPipelineFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPipelineFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let pipeline: RawPipelineFile = toml::from_str(&contents)?;

    Ok(pipeline)
}

/// Load a pipeline file from path and validate it.
///
/// Checks for:
/// - at least one task, with unique names,
/// - non-empty commands and paths,
/// - placeholders that name declared slots,
/// - well-formed `external` globs.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineFile> {
    let raw = load_from_path(&path)?;
    let pipeline = PipelineFile::try_from(raw)?;
    Ok(pipeline)
}

/// `Pathflow.toml` in the current working directory.
pub fn default_pipeline_path() -> PathBuf {
    PathBuf::from("Pathflow.toml")
}
