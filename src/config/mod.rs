// src/config/mod.rs

//! Pipeline file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a pipeline file from disk (`loader.rs`).
//! - Validate names, paths and command placeholders (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_pipeline_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, InputSpec, PipelineFile, RawPipelineFile, TaskConfig};
