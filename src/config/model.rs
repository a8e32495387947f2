// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use serde::Deserialize;

/// Pipeline file exactly as read from TOML, before validation.
///
/// ```toml
/// [config]
/// root = "."
/// external = ["botw/**"]
/// create_dirs = ["output"]
///
/// [[task]]
/// name = "link_actors"
/// cmd = "python tasks/link_actors.py {in.actors} {out.dir}"
/// script = "tasks/link_actors.py"
/// inputs = { actors = "botw/Actor/ActorLink" }
/// outputs = { dir = "output/Actor" }
/// ```
///
/// Tasks are a TOML array so that submission order follows the file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPipelineFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// Validated pipeline file.
///
/// Construct via `PipelineFile::try_from(raw)` (see `validate.rs`) or
/// [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct PipelineFile {
    config: ConfigSection,
    tasks: Vec<TaskConfig>,
    external: GlobSet,
}

impl PipelineFile {
    /// Only `validate.rs` should call this.
    pub(crate) fn new_unchecked(config: ConfigSection, tasks: Vec<TaskConfig>, external: GlobSet) -> Self {
        Self {
            config,
            tasks,
            external,
        }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn tasks(&self) -> &[TaskConfig] {
        &self.tasks
    }

    /// Whether an input template falls under one of the `external` globs.
    pub fn is_external(&self, template: &str) -> bool {
        self.external.is_match(template)
    }

    /// Project root for a pipeline file located at `pipeline_path`.
    ///
    /// `[config].root` is relative to the pipeline file's directory; without
    /// it, the pipeline file's directory is the root.
    pub fn root_dir(&self, pipeline_path: &Path) -> PathBuf {
        let base = match pipeline_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match &self.config.root {
            Some(root) => base.join(root),
            None => base,
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// Project root, relative to the pipeline file.
    #[serde(default)]
    pub root: Option<String>,

    /// Glob patterns (matched against input templates) for data supplied
    /// from outside the pipeline.
    #[serde(default)]
    pub external: Vec<String>,

    /// Directories (relative to the root) created before any task runs.
    #[serde(default)]
    pub create_dirs: Vec<String>,
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Task name. Defaults to the file name of `script`.
    #[serde(default)]
    pub name: Option<String>,

    /// File defining the task's logic. Editing it forces a rerun.
    ///
    /// Defaults to the pipeline file itself.
    #[serde(default)]
    pub script: Option<String>,

    /// Shell command run as the task body.
    pub cmd: String,

    #[serde(default)]
    pub inputs: BTreeMap<String, InputSpec>,

    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

impl TaskConfig {
    /// Explicit name, else the script's file name.
    pub fn effective_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let script = self.script.as_ref()?;
        Path::new(script)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// An input is either a bare path or a table with an explicit flag:
///
/// ```toml
/// inputs = { a = "output/a.json", raw = { path = "vendor/raw", external = true } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InputSpec {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        external: bool,
    },
}

impl InputSpec {
    pub fn path(&self) -> &str {
        match self {
            InputSpec::Path(path) | InputSpec::Detailed { path, .. } => path,
        }
    }

    /// True when the table form marks the input external.
    pub fn explicit_external(&self) -> bool {
        matches!(self, InputSpec::Detailed { external: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tasks_in_file_order() {
        let raw: RawPipelineFile = toml::from_str(
            r#"
[config]
external = ["botw/**"]

[[task]]
name = "zeta"
cmd = "true"
outputs = { o = "output/z" }

[[task]]
script = "tasks/alpha.sh"
cmd = "sh tasks/alpha.sh"
inputs = { z = "output/z", raw = { path = "vendor/raw", external = true } }
"#,
        )
        .unwrap();

        assert_eq!(raw.config.external, vec!["botw/**"]);
        assert_eq!(raw.task.len(), 2);
        assert_eq!(raw.task[0].effective_name().as_deref(), Some("zeta"));
        assert_eq!(raw.task[1].effective_name().as_deref(), Some("alpha.sh"));
        assert_eq!(raw.task[1].inputs["z"], InputSpec::Path("output/z".to_string()));
        assert!(raw.task[1].inputs["raw"].explicit_external());
        assert_eq!(raw.task[1].inputs["raw"].path(), "vendor/raw");
    }

    #[test]
    fn missing_cmd_is_rejected() {
        let res: Result<RawPipelineFile, _> = toml::from_str(
            r#"
[[task]]
name = "a"
"#,
        );
        assert!(res.is_err());
    }
}
