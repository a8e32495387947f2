// src/exec/command.rs

//! Shell-command task bodies.

use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use anyhow::{anyhow, bail, Context, Result};
use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::task::{ResolvedPaths, TaskBody};

/// Matches `{in.slot}` and `{out.slot}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(in|out)\.([A-Za-z0-9_\-]+)\}").expect("placeholder regex is valid")
});

/// Number of trailing stderr lines carried in a failure message.
const STDERR_TAIL_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Input,
    Output,
}

/// All `(kind, slot)` placeholders referenced by `cmd`, in order.
pub fn placeholders(cmd: &str) -> Vec<(SlotKind, String)> {
    PLACEHOLDER
        .captures_iter(cmd)
        .map(|caps| (slot_kind(&caps), caps[2].to_string()))
        .collect()
}

fn slot_kind(caps: &Captures<'_>) -> SlotKind {
    if &caps[1] == "in" {
        SlotKind::Input
    } else {
        SlotKind::Output
    }
}

/// Substitute placeholders with resolved absolute paths.
pub fn render(cmd: &str, inputs: &ResolvedPaths, outputs: &ResolvedPaths) -> Result<String> {
    let mut missing = None;
    let rendered = PLACEHOLDER.replace_all(cmd, |caps: &Captures<'_>| {
        let slot = &caps[2];
        let paths = match slot_kind(caps) {
            SlotKind::Input => inputs,
            SlotKind::Output => outputs,
        };
        match paths.get(slot) {
            Some(path) => path.to_string_lossy().into_owned(),
            None => {
                missing.get_or_insert_with(|| caps[0].to_string());
                String::new()
            }
        }
    });

    if let Some(placeholder) = missing {
        bail!("command references undeclared slot {placeholder}");
    }
    Ok(rendered.into_owned())
}

/// Environment variable name for a slot, e.g. `PATHFLOW_IN_ACTOR_DIR`.
pub fn env_var_name(kind: SlotKind, slot: &str) -> String {
    let prefix = match kind {
        SlotKind::Input => "PATHFLOW_IN_",
        SlotKind::Output => "PATHFLOW_OUT_",
    };
    let suffix: String = slot
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}{suffix}")
}

/// Task body that runs a shell command in the project root.
///
/// Slot paths are available both as `{in.slot}` / `{out.slot}` placeholders
/// and as `PATHFLOW_IN_<SLOT>` / `PATHFLOW_OUT_<SLOT>` environment variables.
/// A non-zero exit status is a task failure.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    cmd: String,
    cwd: PathBuf,
}

impl ShellCommand {
    pub fn new(cmd: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            cmd: cmd.into(),
            cwd: cwd.into(),
        }
    }
}

impl TaskBody for ShellCommand {
    fn run(&self, inputs: &ResolvedPaths, outputs: &ResolvedPaths) -> Result<()> {
        let rendered = render(&self.cmd, inputs, outputs)?;

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&rendered);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&rendered);
            c
        };
        cmd.current_dir(&self.cwd);
        for (slot, path) in inputs {
            cmd.env(env_var_name(SlotKind::Input, slot), path);
        }
        for (slot, path) in outputs {
            cmd.env(env_var_name(SlotKind::Output, slot), path);
        }

        info!(cmd = %rendered, cwd = ?self.cwd, "starting task process");

        let output = cmd
            .output()
            .with_context(|| format!("spawning process for command '{rendered}'"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            debug!("stdout: {}", line);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            debug!("stderr: {}", line);
        }

        if output.status.success() {
            return Ok(());
        }

        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        let lines: Vec<&str> = stderr.lines().collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
        if tail.is_empty() {
            Err(anyhow!("command exited with status {code}"))
        } else {
            Err(anyhow!("command exited with status {code}: {tail}"))
        }
    }
}
