// src/exec/command.rs

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::errors::{DeckbakeError, Result};

/// One external process invocation: program, arguments, a human-readable
/// label used in failure messages, and an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    pub program: String,
    pub args: Vec<String>,
    pub label: String,
    pub cwd: Option<PathBuf>,
}

impl ScriptCall {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            label: label.into(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Seam between the pipeline and the outside world.
///
/// The pipeline and the screenshot orchestrator only ever run collaborators
/// through this trait, so tests can observe (or fake) every invocation.
pub trait ScriptRunner: Send + Sync {
    fn run(&self, call: ScriptCall) -> impl Future<Output = Result<()>> + Send;
}

/// Real runner: spawns the process, streams stdout/stderr line by line, and
/// maps the exit status onto the crate error type.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    verbose: bool,
}

impl ShellRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ScriptRunner for ShellRunner {
    async fn run(&self, call: ScriptCall) -> Result<()> {
        debug!(label = %call.label, program = %call.program, args = ?call.args, "spawning collaborator");

        let mut cmd = Command::new(&call.program);
        cmd.args(&call.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = &call.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning {} ({})", call.program, call.label))?;

        // Stage output is chatter unless --verbose was given; stderr is
        // always surfaced.
        if let Some(stdout) = child.stdout.take() {
            let verbose = self.verbose;
            let label = call.label.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if verbose {
                        info!(label = %label, "stdout: {}", line);
                    } else {
                        debug!(label = %label, "stdout: {}", line);
                    }
                }
            });
        }

        if let Some(stderr) = child.stderr.take() {
            let label = call.label.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    error!(label = %label, "stderr: {}", line);
                }
            });
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for {} ({})", call.program, call.label))?;

        if status.success() {
            Ok(())
        } else {
            // Killed-by-signal has no code; report -1 like a crashed script.
            Err(DeckbakeError::ScriptExit {
                label: call.label,
                status: status.code().unwrap_or(-1),
            })
        }
    }
}
