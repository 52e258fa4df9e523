//! Abstraction over spawning systemctl, for testability.
//!
//! This module provides the [`CommandRunner`] trait, which hides the actual
//! process spawn behind a trait object so the classification and
//! interpretation layers can be tested without a real systemd.
//!
//! # Production Usage
//!
//! [`TokioCommandRunner`] spawns through [`tokio::process::Command`] and is
//! the default runner of [`Systemctl`](crate::Systemctl).
//!
//! # Testing Usage
//!
//! [`MockCommandRunner`] records every prepared command and replays canned
//! outputs, enabling fast, deterministic tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::{Result, SystemctlError};
use crate::tools::PreparedCommand;

/// Raw outcome of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; -1 when the child was terminated by a signal.
    pub code: i32,
}

impl RawOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            code,
        }
    }
}

/// Trait for spawning a prepared command under a [`Context`].
///
/// Stored as `Arc<dyn CommandRunner>` in [`Runner`](crate::runner::Runner).
/// Implementations must return [`SystemctlError::Timeout`] when the context
/// finishes first, and must not leave the child running in that case.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &PreparedCommand, ctx: &Context) -> Result<RawOutput>;
}

/// Production implementation on top of [`tokio::process`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &PreparedCommand, ctx: &Context) -> Result<RawOutput> {
        if ctx.is_done() {
            return Err(SystemctlError::Timeout);
        }

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if command.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        let mut child = cmd.spawn().map_err(|source| SystemctlError::Spawn {
            program: command.program.display().to_string(),
            source,
        })?;

        let stdin_data = command.stdin.as_deref();
        let stdin_handle = child.stdin.take();

        // Dropping this future drops the child, and kill_on_drop kills it.
        let finished = async move {
            if let (Some(data), Some(mut handle)) = (stdin_data, stdin_handle) {
                // The child may exit without reading; that is not our failure.
                if let Err(e) = handle.write_all(data).await {
                    warn!("Failed to write to child stdin: {}", e);
                }
                drop(handle);
            }
            child.wait_with_output().await
        };

        tokio::select! {
            biased;
            _ = ctx.done() => {
                debug!(program = %command.program.display(), "Context finished, killed child");
                Err(SystemctlError::Timeout)
            }
            output = finished => {
                let output = output.map_err(|source| SystemctlError::Spawn {
                    program: command.program.display().to_string(),
                    source,
                })?;
                Ok(RawOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    code: output.status.code().unwrap_or(-1),
                })
            }
        }
    }
}

/// Test double that records calls and replays queued responses.
///
/// When the queue is empty, every call succeeds with empty output.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    calls: Mutex<Vec<PreparedCommand>>,
    responses: Mutex<VecDeque<Result<RawOutput>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful process outcome.
    pub fn respond(self, stdout: &str, stderr: &str, code: i32) -> Self {
        self.push(Ok(RawOutput::new(stdout, stderr, code)));
        self
    }

    /// Queue a runner-level failure (e.g. [`SystemctlError::Timeout`]).
    pub fn fail(self, error: SystemctlError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, response: Result<RawOutput>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<PreparedCommand> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Arguments of each recorded call, lossily converted for assertions.
    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.calls().iter().map(PreparedCommand::args_lossy).collect()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, command: &PreparedCommand, ctx: &Context) -> Result<RawOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command.clone());
        if ctx.is_done() {
            return Err(SystemctlError::Timeout);
        }
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(RawOutput::default()))
    }
}
