//! Running an [`Invocation`] and deriving its error.
//!
//! The [`Runner`] ties the pieces together: resolve tools, spawn through the
//! [`CommandRunner`], classify stderr, and fall back on the exit code.
//! Text classification wins over the exit code because systemctl's exit
//! codes are coarse; a non-zero exit with unrecognized stderr becomes
//! [`SystemctlError::Unspecified`] carrying that code.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::classify::classify;
use crate::context::Context;
use crate::error::{Result, SystemctlError};
use crate::invocation::Invocation;
use crate::process::{CommandRunner, TokioCommandRunner};
use crate::tools::Tools;

/// Everything one systemctl call produced.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Untrimmed standard output.
    pub stdout: String,
    pub stderr: String,
    /// `None` when no process ran to completion (not installed, timed out).
    pub code: Option<i32>,
    pub error: Option<SystemctlError>,
}

impl ExecutionResult {
    fn failed(error: SystemctlError) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            code: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Standard output, or the derived error.
    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.stdout),
        }
    }
}

#[derive(Clone)]
pub struct Runner {
    tools: Tools,
    process: Arc<dyn CommandRunner>,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner").field("tools", &self.tools).finish()
    }
}

impl Runner {
    pub fn new(tools: Tools, process: Arc<dyn CommandRunner>) -> Self {
        Self { tools, process }
    }

    /// Detect tools on `$PATH` and spawn with tokio.
    pub fn detect() -> Self {
        Self::new(Tools::detect(), Arc::new(TokioCommandRunner))
    }

    pub fn tools(&self) -> &Tools {
        &self.tools
    }

    pub async fn run(&self, ctx: &Context, invocation: &Invocation) -> ExecutionResult {
        let command = match self.tools.prepare(invocation) {
            Ok(command) => command,
            Err(e) => return ExecutionResult::failed(e),
        };

        debug!(
            program = %command.program.display(),
            elevated = invocation.is_elevated(),
            "Running systemctl {}",
            invocation.display()
        );

        let raw = match self.process.run(&command, ctx).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "systemctl did not complete");
                return ExecutionResult::failed(e);
            }
        };

        let error = derive_error(&raw.stderr, raw.code);
        debug!(
            code = raw.code,
            error = ?error.as_ref().map(SystemctlError::kind),
            "systemctl {} finished",
            invocation.subcommand()
        );

        ExecutionResult {
            stdout: raw.stdout,
            stderr: raw.stderr,
            code: Some(raw.code),
            error,
        }
    }
}

/// Combine stderr classification with the exit code.
pub fn derive_error(stderr: &str, code: i32) -> Option<SystemctlError> {
    match classify(stderr) {
        // The generic marker carries the process code when there is one.
        Some(SystemctlError::Unspecified { stderr, .. }) => Some(SystemctlError::Unspecified {
            code: (code != 0).then_some(code),
            stderr,
        }),
        Some(error) => Some(error),
        None if code != 0 => Some(SystemctlError::Unspecified {
            code: Some(code),
            stderr: stderr.to_string(),
        }),
        None => None,
    }
}
