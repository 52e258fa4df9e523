//! Locating the systemctl and sudo executables.
//!
//! Paths are resolved once, when a [`Tools`] value is built, and then only
//! read. A client keeps its `Tools` for its whole lifetime; tests build one
//! with [`Tools::new`] to point at fake executables.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SystemctlError};
use crate::invocation::Invocation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tools {
    systemctl: Option<PathBuf>,
    sudo: Option<PathBuf>,
}

/// A fully resolved command, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Written to the child's standard input, which is then closed.
    pub stdin: Option<Vec<u8>>,
}

impl PreparedCommand {
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl Tools {
    /// Search `$PATH` for systemctl and sudo.
    pub fn detect() -> Self {
        let tools = Self {
            systemctl: which::which("systemctl").ok(),
            sudo: which::which("sudo").ok(),
        };
        debug!(systemctl = ?tools.systemctl, sudo = ?tools.sudo, "Resolved tool paths");
        tools
    }

    pub fn new(systemctl: Option<PathBuf>, sudo: Option<PathBuf>) -> Self {
        Self { systemctl, sudo }
    }

    /// Replace a detected path with an explicit one, when given.
    pub fn with_overrides(mut self, systemctl: Option<PathBuf>, sudo: Option<PathBuf>) -> Self {
        if systemctl.is_some() {
            self.systemctl = systemctl;
        }
        if sudo.is_some() {
            self.sudo = sudo;
        }
        self
    }

    pub fn systemctl(&self) -> Option<&Path> {
        self.systemctl.as_deref()
    }

    pub fn sudo(&self) -> Option<&Path> {
        self.sudo.as_deref()
    }

    /// Resolve an invocation into a spawnable command.
    ///
    /// Fails with [`SystemctlError::NotInstalled`] when systemctl is unknown,
    /// and with [`SystemctlError::NoElevation`] when sudo is requested but
    /// unknown. Nothing is spawned either way.
    pub fn prepare(&self, invocation: &Invocation) -> Result<PreparedCommand> {
        let systemctl = self.systemctl.as_ref().ok_or(SystemctlError::NotInstalled)?;
        let tokens = invocation.tokens().iter().map(OsString::from);

        if !invocation.is_elevated() {
            return Ok(PreparedCommand {
                program: systemctl.clone(),
                args: tokens.collect(),
                stdin: None,
            });
        }

        let sudo = self.sudo.as_ref().ok_or(SystemctlError::NoElevation)?;
        let mut args: Vec<OsString> = invocation
            .elevation_prefix()
            .iter()
            .map(OsString::from)
            .collect();
        args.push(systemctl.as_os_str().to_os_string());
        args.extend(tokens);

        Ok(PreparedCommand {
            program: sudo.clone(),
            args,
            stdin: invocation
                .stdin_secret()
                .map(|secret| secret.expose().as_bytes().to_vec()),
        })
    }
}
