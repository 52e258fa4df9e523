//! Execution configuration for a single systemctl invocation.
//!
//! [`Options`] says which manager instance is targeted ([`Scope`]) and
//! whether the command runs through sudo ([`Elevation`]). Conflicting
//! elevation settings (a password *and* an askpass prompt, or either without
//! sudo) cannot be expressed with these types; [`Options::from_flags`] is the
//! checked entry point for callers holding flat boolean flags.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SystemctlError};

/// Which systemd manager instance a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The system-wide manager (`--system`)
    #[default]
    System,
    /// The calling user's manager (`--user`)
    User,
}

impl Scope {
    /// The systemctl flag selecting this scope.
    pub fn flag(&self) -> &'static str {
        match self {
            Scope::System => "--system",
            Scope::User => "--user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::System => write!(f, "system"),
            Scope::User => write!(f, "user"),
        }
    }
}

/// A sudo password. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// How (and whether) privileges are elevated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Elevation {
    #[default]
    None,
    /// Plain `sudo`; relies on passwordless sudo or cached credentials.
    Sudo,
    /// `sudo --stdin`; the password is written to sudo's standard input.
    SudoPassword(Password),
    /// `sudo --askpass`; sudo runs the configured askpass helper.
    SudoAskPass,
}

impl Elevation {
    pub fn is_elevated(&self) -> bool {
        !matches!(self, Elevation::None)
    }

    /// Flags passed to sudo ahead of the systemctl path.
    pub fn wrapper_flags(&self) -> &'static [&'static str] {
        match self {
            Elevation::None | Elevation::Sudo => &[],
            Elevation::SudoPassword(_) => &["--stdin"],
            Elevation::SudoAskPass => &["--askpass"],
        }
    }

    pub fn password(&self) -> Option<&Password> {
        match self {
            Elevation::SudoPassword(password) => Some(password),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub scope: Scope,
    pub elevation: Elevation,
}

impl Options {
    pub fn system() -> Self {
        Self::default()
    }

    pub fn user() -> Self {
        Self {
            scope: Scope::User,
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_elevation(mut self, elevation: Elevation) -> Self {
        self.elevation = elevation;
        self
    }

    /// Build options from the flat flag surface (`sudo`, password, askpass).
    ///
    /// An empty password counts as absent. A password or askpass without
    /// `sudo`, or both together, is rejected.
    pub fn from_flags(
        scope: Scope,
        sudo: bool,
        password: Option<String>,
        askpass: bool,
    ) -> Result<Self> {
        let password = password.filter(|p| !p.is_empty());

        let elevation = match (sudo, password, askpass) {
            (false, None, false) => Elevation::None,
            (false, _, _) => {
                return Err(SystemctlError::InvalidOptions(
                    "a sudo password or askpass requires sudo".to_string(),
                ));
            }
            (true, Some(_), true) => {
                return Err(SystemctlError::InvalidOptions(
                    "a sudo password and askpass are mutually exclusive".to_string(),
                ));
            }
            (true, Some(password), false) => Elevation::SudoPassword(Password::new(password)),
            (true, None, true) => Elevation::SudoAskPass,
            (true, None, false) => Elevation::Sudo,
        };

        Ok(Self { scope, elevation })
    }
}
