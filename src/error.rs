//! Error types for unitctl.
//!
//! Every failure a caller may want to branch on is a distinct
//! [`SystemctlError`] variant. Compare errors with [`SystemctlError::kind`],
//! never by their message text: the wording systemctl prints varies between
//! versions, the kinds do not.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemctlError {
    /// sudo needed a terminal to ask for a password and none was attached.
    #[error("sudo could not read a password: a terminal is required")]
    SudoPasswordEntryFailure { stderr: String },

    /// The unit specified doesn't exist or can't be found.
    #[error("unit does not exist")]
    DoesNotExist { stderr: String },

    /// A unit was expected to be loaded, but was not.
    /// This happens when stopping a unit that does not exist, for example.
    #[error("unit not loaded")]
    UnitNotLoaded { stderr: String },

    /// The caller is not authorized for the requested action.
    /// Running as superuser or adding a polkit rule fixes this.
    #[error("insufficient permissions")]
    InsufficientPermissions { stderr: String },

    /// `$DBUS_SESSION_BUS_ADDRESS` and `$XDG_RUNTIME_DIR` were not defined.
    /// This usually is the result of running in user scope as root.
    #[error("bus connection failure")]
    BusFailure { stderr: String },

    /// Masked units can only be unmasked. Unmask the unit before enabling,
    /// disabling or starting it.
    #[error("unit masked")]
    Masked { stderr: String },

    /// The unit file resides outside of the unit file search path.
    #[error("unit file linked")]
    Linked,

    /// systemctl reported a failure that matches no known case.
    #[error("{}", unspecified_message(*code, stderr))]
    Unspecified { code: Option<i32>, stderr: String },

    #[error("systemctl not found in $PATH")]
    NotInstalled,

    #[error("elevation requested but sudo was not found in $PATH")]
    NoElevation,

    /// The context was cancelled or its deadline passed before the command finished.
    #[error("command timed out")]
    Timeout,

    /// A unit was expected to be running but was found inactive.
    #[error("unit not active")]
    UnitNotActive,

    /// An expected value is unavailable, but the unit may be running.
    #[error("value not set")]
    ValueNotSet,

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {property} value {value:?}: {reason}")]
    Parse {
        property: String,
        value: String,
        reason: String,
    },
}

fn unspecified_message(code: Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    match (code, stderr.is_empty()) {
        (Some(code), true) => format!("systemctl exited with code {code}"),
        (Some(code), false) => format!("systemctl exited with code {code}: {stderr}"),
        (None, true) => "systemctl reported an unknown failure".to_string(),
        (None, false) => format!("systemctl reported an unknown failure: {stderr}"),
    }
}

/// The identity of a [`SystemctlError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SudoPasswordEntryFailure,
    DoesNotExist,
    UnitNotLoaded,
    InsufficientPermissions,
    BusFailure,
    Masked,
    Linked,
    Unspecified,
    NotInstalled,
    NoElevation,
    Timeout,
    UnitNotActive,
    ValueNotSet,
    InvalidOptions,
    Spawn,
    Parse,
}

impl SystemctlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SystemctlError::SudoPasswordEntryFailure { .. } => ErrorKind::SudoPasswordEntryFailure,
            SystemctlError::DoesNotExist { .. } => ErrorKind::DoesNotExist,
            SystemctlError::UnitNotLoaded { .. } => ErrorKind::UnitNotLoaded,
            SystemctlError::InsufficientPermissions { .. } => ErrorKind::InsufficientPermissions,
            SystemctlError::BusFailure { .. } => ErrorKind::BusFailure,
            SystemctlError::Masked { .. } => ErrorKind::Masked,
            SystemctlError::Linked => ErrorKind::Linked,
            SystemctlError::Unspecified { .. } => ErrorKind::Unspecified,
            SystemctlError::NotInstalled => ErrorKind::NotInstalled,
            SystemctlError::NoElevation => ErrorKind::NoElevation,
            SystemctlError::Timeout => ErrorKind::Timeout,
            SystemctlError::UnitNotActive => ErrorKind::UnitNotActive,
            SystemctlError::ValueNotSet => ErrorKind::ValueNotSet,
            SystemctlError::InvalidOptions(_) => ErrorKind::InvalidOptions,
            SystemctlError::Spawn { .. } => ErrorKind::Spawn,
            SystemctlError::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Diagnostic text captured from systemctl, when the error came from it.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            SystemctlError::SudoPasswordEntryFailure { stderr }
            | SystemctlError::DoesNotExist { stderr }
            | SystemctlError::UnitNotLoaded { stderr }
            | SystemctlError::InsufficientPermissions { stderr }
            | SystemctlError::BusFailure { stderr }
            | SystemctlError::Masked { stderr }
            | SystemctlError::Unspecified { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }

    /// Exit code carried by an [`SystemctlError::Unspecified`] fallback.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            SystemctlError::Unspecified { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

pub type Result<T> = std::result::Result<T, SystemctlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_display_includes_code_and_stderr() {
        let err = SystemctlError::Unspecified {
            code: Some(3),
            stderr: "something odd\n".to_string(),
        };
        assert_eq!(err.to_string(), "systemctl exited with code 3: something odd");
        assert_eq!(err.exit_code(), Some(3));
    }

    #[test]
    fn unspecified_display_without_code() {
        let err = SystemctlError::Unspecified {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "systemctl reported an unknown failure");
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn kind_ignores_payload() {
        let a = SystemctlError::DoesNotExist {
            stderr: "Unit a.service not found.".to_string(),
        };
        let b = SystemctlError::DoesNotExist {
            stderr: "Unit b.service does not exist".to_string(),
        };
        assert_eq!(a.kind(), b.kind());
        assert!(a.is(ErrorKind::DoesNotExist));
        assert!(!a.is(ErrorKind::UnitNotLoaded));
    }

    #[test]
    fn stderr_only_for_text_errors() {
        let err = SystemctlError::Masked {
            stderr: "Unit nginx.service is masked.".to_string(),
        };
        assert_eq!(err.stderr(), Some("Unit nginx.service is masked."));
        assert_eq!(SystemctlError::Timeout.stderr(), None);
        assert_eq!(SystemctlError::Linked.stderr(), None);
    }

    #[test]
    fn parse_error_display() {
        let err = SystemctlError::Parse {
            property: "MainPID".to_string(),
            value: "abc".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not parse MainPID value \"abc\": invalid digit found in string"
        );
    }
}
