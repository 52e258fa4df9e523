//! Mapping systemctl diagnostics onto [`SystemctlError`].
//!
//! systemctl has no machine-readable error channel, so classification is a
//! first-match substring scan over stderr. Order matters: specific phrases
//! come first and the generic `Failed` marker last, otherwise it would mask
//! every other case.

use crate::error::{ErrorKind, SystemctlError};

/// Trigger phrases, tried in order.
const PATTERNS: &[(&str, ErrorKind)] = &[
    (
        "a terminal is required to read the password",
        ErrorKind::SudoPasswordEntryFailure,
    ),
    ("does not exist", ErrorKind::DoesNotExist),
    ("not found.", ErrorKind::DoesNotExist),
    ("could not be found", ErrorKind::DoesNotExist),
    ("not loaded.", ErrorKind::UnitNotLoaded),
    ("No such file or directory", ErrorKind::DoesNotExist),
    (
        "Interactive authentication required",
        ErrorKind::InsufficientPermissions,
    ),
    ("Access denied", ErrorKind::InsufficientPermissions),
    ("DBUS_SESSION_BUS_ADDRESS", ErrorKind::BusFailure),
    ("is masked", ErrorKind::Masked),
    ("Failed", ErrorKind::Unspecified),
];

/// Classify captured stderr. `None` means no known failure was reported;
/// the caller then falls back on the exit code.
pub fn classify(stderr: &str) -> Option<SystemctlError> {
    PATTERNS
        .iter()
        .find(|(needle, _)| stderr.contains(needle))
        .map(|(_, kind)| error_for(*kind, stderr))
}

/// The kind `classify` would produce, without building the error.
pub fn classify_kind(stderr: &str) -> Option<ErrorKind> {
    PATTERNS
        .iter()
        .find(|(needle, _)| stderr.contains(needle))
        .map(|(_, kind)| *kind)
}

fn error_for(kind: ErrorKind, stderr: &str) -> SystemctlError {
    let stderr = stderr.to_string();
    match kind {
        ErrorKind::SudoPasswordEntryFailure => SystemctlError::SudoPasswordEntryFailure { stderr },
        ErrorKind::DoesNotExist => SystemctlError::DoesNotExist { stderr },
        ErrorKind::UnitNotLoaded => SystemctlError::UnitNotLoaded { stderr },
        ErrorKind::InsufficientPermissions => SystemctlError::InsufficientPermissions { stderr },
        ErrorKind::BusFailure => SystemctlError::BusFailure { stderr },
        ErrorKind::Masked => SystemctlError::Masked { stderr },
        _ => SystemctlError::Unspecified { code: None, stderr },
    }
}
