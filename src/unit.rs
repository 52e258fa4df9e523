//! Unit names and the records parsed from systemctl listings.

use serde::Serialize;

/// Unit-type suffixes systemd knows about.
pub const UNIT_TYPES: &[&str] = &[
    "automount",
    "device",
    "mount",
    "path",
    "scope",
    "service",
    "slice",
    "snapshot",
    "socket",
    "swap",
    "target",
    "timer",
];

/// `UnitFileState` values (and `is-enabled` keywords) that count as enabled.
pub const ENABLED_STATES: &[&str] = &[
    "enabled",
    "enabled-runtime",
    "alias",
    "static",
    "indirect",
    "generated",
    "transient",
];

pub fn is_enabled_state(state: &str) -> bool {
    ENABLED_STATES.contains(&state)
}

/// One row of `systemctl list-units`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub name: String,
    pub load: String,
    pub active: String,
    pub sub: String,
    pub description: String,
}

/// Status summary for a single unit, read with `systemctl show`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitStatus {
    /// Unit name (e.g., "docker.service")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Load state: loaded, not-found, error, masked
    pub load_state: String,
    /// Active state: active, inactive, activating, deactivating, failed
    pub active_state: String,
    /// Sub-state: running, exited, dead, etc.
    pub sub_state: String,
    /// Unit file state: enabled, disabled, static, masked
    pub unit_file_state: String,
}

impl UnitStatus {
    pub fn is_active(&self) -> bool {
        self.active_state == "active"
    }

    pub fn is_running(&self) -> bool {
        self.sub_state == "running"
    }

    pub fn is_enabled(&self) -> bool {
        is_enabled_state(&self.unit_file_state)
    }

    pub fn is_masked(&self) -> bool {
        self.load_state == "masked" || self.unit_file_state.starts_with("masked")
    }

    /// Format as a single-line status string.
    pub fn one_line(&self) -> String {
        format!(
            "{}: {} ({}) - {}",
            self.name, self.active_state, self.sub_state, self.description
        )
    }
}

/// Append `.service` to names without a known unit-type suffix.
pub fn normalize_unit_name(name: &str) -> String {
    if unit_type(name).is_some() {
        name.to_string()
    } else {
        format!("{}.service", name)
    }
}

/// The known unit-type suffix of `name`, if any.
pub fn unit_type(name: &str) -> Option<&'static str> {
    let (_, suffix) = name.rsplit_once('.')?;
    UNIT_TYPES.iter().copied().find(|t| *t == suffix)
}

/// Remove a known unit-type suffix; other dots are kept (`foo@1.2.service` → `foo@1.2`).
pub fn strip_unit_suffix(name: &str) -> &str {
    match unit_type(name) {
        Some(t) => &name[..name.len() - t.len() - 1],
        None => name,
    }
}
