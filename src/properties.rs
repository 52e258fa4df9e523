//! Unit property names accepted by `systemctl show --property`.
//!
//! Constants cover the properties this crate reads itself plus the ones most
//! commonly needed by callers. Any other name can be used via [`Property::new`].

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property(Cow<'static, str>);

impl Property {
    pub const ACTIVE_ENTER_TIMESTAMP: Property = Property::from_static("ActiveEnterTimestamp");
    pub const ACTIVE_STATE: Property = Property::from_static("ActiveState");
    pub const CONTROL_PID: Property = Property::from_static("ControlPID");
    pub const DESCRIPTION: Property = Property::from_static("Description");
    pub const EXEC_MAIN_PID: Property = Property::from_static("ExecMainPID");
    pub const EXEC_MAIN_START_TIMESTAMP: Property =
        Property::from_static("ExecMainStartTimestamp");
    pub const EXEC_MAIN_STATUS: Property = Property::from_static("ExecMainStatus");
    pub const FRAGMENT_PATH: Property = Property::from_static("FragmentPath");
    pub const ID: Property = Property::from_static("Id");
    pub const INACTIVE_ENTER_TIMESTAMP: Property = Property::from_static("InactiveEnterTimestamp");
    pub const LOAD_STATE: Property = Property::from_static("LoadState");
    pub const MAIN_PID: Property = Property::from_static("MainPID");
    pub const MEMORY_CURRENT: Property = Property::from_static("MemoryCurrent");
    pub const N_RESTARTS: Property = Property::from_static("NRestarts");
    pub const RESULT: Property = Property::from_static("Result");
    pub const SUB_STATE: Property = Property::from_static("SubState");
    pub const TASKS_CURRENT: Property = Property::from_static("TasksCurrent");
    pub const TRIGGERED_BY: Property = Property::from_static("TriggeredBy");
    pub const TYPE: Property = Property::from_static("Type");
    pub const UNIT_FILE_STATE: Property = Property::from_static("UnitFileState");
    pub const USER: Property = Property::from_static("User");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip `<Name>=` and the trailing newline from `systemctl show` output.
    pub fn strip_value<'a>(&self, stdout: &'a str) -> &'a str {
        let value = stdout
            .strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix('='))
            .unwrap_or(stdout);
        value.strip_suffix('\n').unwrap_or(value)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Property {
    fn from(name: &'static str) -> Self {
        Property::from_static(name)
    }
}
