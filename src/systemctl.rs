//! The operation façade.
//!
//! Each named operation is a descriptor ([`Action`] or [`Query`]) fed through
//! one primitive ([`Systemctl::act`] or [`Systemctl::query`]), so the
//! per-operation code is only the subcommand name and how its stdout is read.
//!
//! Every operation takes:
//! - a [`Context`] bounding how long it may run,
//! - the unit name, passed through to systemctl untouched,
//! - the [`Options`] for this call (scope and elevation),
//! - extra arguments appended verbatim (e.g. `--no-block`).

use std::sync::Arc;

use crate::classify::classify_kind;
use crate::context::Context;
use crate::error::{Result, SystemctlError};
use crate::invocation::Invocation;
use crate::options::Options;
use crate::process::CommandRunner;
use crate::properties::Property;
use crate::runner::{ExecutionResult, Runner};
use crate::tools::Tools;
use crate::unit::is_enabled_state;

/// Plain actions: success or the classified error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
    Reenable,
    Mask,
    Unmask,
    DaemonReload,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Enable => "enable",
            Action::Disable => "disable",
            Action::Reenable => "reenable",
            Action::Mask => "mask",
            Action::Unmask => "unmask",
            Action::DaemonReload => "daemon-reload",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Start => "started",
            Action::Stop => "stopped",
            Action::Restart => "restarted",
            Action::Enable => "enabled",
            Action::Disable => "disabled",
            Action::Reenable => "reenabled",
            Action::Mask => "masked",
            Action::Unmask => "unmasked",
            Action::DaemonReload => "reloaded",
        }
    }

    pub fn takes_unit(&self) -> bool {
        !matches!(self, Action::DaemonReload)
    }
}

/// Boolean queries: stdout keyword → bool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    IsActive,
    IsEnabled,
    IsFailed,
}

impl Query {
    pub fn as_str(&self) -> &'static str {
        match self {
            Query::IsActive => "is-active",
            Query::IsEnabled => "is-enabled",
            Query::IsFailed => "is-failed",
        }
    }

    /// Read the trimmed stdout keyword. Recognized keywords are trusted over
    /// the exit code (these subcommands exit non-zero for "false"); anything
    /// else surfaces the run's error, never a silent `false`.
    pub fn interpret(&self, stdout: &str, error: Option<SystemctlError>) -> Result<bool> {
        let keyword = stdout.trim();
        let stderr = || {
            error
                .as_ref()
                .and_then(SystemctlError::stderr)
                .unwrap_or_default()
                .to_string()
        };

        match (self, keyword) {
            (Query::IsActive, "active" | "reloading" | "refreshing") => Ok(true),
            (
                Query::IsActive,
                "inactive" | "failed" | "activating" | "deactivating" | "maintenance",
            ) => Ok(false),

            (Query::IsEnabled, word) if is_enabled_state(word) => Ok(true),
            (Query::IsEnabled, "disabled") => Ok(false),
            (Query::IsEnabled, "linked" | "linked-runtime") => Err(SystemctlError::Linked),
            (Query::IsEnabled, "masked" | "masked-runtime") => {
                Err(SystemctlError::Masked { stderr: stderr() })
            }
            (Query::IsEnabled, "not-found") => {
                Err(SystemctlError::DoesNotExist { stderr: stderr() })
            }

            (Query::IsFailed, "failed") => Ok(true),
            (
                Query::IsFailed,
                "active" | "inactive" | "activating" | "deactivating" | "reloading",
            ) => Ok(false),

            _ => Err(error.unwrap_or_else(|| SystemctlError::Unspecified {
                code: None,
                stderr: format!("unexpected {} output: {:?}", self.as_str(), keyword),
            })),
        }
    }
}

/// Client for systemctl. Cheap to clone; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct Systemctl {
    runner: Runner,
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new()
    }
}

impl Systemctl {
    /// Resolve systemctl and sudo on `$PATH` once, for the client's lifetime.
    pub fn new() -> Self {
        Self {
            runner: Runner::detect(),
        }
    }

    pub fn with_runner(tools: Tools, process: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner: Runner::new(tools, process),
        }
    }

    pub fn tools(&self) -> &Tools {
        self.runner.tools()
    }

    /// Run an arbitrary invocation and return the raw result.
    pub async fn execute(&self, ctx: &Context, invocation: &Invocation) -> ExecutionResult {
        self.runner.run(ctx, invocation).await
    }

    /// Run a plain action. `unit` is ignored for `daemon-reload`.
    pub async fn act(
        &self,
        ctx: &Context,
        action: Action,
        unit: Option<&str>,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        let unit = unit.filter(|_| action.takes_unit());
        let invocation = Invocation::build(action.as_str(), options, unit, extra);
        self.execute(ctx, &invocation).await.into_result().map(|_| ())
    }

    /// Run a boolean query against one unit.
    pub async fn query(
        &self,
        ctx: &Context,
        query: Query,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<bool> {
        let invocation = Invocation::build(query.as_str(), options, Some(unit), extra);
        let result = self.execute(ctx, &invocation).await;
        if matches!(result.error, Some(SystemctlError::Timeout)) {
            return Err(SystemctlError::Timeout);
        }
        query.interpret(&result.stdout, result.error)
    }

    /// Start (activate) a unit.
    pub async fn start(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Start, Some(unit), options, extra).await
    }

    /// Stop (deactivate) a unit.
    pub async fn stop(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Stop, Some(unit), options, extra).await
    }

    /// Stop and then start a unit; starts it if it was not running.
    pub async fn restart(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Restart, Some(unit), options, extra).await
    }

    /// Create the symlinks encoded in the unit's `[Install]` section.
    pub async fn enable(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Enable, Some(unit), options, extra).await
    }

    /// Remove the unit's symlinks, undoing `enable`.
    pub async fn disable(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Disable, Some(unit), options, extra).await
    }

    /// Disable and re-enable a unit atomically.
    pub async fn reenable(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Reenable, Some(unit), options, extra).await
    }

    /// Link the unit file to /dev/null, making it impossible to start.
    ///
    /// systemd may report [`SystemctlError::DoesNotExist`] for unknown units
    /// while still masking them.
    pub async fn mask(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Mask, Some(unit), options, extra).await
    }

    /// Undo `mask`. Unknown units report `DoesNotExist` unless they were masked.
    pub async fn unmask(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::Unmask, Some(unit), options, extra).await
    }

    /// Reload the manager configuration, rerunning generators and reloading unit files.
    pub async fn daemon_reload(
        &self,
        ctx: &Context,
        options: &Options,
        extra: &[&str],
    ) -> Result<()> {
        self.act(ctx, Action::DaemonReload, None, options, extra).await
    }

    pub async fn is_active(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<bool> {
        self.query(ctx, Query::IsActive, unit, options, extra).await
    }

    /// `true` for enabled, alias, static, indirect, generated and transient
    /// units; `Linked` and `Masked` are errors.
    pub async fn is_enabled(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<bool> {
        self.query(ctx, Query::IsEnabled, unit, options, extra).await
    }

    pub async fn is_failed(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<bool> {
        self.query(ctx, Query::IsFailed, unit, options, extra).await
    }

    /// Read one property (`systemctl show <unit> --property <name>`).
    ///
    /// Returns the raw value; an empty string or `[not set]` is left for the
    /// caller to interpret.
    pub async fn show(
        &self,
        ctx: &Context,
        unit: &str,
        property: &Property,
        options: &Options,
        extra: &[&str],
    ) -> Result<String> {
        let mut args = vec!["--property", property.as_str()];
        args.extend_from_slice(extra);
        let invocation = Invocation::build("show", options, Some(unit), &args);
        let stdout = self.execute(ctx, &invocation).await.into_result()?;
        Ok(property.strip_value(&stdout).to_string())
    }

    /// The text `systemctl status <unit>` prints.
    ///
    /// systemctl exits 3 for units that are not running; the status text is
    /// still returned in that case.
    pub async fn status(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
        extra: &[&str],
    ) -> Result<String> {
        let invocation = Invocation::build("status", options, Some(unit), extra);
        let result = self.execute(ctx, &invocation).await;
        match result.error {
            None => Ok(result.stdout),
            // Exit 3 means "not running"; the text is still the answer unless
            // stderr names a failure.
            Some(SystemctlError::Unspecified { code: Some(3), .. })
                if !result.stdout.is_empty() && classify_kind(&result.stderr).is_none() =>
            {
                Ok(result.stdout)
            }
            Some(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::process::MockCommandRunner;
    use crate::unit::{ENABLED_STATES, UnitStatus};
    use std::path::PathBuf;

    fn client(mock: &Arc<MockCommandRunner>) -> Systemctl {
        Systemctl::with_runner(
            Tools::new(
                Some(PathBuf::from("/usr/bin/systemctl")),
                Some(PathBuf::from("/usr/bin/sudo")),
            ),
            mock.clone(),
        )
    }

    fn kind<T: std::fmt::Debug>(result: Result<T>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn test_is_active_keywords() {
        assert!(Query::IsActive.interpret("active\n", None).unwrap());
        assert!(Query::IsActive.interpret("reloading\n", None).unwrap());
        for word in ["inactive", "failed", "activating", "deactivating", "maintenance"] {
            let stdout = format!("{word}\n");
            assert!(!Query::IsActive.interpret(&stdout, None).unwrap(), "{word}");
        }
    }

    #[test]
    fn test_keyword_trusted_over_exit_code() {
        let err = SystemctlError::Unspecified {
            code: Some(3),
            stderr: String::new(),
        };
        assert!(!Query::IsActive.interpret("inactive\n", Some(err)).unwrap());
    }

    #[test]
    fn test_unknown_output_surfaces_error() {
        let err = SystemctlError::InsufficientPermissions {
            stderr: "Access denied".to_string(),
        };
        assert_eq!(
            kind(Query::IsActive.interpret("", Some(err))),
            ErrorKind::InsufficientPermissions
        );
        // No error and no keyword is still not a silent false.
        assert_eq!(
            kind(Query::IsActive.interpret("bogus\n", None)),
            ErrorKind::Unspecified
        );
    }

    #[test]
    fn test_is_enabled_keywords() {
        for word in ENABLED_STATES {
            assert!(Query::IsEnabled.interpret(word, None).unwrap(), "{word}");
            let status = UnitStatus {
                unit_file_state: word.to_string(),
                ..Default::default()
            };
            assert!(status.is_enabled(), "{word}");
        }
        assert!(!Query::IsEnabled.interpret("disabled\n", None).unwrap());
        assert_eq!(kind(Query::IsEnabled.interpret("linked\n", None)), ErrorKind::Linked);
        assert_eq!(kind(Query::IsEnabled.interpret("linked-runtime\n", None)), ErrorKind::Linked);
        assert_eq!(kind(Query::IsEnabled.interpret("masked\n", None)), ErrorKind::Masked);
        assert_eq!(kind(Query::IsEnabled.interpret("masked-runtime\n", None)), ErrorKind::Masked);
        assert_eq!(kind(Query::IsEnabled.interpret("not-found\n", None)), ErrorKind::DoesNotExist);
    }

    #[test]
    fn test_is_failed_keywords() {
        assert!(Query::IsFailed.interpret("failed\n", None).unwrap());
        assert!(!Query::IsFailed.interpret("active\n", None).unwrap());
        assert!(!Query::IsFailed.interpret("inactive\n", None).unwrap());
    }

    #[tokio::test]
    async fn test_enable_builds_expected_args() {
        let mock = Arc::new(MockCommandRunner::new());
        client(&mock)
            .enable(&Context::new(), "nginx", &Options::system(), &[])
            .await
            .unwrap();
        assert_eq!(mock.call_args(), vec![vec!["enable", "--system", "nginx"]]);
    }

    #[tokio::test]
    async fn test_daemon_reload_has_no_unit() {
        let mock = Arc::new(MockCommandRunner::new());
        client(&mock)
            .daemon_reload(&Context::new(), &Options::user(), &[])
            .await
            .unwrap();
        assert_eq!(mock.call_args(), vec![vec!["daemon-reload", "--user"]]);
    }

    #[tokio::test]
    async fn test_action_passes_through_classified_error() {
        let mock = Arc::new(MockCommandRunner::new().respond(
            "",
            "Failed to start nginx.service: Unit nginx.service is masked.\n",
            1,
        ));
        let err = client(&mock)
            .start(&Context::new(), "nginx", &Options::system(), &["--no-block"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Masked);
        assert_eq!(
            mock.call_args(),
            vec![vec!["start", "--system", "nginx", "--no-block"]]
        );
    }

    #[tokio::test]
    async fn test_is_active_inactive_exit_three() {
        let mock = Arc::new(MockCommandRunner::new().respond("inactive\n", "", 3));
        let active = client(&mock)
            .is_active(&Context::new(), "nginx", &Options::system(), &[])
            .await
            .unwrap();
        assert!(!active);
    }

    #[tokio::test]
    async fn test_query_timeout_is_not_false() {
        let mock = Arc::new(MockCommandRunner::new().fail(SystemctlError::Timeout));
        let err = client(&mock)
            .is_failed(&Context::new(), "nginx", &Options::system(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_show_strips_prefix() {
        let mock = Arc::new(MockCommandRunner::new().respond("ActiveState=active\n", "", 0));
        let value = client(&mock)
            .show(&Context::new(), "nginx", &Property::ACTIVE_STATE, &Options::system(), &[])
            .await
            .unwrap();
        assert_eq!(value, "active");
        assert_eq!(
            mock.call_args(),
            vec![vec!["show", "--system", "nginx", "--property", "ActiveState"]]
        );
    }

    #[tokio::test]
    async fn test_show_error() {
        let mock = Arc::new(MockCommandRunner::new().respond(
            "",
            concat!(
                "Failed to connect to bus: ",
                "$DBUS_SESSION_BUS_ADDRESS and $XDG_RUNTIME_DIR not defined\n",
            ),
            1,
        ));
        let err = client(&mock)
            .show(&Context::new(), "nginx", &Property::MAIN_PID, &Options::user(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BusFailure);
    }

    #[tokio::test]
    async fn test_status_of_stopped_unit() {
        let text = concat!(
            "○ nginx.service - A high performance web server\n",
            "     Active: inactive (dead)\n",
        );
        let mock = Arc::new(MockCommandRunner::new().respond(text, "", 3));
        let status = client(&mock)
            .status(&Context::new(), "nginx", &Options::system(), &[])
            .await
            .unwrap();
        assert_eq!(status, text);
    }

    #[tokio::test]
    async fn test_status_exit_three_with_failure_text() {
        let mock = Arc::new(MockCommandRunner::new().respond(
            "● nginx.service\n",
            "Failed to get properties: Connection reset by peer\n",
            3,
        ));
        let err = client(&mock)
            .status(&Context::new(), "nginx", &Options::system(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unspecified);
        assert_eq!(err.exit_code(), Some(3));
    }

    #[tokio::test]
    async fn test_status_of_unknown_unit() {
        let mock = Arc::new(MockCommandRunner::new().respond(
            "",
            "Unit nonexistant.service could not be found.\n",
            4,
        ));
        let err = client(&mock)
            .status(&Context::new(), "nonexistant", &Options::system(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DoesNotExist);
    }

    #[tokio::test]
    async fn test_sudo_password_goes_to_stdin() {
        use crate::options::{Elevation, Password};

        let mock = Arc::new(MockCommandRunner::new());
        let opts = Options::system().with_elevation(Elevation::SudoPassword(Password::new("pw")));
        client(&mock)
            .restart(&Context::new(), "nginx", &opts, &[])
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].program, PathBuf::from("/usr/bin/sudo"));
        assert_eq!(
            calls[0].args_lossy(),
            vec!["--stdin", "/usr/bin/systemctl", "restart", "--system", "nginx"]
        );
        assert_eq!(calls[0].stdin.as_deref(), Some(b"pw".as_slice()));
    }
}
