//! Command handlers for the `unitctl` binary.
//!
//! [`run`] merges the command line with the config file into a [`Session`]
//! and dispatches to the handler modules. Handlers return the process exit
//! code: boolean checks exit 0 for true and 1 for false, everything else
//! exits 0 on success and reports failures as errors.

pub mod action;
pub mod list;
pub mod query;

use anyhow::{Context as _, Result};
use std::io::BufRead;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Systemctl;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::context::Context;
use crate::options::{Options, Scope};
use crate::process::TokioCommandRunner;
use crate::systemctl::{Action, Query};
use crate::tools::Tools;

/// Applied when neither `--timeout` nor the config file sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a handler needs, resolved once per process.
#[derive(Debug)]
pub struct Session {
    pub systemctl: Systemctl,
    pub options: Options,
    pub ctx: Context,
    pub json: bool,
}

impl Session {
    pub fn from_cli(cli: &Cli, config: Config, password: Option<String>) -> Result<Self> {
        // Config values are defaults; a flag for either setting wins.
        let scope = if cli.user || (config.user && !cli.system) {
            Scope::User
        } else {
            Scope::System
        };
        let sudo = cli.sudo || (config.sudo && !cli.no_sudo);
        let askpass = cli.askpass || (config.askpass && !cli.no_askpass && !cli.no_sudo);
        let options = Options::from_flags(scope, sudo, password, askpass)?;

        let timeout = cli
            .timeout
            .or(config.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let ctx = match timeout {
            0 => Context::new(),
            secs => Context::with_timeout(Duration::from_secs(secs)),
        };

        let tools = Tools::detect().with_overrides(
            cli.systemctl.clone().or(config.systemctl),
            cli.sudo_path.clone().or(config.sudo_path),
        );

        Ok(Self {
            systemctl: Systemctl::with_runner(tools, Arc::new(TokioCommandRunner)),
            options,
            ctx,
            json: cli.json,
        })
    }

    /// Extra arguments as the borrowed slice the library takes.
    pub fn extra(extra: &[String]) -> Vec<&str> {
        extra.iter().map(String::as_str).collect()
    }
}

fn read_password(stdin: impl BufRead) -> Result<String> {
    let mut line = String::new();
    stdin
        .take(4096)
        .read_line(&mut line)
        .context("Failed to read sudo password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Cancel `token` on Ctrl-C. Only the first call in a process installs a handler.
fn cancel_on_interrupt(token: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }
}

fn exit_for(answer: bool) -> ExitCode {
    if answer {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    let password = if cli.password_stdin {
        Some(read_password(std::io::stdin().lock())?)
    } else {
        None
    };
    let session = Session::from_cli(&cli, config, password)?;
    debug!(
        scope = %session.options.scope,
        elevated = session.options.elevation.is_elevated(),
        "Session ready"
    );
    cancel_on_interrupt(session.ctx.token().clone());

    match cli.command {
        Commands::Start(args) => action::run(&session, Action::Start, &args).await,
        Commands::Stop(args) => action::run(&session, Action::Stop, &args).await,
        Commands::Restart(args) => action::run(&session, Action::Restart, &args).await,
        Commands::Enable(args) => action::run(&session, Action::Enable, &args).await,
        Commands::Disable(args) => action::run(&session, Action::Disable, &args).await,
        Commands::Reenable(args) => action::run(&session, Action::Reenable, &args).await,
        Commands::Mask(args) => action::run(&session, Action::Mask, &args).await,
        Commands::Unmask(args) => action::run(&session, Action::Unmask, &args).await,
        Commands::DaemonReload(args) => action::daemon_reload(&session, &args).await,

        Commands::IsActive(args) => query::check(&session, Query::IsActive, &args).await,
        Commands::IsEnabled(args) => query::check(&session, Query::IsEnabled, &args).await,
        Commands::IsFailed(args) => query::check(&session, Query::IsFailed, &args).await,
        Commands::IsRunning(arg) => query::is_running(&session, &arg.unit).await,
        Commands::IsMasked(arg) => list::is_masked(&session, &arg.unit).await,
        Commands::IsSystemd => query::is_systemd(&session).await,

        Commands::Status(args) => query::status(&session, &args).await,
        Commands::Show { unit, property } => query::show(&session, &unit, &property).await,
        Commands::Pid(arg) => query::pid(&session, &arg.unit).await,
        Commands::Memory(arg) => query::memory(&session, &arg.unit).await,
        Commands::Restarts(arg) => query::restarts(&session, &arg.unit).await,
        Commands::StartTime(arg) => query::start_time(&session, &arg.unit).await,
        Commands::Describe(arg) => query::describe(&session, &arg.unit).await,
        Commands::Units => list::units(&session).await,
        Commands::Masked => list::masked(&session).await,
        Commands::Sockets(arg) => list::sockets(&session, &arg.unit).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Elevation;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_read_password_strips_newline() {
        assert_eq!(read_password(&b"hunter2\n"[..]).unwrap(), "hunter2");
        assert_eq!(read_password(&b"pw\r\nignored\n"[..]).unwrap(), "pw");
        assert_eq!(read_password(&b""[..]).unwrap(), "");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&["unitctl", "--timeout", "0", "--systemctl", "/tmp/fake", "units"]);
        let config = Config {
            user: true,
            timeout_secs: Some(5),
            systemctl: Some(PathBuf::from("/opt/systemctl")),
            ..Default::default()
        };
        let session = Session::from_cli(&cli, config, None).unwrap();
        assert_eq!(session.options.scope, Scope::User);
        assert_eq!(session.ctx.deadline(), None);
        assert_eq!(
            session.systemctl.tools().systemctl(),
            Some(std::path::Path::new("/tmp/fake"))
        );
    }

    #[test]
    fn test_negating_flags_override_config() {
        let config = Config {
            user: true,
            sudo: true,
            askpass: true,
            ..Default::default()
        };

        let cli = parse(&["unitctl", "units"]);
        let session = Session::from_cli(&cli, config.clone(), None).unwrap();
        assert_eq!(session.options.scope, Scope::User);
        assert_eq!(session.options.elevation, Elevation::SudoAskPass);

        let cli = parse(&["unitctl", "--system", "--no-sudo", "units"]);
        let session = Session::from_cli(&cli, config.clone(), None).unwrap();
        assert_eq!(session.options.scope, Scope::System);
        assert_eq!(session.options.elevation, Elevation::None);

        let cli = parse(&["unitctl", "--no-askpass", "--password-stdin", "units"]);
        let session = Session::from_cli(&cli, config, Some("pw".to_string())).unwrap();
        assert!(matches!(session.options.elevation, Elevation::SudoPassword(_)));
    }

    #[test]
    fn test_password_requires_sudo() {
        let cli = parse(&["unitctl", "units"]);
        assert!(Session::from_cli(&cli, Config::default(), Some("pw".to_string())).is_err());

        let cli = parse(&["unitctl", "--sudo", "units"]);
        let session = Session::from_cli(&cli, Config::default(), Some("pw".to_string())).unwrap();
        assert!(matches!(session.options.elevation, Elevation::SudoPassword(_)));
    }

    #[test]
    fn test_default_timeout_applies() {
        let cli = parse(&["unitctl", "units"]);
        let session = Session::from_cli(&cli, Config::default(), None).unwrap();
        assert!(session.ctx.deadline().is_some());
    }
}
