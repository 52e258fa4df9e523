//! Handlers for state-changing actions (start, stop, enable, ...).

use anyhow::{Context as _, Result};
use std::process::ExitCode;

use super::Session;
use crate::cli::{ExtraArgs, UnitArgs};
use crate::output::Output;
use crate::systemctl::Action;

pub async fn run(session: &Session, action: Action, args: &UnitArgs) -> Result<ExitCode> {
    let extra = Session::extra(&args.extra);
    session
        .systemctl
        .act(&session.ctx, action, Some(&args.unit), &session.options, &extra)
        .await
        .with_context(|| format!("Failed to {} {}", action.as_str(), args.unit))?;

    report(session, action, Some(&args.unit));
    Ok(ExitCode::SUCCESS)
}

pub async fn daemon_reload(session: &Session, args: &ExtraArgs) -> Result<ExitCode> {
    let extra = Session::extra(&args.extra);
    session
        .systemctl
        .daemon_reload(&session.ctx, &session.options, &extra)
        .await
        .context("Failed to reload the systemd manager")?;

    report(session, Action::DaemonReload, None);
    Ok(ExitCode::SUCCESS)
}

fn report(session: &Session, action: Action, unit: Option<&str>) {
    if session.json {
        Output::value(serde_json::json!({
            "action": action.as_str(),
            "unit": unit,
            "scope": session.options.scope,
            "ok": true,
        }));
        return;
    }

    let verb = capitalize(action.past_tense());
    match unit {
        Some(unit) => Output::success(format!("{} {}", verb, unit)),
        None => Output::success(format!("{} {} manager", verb, session.options.scope)),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
