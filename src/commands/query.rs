//! Handlers that read unit state without changing it.

use anyhow::{Context as _, Result};
use std::process::ExitCode;

use super::{Session, exit_for};
use crate::cli::UnitArgs;
use crate::helpers;
use crate::output::Output;
use crate::properties::Property;
use crate::systemctl::Query;

fn print_answer(session: &Session, check: &str, unit: Option<&str>, answer: bool) {
    if session.json {
        Output::value(serde_json::json!({ "check": check, "unit": unit, "result": answer }));
    } else {
        Output::value(answer);
    }
}

pub async fn check(session: &Session, query: Query, args: &UnitArgs) -> Result<ExitCode> {
    let extra = Session::extra(&args.extra);
    let answer = session
        .systemctl
        .query(&session.ctx, query, &args.unit, &session.options, &extra)
        .await
        .with_context(|| format!("Failed to check {} {}", query.as_str(), args.unit))?;

    print_answer(session, query.as_str(), Some(&args.unit), answer);
    Ok(exit_for(answer))
}

pub async fn is_running(session: &Session, unit: &str) -> Result<ExitCode> {
    let answer = session
        .systemctl
        .is_running(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to check whether {} is running", unit))?;

    print_answer(session, "is-running", Some(unit), answer);
    Ok(exit_for(answer))
}

pub async fn is_systemd(session: &Session) -> Result<ExitCode> {
    let answer = helpers::is_systemd().context("Failed to read /proc/1/comm")?;
    print_answer(session, "is-systemd", None, answer);
    Ok(exit_for(answer))
}

pub async fn status(session: &Session, args: &UnitArgs) -> Result<ExitCode> {
    let extra = Session::extra(&args.extra);
    let text = session
        .systemctl
        .status(&session.ctx, &args.unit, &session.options, &extra)
        .await
        .with_context(|| format!("Failed to get status of {}", args.unit))?;

    if session.json {
        Output::value(serde_json::json!({ "unit": args.unit, "status": text }));
    } else {
        print!("{}", text);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn show(session: &Session, unit: &str, property: &str) -> Result<ExitCode> {
    let property = Property::new(property);
    let value = session
        .systemctl
        .show(&session.ctx, unit, &property, &session.options, &[])
        .await
        .with_context(|| format!("Failed to read {} of {}", property, unit))?;

    if session.json {
        Output::value(serde_json::json!({
            "unit": unit,
            "property": property.as_str(),
            "value": value,
        }));
    } else {
        Output::value(value);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn pid(session: &Session, unit: &str) -> Result<ExitCode> {
    let pid = session
        .systemctl
        .get_pid(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to read main PID of {}", unit))?;

    if session.json {
        Output::value(serde_json::json!({ "unit": unit, "pid": pid }));
    } else {
        Output::value(pid);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn memory(session: &Session, unit: &str) -> Result<ExitCode> {
    let bytes = session
        .systemctl
        .get_memory_usage(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to read memory use of {}", unit))?;

    if session.json {
        Output::value(serde_json::json!({ "unit": unit, "memory_bytes": bytes }));
    } else {
        Output::value(bytes);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn restarts(session: &Session, unit: &str) -> Result<ExitCode> {
    let count = session
        .systemctl
        .get_num_restarts(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to read restart count of {}", unit))?;

    if session.json {
        Output::value(serde_json::json!({ "unit": unit, "restarts": count }));
    } else {
        Output::value(count);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn start_time(session: &Session, unit: &str) -> Result<ExitCode> {
    let started = session
        .systemctl
        .get_start_time(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to read start time of {}", unit))?;

    if session.json {
        Output::value(serde_json::json!({ "unit": unit, "start_time": started }));
    } else {
        Output::value(started.to_rfc3339());
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn describe(session: &Session, unit: &str) -> Result<ExitCode> {
    let status = session
        .systemctl
        .unit_status(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to describe {}", unit))?;

    if session.json {
        Output::value(serde_json::to_string_pretty(&status)?);
    } else {
        Output::unit_status(&status);
    }
    Ok(ExitCode::SUCCESS)
}
