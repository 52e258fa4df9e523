//! Handlers for listings across units.

use anyhow::{Context as _, Result};
use std::process::ExitCode;

use super::{Session, exit_for};
use crate::output::Output;

pub async fn units(session: &Session) -> Result<ExitCode> {
    let units = session
        .systemctl
        .list_units(&session.ctx, &session.options)
        .await
        .context("Failed to list units")?;

    if session.json {
        Output::value(serde_json::to_string_pretty(&units)?);
        return Ok(ExitCode::SUCCESS);
    }

    let width = units.iter().map(|u| u.name.len()).max().unwrap_or(0);
    for unit in &units {
        Output::value(format!(
            "{:<width$} {:<9} {:<10} {:<9} {}",
            unit.name, unit.load, unit.active, unit.sub, unit.description
        ));
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn masked(session: &Session) -> Result<ExitCode> {
    let names = session
        .systemctl
        .masked_units(&session.ctx, &session.options)
        .await
        .context("Failed to list masked units")?;

    if session.json {
        Output::value(serde_json::to_string(&names)?);
    } else {
        for name in &names {
            Output::value(name);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn is_masked(session: &Session, unit: &str) -> Result<ExitCode> {
    let answer = session
        .systemctl
        .is_masked(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to check whether {} is masked", unit))?;

    if session.json {
        Output::value(serde_json::json!({ "check": "is-masked", "unit": unit, "result": answer }));
    } else {
        Output::value(answer);
    }
    Ok(exit_for(answer))
}

pub async fn sockets(session: &Session, unit: &str) -> Result<ExitCode> {
    let sockets = session
        .systemctl
        .sockets_for_service(&session.ctx, unit, &session.options)
        .await
        .with_context(|| format!("Failed to list sockets for {}", unit))?;

    if session.json {
        Output::value(serde_json::to_string(&sockets)?);
    } else {
        for socket in &sockets {
            Output::value(socket);
        }
    }
    Ok(ExitCode::SUCCESS)
}
