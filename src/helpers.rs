//! Typed getters and listings built on top of the façade.
//!
//! The parsers are free functions over systemctl's text output so they can be
//! tested without running anything.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::{Result, SystemctlError};
use crate::invocation::Invocation;
use crate::options::Options;
use crate::properties::Property;
use crate::systemctl::Systemctl;
use crate::unit::{Unit, UnitStatus, normalize_unit_name, strip_unit_suffix};

/// Layout of systemd timestamps, e.g. `Mon 2024-01-15 10:30:00 UTC`.
pub const TIMESTAMP_FORMAT: &str = "%a %Y-%m-%d %H:%M:%S";

const NOT_SET: &str = "[not set]";

impl Systemctl {
    /// When the unit's main process was started.
    ///
    /// Fails with [`SystemctlError::UnitNotActive`] when the unit has no start time.
    pub async fn get_start_time(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
    ) -> Result<DateTime<Local>> {
        let property = Property::EXEC_MAIN_START_TIMESTAMP;
        let value = self.show(ctx, unit, &property, options, &[]).await?;
        if value.is_empty() {
            return Err(SystemctlError::UnitNotActive);
        }
        parse_start_time(&value)
    }

    /// How many times systemd restarted the unit.
    pub async fn get_num_restarts(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
    ) -> Result<u32> {
        let property = Property::N_RESTARTS;
        let value = self.show(ctx, unit, &property, options, &[]).await?;
        parse_value(&property, require_set(&value)?)
    }

    /// Current memory use in bytes.
    pub async fn get_memory_usage(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
    ) -> Result<u64> {
        let property = Property::MEMORY_CURRENT;
        let value = self.show(ctx, unit, &property, options, &[]).await?;
        parse_value(&property, require_set(&value)?)
    }

    /// PID of the main process; 0 when the unit has none.
    pub async fn get_pid(&self, ctx: &Context, unit: &str, options: &Options) -> Result<u32> {
        let property = Property::MAIN_PID;
        let value = self.show(ctx, unit, &property, options, &[]).await?;
        parse_value(&property, &value)
    }

    /// Read several properties in one call.
    pub async fn show_many(
        &self,
        ctx: &Context,
        unit: &str,
        properties: &[Property],
        options: &Options,
    ) -> Result<BTreeMap<String, String>> {
        let mut args = Vec::with_capacity(properties.len() * 2);
        for property in properties {
            args.push("--property");
            args.push(property.as_str());
        }
        let invocation = Invocation::build("show", options, Some(unit), &args);
        let stdout = self.execute(ctx, &invocation).await.into_result()?;
        Ok(parse_show_map(&stdout))
    }

    pub async fn unit_status(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
    ) -> Result<UnitStatus> {
        let properties = [
            Property::ID,
            Property::DESCRIPTION,
            Property::LOAD_STATE,
            Property::ACTIVE_STATE,
            Property::SUB_STATE,
            Property::UNIT_FILE_STATE,
        ];
        let mut map = self.show_many(ctx, unit, &properties, options).await?;
        let mut take = |property: &Property| map.remove(property.as_str()).unwrap_or_default();

        let id = take(&Property::ID);
        Ok(UnitStatus {
            name: if id.is_empty() { unit.to_string() } else { id },
            description: take(&Property::DESCRIPTION),
            load_state: take(&Property::LOAD_STATE),
            active_state: take(&Property::ACTIVE_STATE),
            sub_state: take(&Property::SUB_STATE),
            unit_file_state: take(&Property::UNIT_FILE_STATE),
        })
    }

    /// All units systemd has loaded, in any state.
    pub async fn list_units(&self, ctx: &Context, options: &Options) -> Result<Vec<Unit>> {
        let args = ["--all", "--no-legend", "--full", "--no-pager"];
        let invocation = Invocation::build("list-units", options, None, &args);
        let stdout = self.execute(ctx, &invocation).await.into_result()?;
        Ok(parse_list_units(&stdout))
    }

    /// Names of masked unit files, without their type suffix.
    pub async fn masked_units(&self, ctx: &Context, options: &Options) -> Result<Vec<String>> {
        let files = self.masked_unit_files(ctx, options).await?;
        Ok(files
            .iter()
            .map(|name| strip_unit_suffix(name).to_string())
            .collect())
    }

    /// Whether the unit file is masked. A bare name means `<name>.service`.
    pub async fn is_masked(&self, ctx: &Context, unit: &str, options: &Options) -> Result<bool> {
        let wanted = normalize_unit_name(unit);
        let files = self.masked_unit_files(ctx, options).await?;
        Ok(files.iter().any(|name| *name == wanted))
    }

    /// Whether the unit's sub-state is `running`.
    ///
    /// `is_active` is also true for oneshot units that exited successfully;
    /// this is not.
    pub async fn is_running(&self, ctx: &Context, unit: &str, options: &Options) -> Result<bool> {
        let sub_state = self.show(ctx, unit, &Property::SUB_STATE, options, &[]).await?;
        Ok(sub_state == "running")
    }

    /// Socket units that activate the given service.
    pub async fn sockets_for_service(
        &self,
        ctx: &Context,
        unit: &str,
        options: &Options,
    ) -> Result<Vec<String>> {
        let args = ["--all", "--no-legend", "--no-pager"];
        let invocation = Invocation::build("list-sockets", options, None, &args);
        let stdout = self.execute(ctx, &invocation).await.into_result()?;
        Ok(sockets_activating(&stdout, &normalize_unit_name(unit)))
    }

    async fn masked_unit_files(&self, ctx: &Context, options: &Options) -> Result<Vec<String>> {
        let args = ["--state=masked", "--no-legend", "--no-pager"];
        let invocation = Invocation::build("list-unit-files", options, None, &args);
        let stdout = self.execute(ctx, &invocation).await.into_result()?;
        Ok(parse_masked_unit_files(&stdout))
    }
}

/// Whether PID 1 is systemd.
pub fn is_systemd() -> io::Result<bool> {
    is_systemd_at(Path::new("/proc/1/comm"))
}

/// Like [`is_systemd`], reading the process name from `path`.
pub fn is_systemd_at(path: &Path) -> io::Result<bool> {
    let comm = std::fs::read_to_string(path)?;
    Ok(comm.trim() == "systemd")
}

fn require_set(value: &str) -> Result<&str> {
    if value.is_empty() || value == NOT_SET {
        Err(SystemctlError::ValueNotSet)
    } else {
        Ok(value)
    }
}

fn parse_value<T>(property: &Property, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| SystemctlError::Parse {
        property: property.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a systemd timestamp such as `Mon 2024-01-15 10:30:00 UTC`.
///
/// UTC and GMT stamps are converted exactly; any other zone name is taken to
/// be the local zone, which is what systemctl prints in.
pub fn parse_start_time(value: &str) -> Result<DateTime<Local>> {
    let parse_error = |reason: String| SystemctlError::Parse {
        property: Property::EXEC_MAIN_START_TIMESTAMP.to_string(),
        value: value.to_string(),
        reason,
    };

    let (stamp, zone) = value
        .trim()
        .rsplit_once(' ')
        .ok_or_else(|| parse_error("missing time zone".to_string()))?;

    let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map_err(|e| parse_error(e.to_string()))?;

    match zone {
        "UTC" | "GMT" => Ok(Utc.from_utc_datetime(&naive).with_timezone(&Local)),
        _ => {
            debug!(zone, "Interpreting timestamp in the local time zone");
            Local.from_local_datetime(&naive).earliest().ok_or_else(|| {
                parse_error(format!("{naive} does not exist in the local time zone"))
            })
        }
    }
}

/// Parse `Key=Value` lines from `systemctl show`.
pub fn parse_show_map(stdout: &str) -> BTreeMap<String, String> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Parse `systemctl list-units --no-legend --full` rows.
pub fn parse_list_units(stdout: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    for line in stdout.lines() {
        let mut fields = line.split_whitespace().peekable();
        // Failed or not-found units carry a status marker in front.
        if matches!(fields.peek(), Some(&"●") | Some(&"*")) {
            fields.next();
        }
        let fields: Vec<&str> = fields.collect();
        if fields.len() < 4 {
            if !line.trim().is_empty() {
                warn!("Skipping unparseable list-units line: {:?}", line);
            }
            continue;
        }
        units.push(Unit {
            name: fields[0].to_string(),
            load: fields[1].to_string(),
            active: fields[2].to_string(),
            sub: fields[3].to_string(),
            description: fields[4..].join(" "),
        });
    }
    units
}

/// Full names of masked unit files from `systemctl list-unit-files --state=masked`.
pub fn parse_masked_unit_files(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let state = fields.next()?;
            matches!(state, "masked" | "masked-runtime").then(|| name.to_string())
        })
        .collect()
}

/// Socket units from `systemctl list-sockets` whose ACTIVATES column names `service`.
///
/// LISTEN may span several fields (`kobject-uevent 1`), so the UNIT column is
/// the first field ending in `.socket`.
pub fn sockets_activating(stdout: &str, service: &str) -> Vec<String> {
    let mut sockets = Vec::new();
    for line in stdout.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(unit_at) = fields.iter().skip(1).position(|f| f.ends_with(".socket")) else {
            continue;
        };
        let unit_at = unit_at + 1;
        let activates = fields[unit_at + 1..].join(" ");
        if activates.split(',').any(|name| name.trim() == service) {
            sockets.push(fields[unit_at].to_string());
        }
    }
    sockets
}
