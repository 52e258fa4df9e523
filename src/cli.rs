//! CLI argument definitions for unitctl.
//!
//! Separated from `main.rs` so the integration tests and the command
//! handlers can reference these types.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "unitctl")]
#[command(about = "Typed control of systemd units through systemctl")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Talk to the calling user's manager instead of the system one
    #[arg(long, global = true)]
    pub user: bool,

    /// Talk to the system manager even if the config file selects --user
    #[arg(long, global = true, conflicts_with = "user")]
    pub system: bool,

    /// Run systemctl through sudo
    #[arg(long, global = true)]
    pub sudo: bool,

    /// Run systemctl directly even if the config file enables sudo
    #[arg(long, global = true, conflicts_with_all = ["sudo", "askpass", "password_stdin"])]
    pub no_sudo: bool,

    /// Let sudo ask for the password through its askpass helper
    #[arg(long, global = true)]
    pub askpass: bool,

    /// Ignore askpass from the config file
    #[arg(long, global = true, conflicts_with = "askpass")]
    pub no_askpass: bool,

    /// Read the sudo password from the first line of standard input
    #[arg(long, global = true)]
    pub password_stdin: bool,

    /// Give up after this many seconds (0 waits forever)
    #[arg(long, global = true, env = "UNITCTL_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: <config dir>/unitctl/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// systemctl executable to use instead of the one on $PATH
    #[arg(long, global = true, env = "UNITCTL_SYSTEMCTL", value_name = "PATH")]
    pub systemctl: Option<PathBuf>,

    /// sudo executable to use instead of the one on $PATH
    #[arg(long, global = true, env = "UNITCTL_SUDO", value_name = "PATH")]
    pub sudo_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// A unit plus extra arguments passed to systemctl after `--`.
#[derive(Debug, Args)]
pub struct UnitArgs {
    /// Unit name (e.g. nginx or nginx.service)
    pub unit: String,

    /// Extra arguments appended to the systemctl command line
    #[arg(last = true, value_name = "SYSTEMCTL_ARGS")]
    pub extra: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UnitArg {
    /// Unit name (e.g. nginx or nginx.service)
    pub unit: String,
}

#[derive(Debug, Args)]
pub struct ExtraArgs {
    /// Extra arguments appended to the systemctl command line
    #[arg(last = true, value_name = "SYSTEMCTL_ARGS")]
    pub extra: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start (activate) a unit
    Start(UnitArgs),
    /// Stop (deactivate) a unit
    Stop(UnitArgs),
    /// Restart a unit, starting it if it was not running
    Restart(UnitArgs),
    /// Enable a unit to start at boot
    Enable(UnitArgs),
    /// Disable a unit
    Disable(UnitArgs),
    /// Disable and re-enable a unit
    Reenable(UnitArgs),
    /// Mask a unit, making it impossible to start
    Mask(UnitArgs),
    /// Unmask a unit
    Unmask(UnitArgs),
    /// Reload the manager configuration
    DaemonReload(ExtraArgs),

    /// Exit 0 if the unit is active, 1 otherwise
    IsActive(UnitArgs),
    /// Exit 0 if the unit is enabled, 1 otherwise
    IsEnabled(UnitArgs),
    /// Exit 0 if the unit has failed, 1 otherwise
    IsFailed(UnitArgs),
    /// Exit 0 if the unit's process is running, 1 otherwise
    IsRunning(UnitArg),
    /// Exit 0 if the unit file is masked, 1 otherwise
    IsMasked(UnitArg),
    /// Exit 0 if PID 1 is systemd, 1 otherwise
    IsSystemd,

    /// Print `systemctl status` for a unit
    Status(UnitArgs),
    /// Print a single property of a unit
    Show {
        /// Unit name
        unit: String,
        /// Property name (e.g. ActiveState)
        #[arg(short, long)]
        property: String,
    },
    /// Print the PID of the unit's main process
    Pid(UnitArg),
    /// Print the unit's current memory use in bytes
    Memory(UnitArg),
    /// Print how many times the unit was restarted
    Restarts(UnitArg),
    /// Print when the unit's main process started
    StartTime(UnitArg),
    /// Print a short status summary of a unit
    Describe(UnitArg),
    /// List all loaded units
    Units,
    /// List masked units
    Masked,
    /// List socket units that activate a service
    Sockets(UnitArg),
}
