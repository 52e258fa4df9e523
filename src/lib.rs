//! unitctl - typed control of systemd units through `systemctl`.
//!
//! The library drives the `systemctl` executable rather than talking D-Bus,
//! so it behaves exactly like an administrator's shell session: same
//! polkit rules, same sudo configuration, same diagnostics.
//!
//! ```rust,ignore
//! use unitctl::{Context, Options, Systemctl};
//! use std::time::Duration;
//!
//! let systemctl = Systemctl::new();
//! let ctx = Context::with_timeout(Duration::from_secs(5));
//! systemctl.restart(&ctx, "nginx", &Options::system(), &[]).await?;
//! assert!(systemctl.is_active(&ctx, "nginx", &Options::system(), &[]).await?);
//! ```
//!
//! Failures are [`SystemctlError`] values; branch on [`SystemctlError::kind`].

pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod helpers;
pub mod invocation;
pub mod options;
pub mod output;
pub mod process;
pub mod properties;
pub mod runner;
pub mod systemctl;
pub mod tools;
pub mod unit;

pub use classify::classify;
pub use cli::{Cli, Commands};
pub use context::Context;
pub use error::{ErrorKind, Result, SystemctlError};
pub use helpers::{is_systemd, is_systemd_at};
pub use invocation::Invocation;
pub use options::{Elevation, Options, Password, Scope};
pub use process::{CommandRunner, MockCommandRunner, RawOutput, TokioCommandRunner};
pub use properties::Property;
pub use runner::{ExecutionResult, Runner};
pub use systemctl::{Action, Query, Systemctl};
pub use tools::{PreparedCommand, Tools};
pub use unit::{Unit, UnitStatus};
