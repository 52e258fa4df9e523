//! Persistent defaults for the `unitctl` command line.
//!
//! Read from `--config`, then `$UNITCTL_CONFIG`, then
//! `<config dir>/unitctl/config.json`. Flags given on the command line win
//! over anything read here.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV: &str = "UNITCTL_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Talk to the per-user manager instead of the system one.
    pub user: bool,
    /// Run systemctl through sudo.
    pub sudo: bool,
    /// Let sudo use its askpass helper.
    pub askpass: bool,
    /// Default time limit per command; 0 disables it.
    pub timeout_secs: Option<u64>,
    /// Explicit systemctl path instead of a `$PATH` lookup.
    pub systemctl: Option<PathBuf>,
    /// Explicit sudo path instead of a `$PATH` lookup.
    pub sudo_path: Option<PathBuf>,
}

impl Config {
    /// Default location, if a config directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.config_dir().join("unitctl").join("config.json"))
    }

    /// Resolve the config path and load it.
    ///
    /// An explicitly named file must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
