//! Output helpers for consistent CLI output.
//!
//! Status lines carry a colored prefix when the stream they go to is a
//! terminal, and plain text otherwise, so piped output stays grep-able.
//!
//! # Example
//!
//! ```rust,ignore
//! use unitctl::output::Output;
//!
//! Output::success("Started nginx.service");
//! Output::error("Unit does not exist");
//! Output::unit_status(&status);
//! ```

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::unit::{UnitStatus, is_enabled_state};

/// Standard output helper for consistent CLI formatting.
pub struct Output;

fn stdout_color() -> bool {
    std::io::stdout().is_terminal()
}

fn stderr_color() -> bool {
    std::io::stderr().is_terminal()
}

impl Output {
    /// Print a success message with a green checkmark.
    ///
    /// Example: `✓ Started nginx.service`
    pub fn success(msg: impl AsRef<str>) {
        if stdout_color() {
            println!("{} {}", "✓".green().bold(), msg.as_ref());
        } else {
            println!("✓ {}", msg.as_ref());
        }
    }

    /// Print an error message with a red X to stderr.
    pub fn error(msg: impl AsRef<str>) {
        if stderr_color() {
            eprintln!("{} {}", "✗".red().bold(), msg.as_ref().red());
        } else {
            eprintln!("✗ {}", msg.as_ref());
        }
    }

    /// Print a key-value pair with alignment.
    ///
    /// Example: `  Active:        active (running)`
    pub fn kv(key: impl AsRef<str>, value: impl AsRef<str>) {
        let key = format!("{}:", key.as_ref());
        if stdout_color() {
            println!("  {:<14} {}", key.cyan(), value.as_ref());
        } else {
            println!("  {:<14} {}", key, value.as_ref());
        }
    }

    /// Print a plain line, for machine-consumable values.
    pub fn value(value: impl std::fmt::Display) {
        println!("{}", value);
    }

    /// Print a unit status as a heading and aligned key-value lines.
    pub fn unit_status(status: &UnitStatus) {
        let use_color = stdout_color();

        let active = if use_color {
            match status.active_state.as_str() {
                "active" => status.active_state.green().to_string(),
                "inactive" => status.active_state.dimmed().to_string(),
                "failed" => status.active_state.red().to_string(),
                _ => status.active_state.yellow().to_string(),
            }
        } else {
            status.active_state.clone()
        };

        let enabled = if use_color {
            match status.unit_file_state.as_str() {
                s if is_enabled_state(s) => status.unit_file_state.green().to_string(),
                "disabled" => status.unit_file_state.dimmed().to_string(),
                s if s.starts_with("masked") => status.unit_file_state.red().to_string(),
                _ => status.unit_file_state.yellow().to_string(),
            }
        } else {
            status.unit_file_state.clone()
        };

        if use_color {
            println!("● {}", status.name.bold());
        } else {
            println!("● {}", status.name);
        }
        if !status.description.is_empty() {
            Self::kv("Description", &status.description);
        }
        Self::kv("Loaded", &status.load_state);
        Self::kv("Active", format!("{} ({})", active, status.sub_state));
        Self::kv("Enabled", enabled);
    }
}
