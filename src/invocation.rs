//! Building systemctl argument vectors.
//!
//! An [`Invocation`] is pure data: the systemctl tokens
//! (`<subcommand> <scope-flag> [units...] [extra...]`) plus what is needed to
//! wrap them in sudo. Building never fails and never touches the system; path
//! resolution happens later in [`Tools::prepare`](crate::tools::Tools::prepare).

use crate::options::{Elevation, Options, Password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tokens: Vec<String>,
    elevation: Elevation,
}

impl Invocation {
    /// Build an invocation targeting at most one unit.
    pub fn build(subcommand: &str, options: &Options, unit: Option<&str>, extra: &[&str]) -> Self {
        let units: Vec<&str> = unit.into_iter().collect();
        Self::build_for_units(subcommand, options, &units, extra)
    }

    /// Build an invocation for subcommands that accept several units.
    pub fn build_for_units(
        subcommand: &str,
        options: &Options,
        units: &[&str],
        extra: &[&str],
    ) -> Self {
        let mut tokens = Vec::with_capacity(2 + units.len() + extra.len());
        tokens.push(subcommand.to_string());
        tokens.push(options.scope.flag().to_string());
        tokens.extend(units.iter().map(|u| u.to_string()));
        tokens.extend(extra.iter().map(|a| a.to_string()));

        Self {
            tokens,
            elevation: options.elevation.clone(),
        }
    }

    /// The systemctl arguments, without any sudo prefix.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn subcommand(&self) -> &str {
        &self.tokens[0]
    }

    pub fn is_elevated(&self) -> bool {
        self.elevation.is_elevated()
    }

    /// sudo flags that precede the systemctl path when elevated.
    pub fn elevation_prefix(&self) -> &'static [&'static str] {
        self.elevation.wrapper_flags()
    }

    /// Secret to feed to the child's standard input, if any.
    pub fn stdin_secret(&self) -> Option<&Password> {
        self.elevation.password()
    }

    /// Shell-quoted rendering of the systemctl tokens, for logs.
    pub fn display(&self) -> String {
        shlex::try_join(self.tokens.iter().map(String::as_str))
            .unwrap_or_else(|_| self.tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Scope;

    #[test]
    fn test_build_table() {
        struct Case {
            name: &'static str,
            base: &'static str,
            opts: Options,
            unit: Option<&'static str>,
            extra: &'static [&'static str],
            expected: &'static [&'static str],
        }

        let cases = [
            Case {
                name: "system mode no extra",
                base: "start",
                opts: Options::system(),
                unit: None,
                extra: &[],
                expected: &["start", "--system"],
            },
            Case {
                name: "user mode no extra",
                base: "start",
                opts: Options::user(),
                unit: None,
                extra: &[],
                expected: &["start", "--user"],
            },
            Case {
                name: "system mode with unit",
                base: "start",
                opts: Options::system(),
                unit: Some("nginx.service"),
                extra: &[],
                expected: &["start", "--system", "nginx.service"],
            },
            Case {
                name: "user mode with unit and extra args",
                base: "restart",
                opts: Options::user(),
                unit: Some("foo.service"),
                extra: &["--no-block"],
                expected: &["restart", "--user", "foo.service", "--no-block"],
            },
            Case {
                name: "daemon-reload no extra",
                base: "daemon-reload",
                opts: Options::system(),
                unit: None,
                extra: &[],
                expected: &["daemon-reload", "--system"],
            },
            Case {
                name: "enable nginx",
                base: "enable",
                opts: Options::system(),
                unit: Some("nginx"),
                extra: &[],
                expected: &["enable", "--system", "nginx"],
            },
        ];

        for case in cases {
            let got = Invocation::build(case.base, &case.opts, case.unit, case.extra);
            assert_eq!(got.tokens(), case.expected, "{}", case.name);
        }
    }

    #[test]
    fn test_build_for_units() {
        let inv = Invocation::build_for_units(
            "stop",
            &Options::user(),
            &["a.service", "b.service"],
            &["--no-block"],
        );
        assert_eq!(
            inv.tokens(),
            &["stop", "--user", "a.service", "b.service", "--no-block"]
        );
    }

    #[test]
    fn test_show_property_order() {
        let inv = Invocation::build(
            "show",
            &Options::system(),
            Some("nginx"),
            &["--property", "MainPID"],
        );
        assert_eq!(
            inv.tokens(),
            &["show", "--system", "nginx", "--property", "MainPID"]
        );
        assert_eq!(inv.subcommand(), "show");
    }

    #[test]
    fn test_unelevated_has_no_prefix() {
        let inv = Invocation::build("start", &Options::system(), Some("nginx"), &[]);
        assert!(!inv.is_elevated());
        assert!(inv.elevation_prefix().is_empty());
        assert!(inv.stdin_secret().is_none());
    }

    #[test]
    fn test_password_never_becomes_a_token() {
        let opts = Options::system()
            .with_elevation(Elevation::SudoPassword(Password::new("s3cret")));
        let inv = Invocation::build("restart", &opts, Some("nginx"), &[]);

        assert!(inv.is_elevated());
        assert_eq!(inv.elevation_prefix(), &["--stdin"]);
        assert!(inv.tokens().iter().all(|t| !t.contains("s3cret")));
        assert_eq!(inv.stdin_secret().map(Password::expose), Some("s3cret"));
        assert!(!inv.display().contains("s3cret"));
    }

    #[test]
    fn test_askpass_prefix() {
        let opts = Options::default()
            .with_scope(Scope::User)
            .with_elevation(Elevation::SudoAskPass);
        let inv = Invocation::build("stop", &opts, Some("foo"), &[]);
        assert_eq!(inv.elevation_prefix(), &["--askpass"]);
        assert_eq!(inv.tokens(), &["stop", "--user", "foo"]);
    }

    #[test]
    fn test_display_quotes_tokens() {
        let inv = Invocation::build("show", &Options::system(), Some("my unit"), &[]);
        let shown = inv.display();
        assert!(shown.starts_with("show --system "));
        assert_ne!(shown, "show --system my unit");
        assert_eq!(shlex::split(&shown).unwrap(), inv.tokens());
    }
}
