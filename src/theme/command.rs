//! Theme applier that runs an external command.
//!
//! The command is configured as an argument list. `{ui}`, `{syntax}` and
//! `{period}` are replaced in every argument before it runs. No shell is
//! involved, so theme names never need quoting. A command that outlives the
//! configured `request_timeout` is killed and the apply fails.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

use super::{ThemeApplier, ThemePair};
use crate::common::constants::DEFAULT_REQUEST_TIMEOUT;
use crate::core::Period;

pub struct CommandApplier {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandApplier {
    pub fn new(command: Vec<String>) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = match parts.next() {
            Some(program) if !program.trim().is_empty() => program,
            _ => bail!("The command applier needs a non-empty `command` list"),
        };
        Ok(Self {
            program,
            args: parts.collect(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
        })
    }

    /// How long the command may run before it is killed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The arguments after placeholder substitution.
    pub fn render_args(&self, period: Period, pair: &ThemePair) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| substitute(arg, period, pair))
            .collect()
    }
}

fn substitute(template: &str, period: Period, pair: &ThemePair) -> String {
    template
        .replace("{ui}", &pair.ui)
        .replace("{syntax}", &pair.syntax)
        .replace("{period}", period.as_str())
}

impl ThemeApplier for CommandApplier {
    fn apply(&mut self, period: Period, pair: &ThemePair) -> Result<()> {
        let program = substitute(&self.program, period, pair);
        let mut child = Command::new(&program)
            .args(self.render_args(period, pair))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to run '{program}'"))?;

        let Some(status) = child
            .wait_timeout(self.timeout)
            .with_context(|| format!("Failed to wait for '{program}'"))?
        else {
            // Reap the killed child so it does not linger as a zombie
            let _ = child.kill();
            let _ = child.wait();
            bail!("'{program}' timed out after {:?}", self.timeout);
        };

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            let stderr = stderr.trim();
            if stderr.is_empty() {
                bail!("'{program}' exited with {status}");
            }
            bail!("'{program}' exited with {status}: {stderr}");
        }
        Ok(())
    }

    fn applier_name(&self) -> &'static str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_placeholder_substitution() {
        let applier =
            CommandApplier::new(args(&["editor-ctl", "--theme={ui},{syntax}", "{period}"]))
                .unwrap();
        let rendered = applier.render_args(Period::Night, &ThemePair::new("dark-ui", "dark-syn"));
        assert_eq!(rendered, args(&["--theme=dark-ui,dark-syn", "night"]));
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandApplier::new(Vec::new()).is_err());
        assert!(CommandApplier::new(args(&["  "])).is_err());
    }

    #[test]
    fn test_successful_command() {
        let mut applier = CommandApplier::new(args(&["true"])).unwrap();
        assert!(applier.apply(Period::Day, &ThemePair::new("a", "b")).is_ok());
    }

    #[test]
    fn test_failing_command_reports_status() {
        let mut applier = CommandApplier::new(args(&["false"])).unwrap();
        let error = applier
            .apply(Period::Day, &ThemePair::new("a", "b"))
            .unwrap_err();
        assert!(error.to_string().contains("'false' exited with"));
    }

    #[test]
    fn test_missing_program() {
        let mut applier =
            CommandApplier::new(args(&["/nonexistent/themeflux-test-binary"])).unwrap();
        assert!(applier.apply(Period::Day, &ThemePair::new("a", "b")).is_err());
    }

    #[test]
    fn test_command_writes_theme_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let mut applier = CommandApplier::new(args(&[
            "sh",
            "-c",
            &format!("printf '%s %s %s' \"$0\" \"$1\" \"$2\" > {}", out.display()),
            "{period}",
            "{ui}",
            "{syntax}",
        ]))
        .unwrap();

        applier
            .apply(Period::Night, &ThemePair::new("dark-ui", "dark-syntax"))
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "night dark-ui dark-syntax"
        );
    }

    #[test]
    fn test_failing_command_includes_stderr() {
        let mut applier =
            CommandApplier::new(args(&["sh", "-c", "echo 'unknown theme' >&2; exit 3"])).unwrap();
        let error = applier
            .apply(Period::Day, &ThemePair::new("a", "b"))
            .unwrap_err();
        assert!(error.to_string().contains("unknown theme"));
    }

    #[test]
    fn test_hanging_command_is_killed() {
        let mut applier = CommandApplier::new(args(&["sleep", "5"]))
            .unwrap()
            .with_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let error = applier
            .apply(Period::Day, &ThemePair::new("a", "b"))
            .unwrap_err();
        assert!(error.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
