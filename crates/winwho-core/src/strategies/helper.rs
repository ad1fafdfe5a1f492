//! Compositor helper strategy (hyprctl-style introspection tools).
//!
//! For compositors without a queryable socket protocol but with a bundled
//! introspection command, runs the configured helper (default
//! `hyprctl activewindow -j`) under a deadline and pulls the pid field out
//! of its JSON output.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::WinwhoConfig;
use crate::environment::WindowingEnvironment;
use crate::process::Pid;
use crate::strategies::{FocusStrategy, StrategyError};

/// Poll interval while waiting for the helper to exit.
const WAIT_POLL: Duration = Duration::from_millis(10);

pub struct HelperStrategy {
    command: String,
    args: Vec<String>,
    pid_field: String,
    timeout: Duration,
}

impl HelperStrategy {
    pub fn new(config: &WinwhoConfig) -> Self {
        Self {
            command: config.helper.command.clone(),
            args: config.helper.args.clone(),
            pid_field: config.helper.pid_field.clone(),
            timeout: Duration::from_millis(config.resolver.strategy_timeout_ms),
        }
    }

    fn tool_error(&self, message: String) -> StrategyError {
        StrategyError::ExternalTool {
            command: self.command.clone(),
            message,
        }
    }

    /// Run the helper, killing it if the deadline passes first.
    ///
    /// Returns the collected output and whether the run was cut short.
    fn run_bounded(&self) -> Result<(std::process::Output, bool), StrategyError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.tool_error(format!("failed to spawn: {}", e)))?;

        let deadline = Instant::now() + self.timeout;
        let timed_out = loop {
            match child.try_wait() {
                Ok(Some(_)) => break false,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        break true;
                    }
                    std::thread::sleep(WAIT_POLL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(self.tool_error(format!("failed to wait: {}", e)));
                }
            }
        };

        let output = child
            .wait_with_output()
            .map_err(|e| self.tool_error(format!("failed to collect output: {}", e)))?;

        Ok((output, timed_out))
    }

    fn parse_pid(&self, stdout: &str) -> Result<Option<Pid>, StrategyError> {
        let value: serde_json::Value = serde_json::from_str(stdout)
            .map_err(|e| self.tool_error(format!("unparsable output: {}", e)))?;

        // A missing or non-positive pid field means no focused window (the
        // tool answered, there just is nothing to report).
        Ok(value
            .get(&self.pid_field)
            .and_then(|v| v.as_i64())
            .and_then(Pid::from_external))
    }
}

impl FocusStrategy for HelperStrategy {
    fn name(&self) -> &'static str {
        "helper"
    }

    fn supports(&self, env: WindowingEnvironment) -> bool {
        matches!(
            env,
            WindowingEnvironment::CompositorHelper | WindowingEnvironment::Unknown
        )
    }

    fn try_resolve_pid(&mut self) -> Result<Option<Pid>, StrategyError> {
        // Tool not installed: this compositor simply isn't present.
        if which::which(&self.command).is_err() {
            debug!(
                event = "core.strategy.helper.command_absent",
                command = %self.command
            );
            return Ok(None);
        }

        let (output, timed_out) = self.run_bounded()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();

        if timed_out {
            // Killed at the deadline. Nothing written means no response at
            // all; partial output means the run broke mid-answer.
            return if stdout.is_empty() {
                debug!(event = "core.strategy.helper.timed_out_silent");
                Ok(None)
            } else {
                Err(self.tool_error("timed out mid-output".to_string()))
            };
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                event = "core.strategy.helper.nonzero_exit",
                command = %self.command,
                status = %output.status
            );
            return Err(self.tool_error(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // Hyprland prints a bare "Invalid" when no window is focused;
        // treat that sentinel as a normal empty answer, not breakage.
        if stdout.is_empty() || stdout == "Invalid" {
            return Ok(None);
        }

        let pid = self.parse_pid(stdout)?;
        if let Some(pid) = pid {
            debug!(event = "core.strategy.helper.resolved", pid = pid.as_u32());
        }
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy_for(command: &str, args: &[&str]) -> HelperStrategy {
        let mut config = WinwhoConfig::default();
        config.helper.command = command.to_string();
        config.helper.args = args.iter().map(|s| s.to_string()).collect();
        HelperStrategy::new(&config)
    }

    #[test]
    fn test_absent_command_is_not_applicable() {
        let mut strategy = strategy_for("winwho-no-such-helper-tool", &[]);
        assert!(strategy.try_resolve_pid().unwrap().is_none());
    }

    #[test]
    fn test_json_output_resolves_pid() {
        let mut strategy = strategy_for("echo", &[r#"{"class":"term","pid":4321}"#]);
        let pid = strategy.try_resolve_pid().unwrap();
        assert_eq!(pid.map(|p| p.as_u32()), Some(4321));
    }

    #[test]
    fn test_missing_pid_field_is_not_applicable() {
        let mut strategy = strategy_for("echo", &[r#"{"class":"term"}"#]);
        assert!(strategy.try_resolve_pid().unwrap().is_none());
    }

    #[test]
    fn test_invalid_sentinel_is_not_applicable() {
        let mut strategy = strategy_for("echo", &["Invalid"]);
        assert!(strategy.try_resolve_pid().unwrap().is_none());
    }

    #[test]
    fn test_unparsable_output_is_external_tool_error() {
        let mut strategy = strategy_for("echo", &["definitely not json"]);
        assert!(matches!(
            strategy.try_resolve_pid(),
            Err(StrategyError::ExternalTool { .. })
        ));
    }

    #[test]
    fn test_nonzero_exit_is_external_tool_error() {
        let mut strategy = strategy_for("false", &[]);
        assert!(matches!(
            strategy.try_resolve_pid(),
            Err(StrategyError::ExternalTool { .. })
        ));
    }

    #[test]
    fn test_silent_timeout_is_not_applicable() {
        let mut config = WinwhoConfig::default();
        config.helper.command = "sleep".to_string();
        config.helper.args = vec!["5".to_string()];
        config.resolver.strategy_timeout_ms = 50;
        let mut strategy = HelperStrategy::new(&config);

        let started = Instant::now();
        assert!(strategy.try_resolve_pid().unwrap().is_none());
        // The deadline must actually bound the run
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_negative_pid_is_not_applicable() {
        // Compositors report "no focused window" as pid -1
        let mut strategy = strategy_for("echo", &[r#"{"pid":-1}"#]);
        assert!(strategy.try_resolve_pid().unwrap().is_none());
    }
}
