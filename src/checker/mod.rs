//! External tool invocation for the three check stages
//!
//! Architecture: Ports and Adapters - the Checker trait is the port, subprocesses the adapter
//! - The orchestrator depends only on the trait, so tests inject mock checkers
//! - Each stage's stream contract (inherit, capture, merge) is a StreamMode
//!   on the adapter, keeping the orchestrator free of Stdio plumbing

use crate::domain::outcome::{CheckOutput, GateError, GateResult};
use std::ffi::OsString;
use std::process::{Command, Stdio};

/// Stream contract for a tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// Child stdout/stderr flow straight to the parent's streams; only the
    /// exit code comes back (fatal style stage)
    Inherit,
    /// Stdout is captured as text, stderr is discarded (secondary linter)
    CaptureStdout,
    /// Both streams are captured for merged relay (docstring stage)
    CaptureMerged,
}

/// A runnable check backed by some external tool
pub trait Checker {
    /// Program name used in diagnostics and the gate-failure message
    fn name(&self) -> &str;

    /// Invoke the tool with the given arguments and block until it exits
    fn run(&self, args: &[OsString]) -> GateResult<CheckOutput>;
}

/// Checker implementation that spawns an external program
pub struct CommandChecker {
    program: String,
    mode: StreamMode,
}

impl CommandChecker {
    /// Create a checker for the given program with a stream contract
    pub fn new(program: impl Into<String>, mode: StreamMode) -> Self {
        Self { program: program.into(), mode }
    }
}

impl Checker for CommandChecker {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[OsString]) -> GateResult<CheckOutput> {
        let mut command = Command::new(&self.program);
        command.args(args);

        tracing::debug!(program = %self.program, mode = ?self.mode, args = args.len(), "invoking tool");

        match self.mode {
            StreamMode::Inherit => {
                let status = command
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(|e| {
                        GateError::tool(&self.program, format!("failed to start: {e}"))
                    })?;

                Ok(CheckOutput::with_code(status.code()))
            }
            StreamMode::CaptureStdout => {
                let output = command.stderr(Stdio::null()).output().map_err(|e| {
                    GateError::tool(&self.program, format!("failed to start: {e}"))
                })?;

                Ok(CheckOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::new(),
                })
            }
            StreamMode::CaptureMerged => {
                let output = command.output().map_err(|e| {
                    GateError::tool(&self.program, format!("failed to start: {e}"))
                })?;

                Ok(CheckOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_tool_error() {
        let checker =
            CommandChecker::new("lintgate-no-such-tool-xyzzy", StreamMode::CaptureStdout);
        let result = checker.run(&[]);

        match result {
            Err(GateError::Tool { tool, .. }) => {
                assert_eq!(tool, "lintgate-no-such-tool-xyzzy");
            }
            other => panic!("expected tool error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_stdout_discards_stderr() {
        let checker = CommandChecker::new("sh", StreamMode::CaptureStdout);
        let args: Vec<OsString> =
            vec!["-c".into(), "echo visible; echo hidden 1>&2".into()];
        let output = checker.run(&args).unwrap();

        assert!(output.is_clean());
        assert_eq!(output.stdout, "visible\n");
        assert!(output.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_merged_keeps_both_streams() {
        let checker = CommandChecker::new("sh", StreamMode::CaptureMerged);
        let args: Vec<OsString> =
            vec!["-c".into(), "echo out; echo err 1>&2; exit 3".into()];
        let output = checker.run(&args).unwrap();

        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_inherit_reports_exit_code_only() {
        let checker = CommandChecker::new("sh", StreamMode::Inherit);
        let args: Vec<OsString> = vec!["-c".into(), "exit 7".into()];
        let output = checker.run(&args).unwrap();

        assert_eq!(output.code, Some(7));
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }
}
