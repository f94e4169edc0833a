//! Core domain models for check stages and gate run results
//!
//! Architecture: Rich Domain Models - Outcomes carry behavior, not just data
//! - StageOutcome classifies itself as fatal or informational
//! - RunReport acts as an aggregate root collecting per-stage outcomes
//! - The overall exit code is derived here, not scattered through the CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three fixed check stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    /// Style check - the only fatal stage; a nonzero exit stops the run
    Style,
    /// Secondary linter - output relayed under a header, exit code ignored
    Lint,
    /// Docstring convention check - merged output relayed, exit code ignored
    Docstyle,
}

impl StageId {
    /// Whether a nonzero exit from this stage aborts the whole run
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Style)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Lint => "lint",
            Self::Docstyle => "docstyle",
        }
    }
}

/// Captured result of a single external tool invocation
#[derive(Debug, Clone, Default)]
pub struct CheckOutput {
    /// Exit code of the tool, or None if it was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output (empty when the stream was inherited)
    pub stdout: String,
    /// Captured standard error (empty when discarded or inherited)
    pub stderr: String,
}

impl CheckOutput {
    /// Create an output carrying only an exit code
    pub fn with_code(code: Option<i32>) -> Self {
        Self { code, ..Default::default() }
    }

    /// Whether the tool reported a clean run
    pub fn is_clean(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code suitable for process termination; a signal death maps to 1
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// Outcome of one stage within a gate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Which stage this outcome belongs to
    pub stage: StageId,
    /// Program name of the tool that was (or would have been) invoked
    pub tool: String,
    /// Whether the stage actually executed
    pub ran: bool,
    /// Exit code reported by the tool, if it ran and exited normally
    pub exit_code: Option<i32>,
    /// Number of bytes of tool output relayed to the caller's stream
    pub relayed_bytes: usize,
    /// Wall-clock duration of the stage in milliseconds
    pub duration_ms: u64,
}

impl StageOutcome {
    /// Record a stage that executed
    pub fn ran(
        stage: StageId,
        tool: impl Into<String>,
        exit_code: Option<i32>,
        relayed_bytes: usize,
        duration_ms: u64,
    ) -> Self {
        Self { stage, tool: tool.into(), ran: true, exit_code, relayed_bytes, duration_ms }
    }

    /// Record a stage that never executed (gate failure or nothing to check)
    pub fn skipped(stage: StageId, tool: impl Into<String>) -> Self {
        Self {
            stage,
            tool: tool.into(),
            ran: false,
            exit_code: None,
            relayed_bytes: 0,
            duration_ms: 0,
        }
    }

    /// Whether this outcome aborted the run
    pub fn is_gate_failure(&self) -> bool {
        self.stage.is_fatal() && self.ran && self.exit_code != Some(0)
    }
}

/// Complete record of one gate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Final process exit code for this run
    pub exit_code: i32,
    /// Per-stage outcomes in execution order
    pub stages: Vec<StageOutcome>,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl RunReport {
    /// Create a new empty run report
    pub fn new() -> Self {
        Self { exit_code: 0, stages: Vec::new(), started_at: Utc::now() }
    }

    /// Append a stage outcome
    pub fn add_stage(&mut self, outcome: StageOutcome) {
        self.stages.push(outcome);
    }

    /// Whether the gate passed (stage failures in informational stages do not count)
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }

    /// The fatal stage outcome that stopped the run, if any
    pub fn gate_failure(&self) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.is_gate_failure())
    }

    /// Total bytes of tool output relayed across all stages
    pub fn total_relayed_bytes(&self) -> usize {
        self.stages.iter().map(|s| s.relayed_bytes).sum()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur while running the gate
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Stream or filesystem operation failed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// File name pattern failed to compile
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// An external tool could not be started
    #[error("Tool error ({tool}): {message}")]
    Tool { tool: String, message: String },
}

impl GateError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    /// Create a tool error
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool { tool: tool.into(), message: message.into() }
    }
}

/// Result type for gate operations
pub type GateResult<T> = Result<T, GateError>;
