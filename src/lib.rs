//! Lintgate - sequential lint gate for a Python source tree
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - The orchestrator holds the stage semantics; checkers isolate subprocess concerns
//! - Clean boundaries between the check sequence and external tool invocation
//! - CI and commit-hook workflows drive the gate through this interface
//!
//! The gate runs three static-analysis tools in a fixed order: a style
//! checker over the package and test trees (fatal on any nonzero exit), a
//! secondary linter whose captured report is relayed under a header, and a
//! docstring-convention checker whose merged output is relayed verbatim.
//! Only the style stage can fail the run.

pub mod checker;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod orchestrator;
pub mod report;

// Re-export main types for convenient access
pub use domain::outcome::{
    CheckOutput, GateError, GateResult, RunReport, StageId, StageOutcome,
};

pub use config::{DiscoveryConfig, GateConfig, LayoutConfig, LintToolConfig, ToolConfig, ToolsConfig};

pub use checker::{Checker, CommandChecker, StreamMode};

pub use orchestrator::Orchestrator;

pub use report::{interpret_escapes, OutputFormat, ReportFormatter};

use std::io;
use std::path::Path;

/// Run the gate against a base path with default configuration, relaying
/// tool output to stdout
pub fn run_gate<P: AsRef<Path>>(base: P) -> GateResult<RunReport> {
    run_gate_with_config(GateConfig::default(), base)
}

/// Run the gate against a base path with the given configuration
pub fn run_gate_with_config<P: AsRef<Path>>(config: GateConfig, base: P) -> GateResult<RunReport> {
    let orchestrator = Orchestrator::new(config)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    orchestrator.run(base.as_ref(), &mut handle)
}

/// CI integration utilities
pub mod ci {
    use super::*;
    use std::io::Write;

    /// Pre-commit gate check for hook scripts
    ///
    /// Runs the full gate and returns an error if the fatal stage failed,
    /// so hooks can treat any `Err` as "do not commit".
    pub fn pre_commit_check<P: AsRef<Path>>(config: GateConfig, base: P) -> GateResult<()> {
        let report = run_gate_with_config(config, base)?;

        if let Some(failure) = report.gate_failure() {
            return Err(GateError::tool(
                failure.tool.clone(),
                format!("gate failed with exit code {}", report.exit_code),
            ));
        }

        Ok(())
    }

    /// Run the gate into an arbitrary writer, for pipelines that capture
    /// the relay text instead of printing it
    pub fn gate_to_writer<P: AsRef<Path>, W: Write>(
        config: GateConfig,
        base: P,
        out: &mut W,
    ) -> GateResult<RunReport> {
        let orchestrator = Orchestrator::new(config)?;
        orchestrator.run(base.as_ref(), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    struct StaticChecker {
        name: &'static str,
        output: CheckOutput,
    }

    impl Checker for StaticChecker {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self, _args: &[OsString]) -> GateResult<CheckOutput> {
            Ok(self.output.clone())
        }
    }

    fn boxed(name: &'static str, code: i32, stdout: &str) -> Box<dyn Checker> {
        Box::new(StaticChecker {
            name,
            output: CheckOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        })
    }

    #[test]
    fn test_full_pass_through_facade() {
        let temp_dir = TempDir::new().unwrap();
        let package = temp_dir.path().join("tpaw");
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join("objects.py"), "").unwrap();

        let orchestrator = Orchestrator::with_checkers(
            GateConfig::default(),
            boxed("pep8", 0, ""),
            boxed("pylint", 0, "W001 unused import"),
            boxed("pep257", 0, "D100 missing docstring\n"),
        );

        let mut out = Vec::new();
        let report = orchestrator.run(temp_dir.path(), &mut out).unwrap();

        assert!(report.passed());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--pylint--\nW001 unused importD100 missing docstring\n"
        );
    }

    #[test]
    fn test_gate_to_writer_with_real_programs() {
        // Exercises the subprocess-backed path with shell builtins that are
        // safe to assume on the test host
        #[cfg(unix)]
        {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir_all(temp_dir.path().join("tpaw")).unwrap();

            let mut config = GateConfig::default();
            config.tools.style.program = "true".to_string();
            config.tools.lint.program = "true".to_string();
            config.tools.docstyle.program = "true".to_string();

            let mut out = Vec::new();
            let report = ci::gate_to_writer(config, temp_dir.path(), &mut out).unwrap();

            assert_eq!(report.exit_code, 0);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_gate_to_writer_failing_style() {
        #[cfg(unix)]
        {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir_all(temp_dir.path().join("tpaw")).unwrap();

            let mut config = GateConfig::default();
            config.tools.style.program = "false".to_string();
            config.tools.lint.program = "true".to_string();
            config.tools.docstyle.program = "true".to_string();

            let mut out = Vec::new();
            let report = ci::gate_to_writer(config, temp_dir.path(), &mut out).unwrap();

            assert_eq!(report.exit_code, 1);
            assert_eq!(
                String::from_utf8(out).unwrap(),
                "Exiting due to false errors. Fix and re-run to finish tests.\n"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_pre_commit_check_with_stub_tools() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("tpaw")).unwrap();

        let mut config = GateConfig::default();
        config.tools.style.program = "true".to_string();
        config.tools.lint.program = "true".to_string();
        config.tools.docstyle.program = "true".to_string();

        assert!(ci::pre_commit_check(config.clone(), temp_dir.path()).is_ok());

        config.tools.style.program = "false".to_string();
        assert!(ci::pre_commit_check(config, temp_dir.path()).is_err());
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = GateConfig::default();
        config.version = "9.9".to_string();

        assert!(Orchestrator::new(config).is_err());
    }
}
