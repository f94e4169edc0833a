//! The fixed three-stage check sequence
//!
//! Architecture: Domain Services - the orchestrator coordinates checkers, discovery, and relay
//! - Stage order and pass/fail semantics live here and nowhere else
//! - All relay text goes through an injected writer so tests capture it
//! - Checkers are trait objects so the sequence is testable without subprocesses

use crate::checker::{Checker, CommandChecker, StreamMode};
use crate::config::GateConfig;
use crate::discovery;
use crate::domain::outcome::{GateResult, RunReport, StageId, StageOutcome};
use crate::report::interpret_escapes;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Header line printed before relayed linter output
const LINT_HEADER: &str = "--pylint--";

/// Runs the three checks in order against a base path
pub struct Orchestrator {
    config: GateConfig,
    style: Box<dyn Checker>,
    lint: Box<dyn Checker>,
    docstyle: Box<dyn Checker>,
}

impl Orchestrator {
    /// Create an orchestrator whose checkers spawn the configured programs
    pub fn new(config: GateConfig) -> GateResult<Self> {
        config.validate()?;

        // Style output stays live on the parent's streams; only its exit
        // code is inspected. The linter's stderr is noise and is dropped.
        let style: Box<dyn Checker> =
            Box::new(CommandChecker::new(&config.tools.style.program, StreamMode::Inherit));
        let lint: Box<dyn Checker> =
            Box::new(CommandChecker::new(&config.tools.lint.program, StreamMode::CaptureStdout));
        let docstyle: Box<dyn Checker> = Box::new(CommandChecker::new(
            &config.tools.docstyle.program,
            StreamMode::CaptureMerged,
        ));

        Ok(Self { config, style, lint, docstyle })
    }

    /// Create an orchestrator with injected checkers (used by tests)
    pub fn with_checkers(
        config: GateConfig,
        style: Box<dyn Checker>,
        lint: Box<dyn Checker>,
        docstyle: Box<dyn Checker>,
    ) -> Self {
        Self { config, style, lint, docstyle }
    }

    /// Run the gate against `base`, writing all relay text to `out`
    ///
    /// A nonzero style exit stops the run and becomes the report's exit code.
    /// The linter and docstring stages relay output but never affect it.
    pub fn run<W: Write>(&self, base: &Path, out: &mut W) -> GateResult<RunReport> {
        let mut report = RunReport::new();

        let package_dir = base.join(&self.config.layout.package_dir);
        let tests_dir = base.join(&self.config.layout.tests_dir);

        // Stage A: style check over package and test trees. Hard gate.
        let start = Instant::now();
        let style_output = self
            .style
            .run(&[package_dir.clone().into_os_string(), tests_dir.into_os_string()])?;

        report.add_stage(StageOutcome::ran(
            StageId::Style,
            self.style.name(),
            style_output.code,
            0,
            start.elapsed().as_millis() as u64,
        ));

        if !style_output.is_clean() {
            writeln!(
                out,
                "Exiting due to {} errors. Fix and re-run to finish tests.",
                self.style.name()
            )?;

            report.exit_code = style_output.exit_code();
            report.add_stage(StageOutcome::skipped(StageId::Lint, self.lint.name()));
            report.add_stage(StageOutcome::skipped(StageId::Docstyle, self.docstyle.name()));
            return Ok(report);
        }

        self.run_lint_stage(base, &package_dir, out, &mut report)?;
        self.run_docstyle_stage(&package_dir, out, &mut report)?;

        Ok(report)
    }

    /// Stage B: secondary linter with an explicit rcfile. Exit code ignored.
    fn run_lint_stage<W: Write>(
        &self,
        base: &Path,
        package_dir: &Path,
        out: &mut W,
        report: &mut RunReport,
    ) -> GateResult<()> {
        let rcfile = base.join(&self.config.tools.lint.rcfile);
        let rcfile_arg = OsString::from(format!("--rcfile={}", rcfile.display()));

        let start = Instant::now();
        match self.lint.run(&[rcfile_arg, package_dir.to_path_buf().into_os_string()]) {
            Ok(output) => {
                let mut relayed = 0;

                if !output.stdout.is_empty() {
                    let text = interpret_escapes(&output.stdout);
                    writeln!(out, "{LINT_HEADER}")?;
                    write!(out, "{text}")?;
                    relayed = LINT_HEADER.len() + 1 + text.len();
                }

                report.add_stage(StageOutcome::ran(
                    StageId::Lint,
                    self.lint.name(),
                    output.code,
                    relayed,
                    start.elapsed().as_millis() as u64,
                ));
            }
            Err(e) => {
                // Informational stage: a tool that cannot start is surfaced
                // in the log, never in the exit code.
                tracing::warn!(tool = self.lint.name(), "lint stage did not run: {e}");
                report.add_stage(StageOutcome::skipped(StageId::Lint, self.lint.name()));
            }
        }

        Ok(())
    }

    /// Stage C: docstring checker over the enumerated source files, merged
    /// output relayed verbatim. Exit code ignored.
    fn run_docstyle_stage<W: Write>(
        &self,
        package_dir: &Path,
        out: &mut W,
        report: &mut RunReport,
    ) -> GateResult<()> {
        let files = discovery::collect_checked_files(
            package_dir,
            &self.config.discovery.file_pattern,
            &self.config.discovery.exclude_dirs,
        )?;

        if files.is_empty() {
            tracing::debug!("no files matched the docstring stage; skipping");
            report.add_stage(StageOutcome::skipped(StageId::Docstyle, self.docstyle.name()));
            return Ok(());
        }

        let args: Vec<OsString> = files.into_iter().map(|f| f.into_os_string()).collect();

        let start = Instant::now();
        match self.docstyle.run(&args) {
            Ok(output) => {
                write!(out, "{}", output.stdout)?;
                write!(out, "{}", output.stderr)?;

                report.add_stage(StageOutcome::ran(
                    StageId::Docstyle,
                    self.docstyle.name(),
                    output.code,
                    output.stdout.len() + output.stderr.len(),
                    start.elapsed().as_millis() as u64,
                ));
            }
            Err(e) => {
                tracing::warn!(tool = self.docstyle.name(), "docstyle stage did not run: {e}");
                report.add_stage(StageOutcome::skipped(StageId::Docstyle, self.docstyle.name()));
            }
        }

        Ok(())
    }
}
