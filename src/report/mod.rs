//! Run summaries and relay text handling
//!
//! Architecture: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - RunReport (domain) is converted to human or JSON summaries
//! - Summaries never touch stdout; the relay contract owns that stream
//! - Escape interpretation for the linter relay lives here as a presentation rule

use crate::domain::outcome::{GateError, GateResult, RunReport};

/// Supported output formats for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable per-stage table
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

/// Formats run reports for the summary view
#[derive(Debug, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    /// Create a new report formatter
    pub fn new() -> Self {
        Self
    }

    /// Format a run report in the specified format
    pub fn format_report(&self, report: &RunReport, format: OutputFormat) -> GateResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => self.format_json(report),
        }
    }

    fn format_human(&self, report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str("Gate summary:\n");

        for stage in &report.stages {
            let status = if !stage.ran {
                "skipped".to_string()
            } else {
                match stage.exit_code {
                    Some(code) => format!("exit {code}"),
                    None => "killed".to_string(),
                }
            };

            output.push_str(&format!(
                "  {:<9} {:<10} {:<8} {} bytes relayed ({}ms)\n",
                stage.stage.as_str(),
                stage.tool,
                status,
                stage.relayed_bytes,
                stage.duration_ms
            ));
        }

        let verdict = if report.passed() {
            "passed".to_string()
        } else {
            format!("failed (exit {})", report.exit_code)
        };

        output.push_str(&format!("  gate {verdict}\n"));
        output
    }

    fn format_json(&self, report: &RunReport) -> GateResult<String> {
        let json_report = serde_json::json!({
            "exit_code": report.exit_code,
            "passed": report.passed(),
            "started_at": report.started_at.to_rfc3339(),
            "stages": report.stages,
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| GateError::config(format!("JSON serialization failed: {e}")))
    }
}

/// Interpret backslash escape sequences in captured linter output, the way
/// `echo -e` renders them. Unknown sequences pass through untouched.
pub fn interpret_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{000C}'),
            Some('v') => result.push('\u{000B}'),
            Some('a') => result.push('\u{0007}'),
            Some('b') => result.push('\u{0008}'),
            Some('e') => result.push('\u{001B}'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::{StageId, StageOutcome};
    use rstest::rstest;

    fn sample_report() -> RunReport {
        let mut report = RunReport::new();
        report.add_stage(StageOutcome::ran(StageId::Style, "pep8", Some(0), 0, 210));
        report.add_stage(StageOutcome::ran(StageId::Lint, "pylint", Some(4), 118, 950));
        report.add_stage(StageOutcome::skipped(StageId::Docstyle, "pep257"));
        report
    }

    #[test]
    fn test_human_summary() {
        let formatter = ReportFormatter::new();
        let output = formatter.format_report(&sample_report(), OutputFormat::Human).unwrap();

        assert!(output.contains("Gate summary:"));
        assert!(output.contains("style"));
        assert!(output.contains("pylint"));
        assert!(output.contains("skipped"));
        assert!(output.contains("gate passed"));
    }

    #[test]
    fn test_human_summary_failed_gate() {
        let mut report = RunReport::new();
        report.add_stage(StageOutcome::ran(StageId::Style, "pep8", Some(1), 0, 180));
        report.exit_code = 1;

        let formatter = ReportFormatter::new();
        let output = formatter.format_report(&report, OutputFormat::Human).unwrap();

        assert!(output.contains("exit 1"));
        assert!(output.contains("gate failed (exit 1)"));
    }

    #[test]
    fn test_json_summary() {
        let formatter = ReportFormatter::new();
        let output = formatter.format_report(&sample_report(), OutputFormat::Json).unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["exit_code"], 0);
        assert_eq!(json["passed"], true);
        assert_eq!(json["stages"].as_array().unwrap().len(), 3);
        assert_eq!(json["stages"][1]["tool"], "pylint");
        assert_eq!(json["stages"][2]["ran"], false);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("sarif"), None);
    }

    #[rstest]
    #[case("a\\nb\\tc", "a\nb\tc")]
    #[case("back\\\\slash", "back\\slash")]
    #[case("cr\\rlf", "cr\rlf")]
    #[case("plain text", "plain text")]
    #[case("", "")]
    fn test_interpret_escapes_common_sequences(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(interpret_escapes(input), expected);
    }

    #[rstest]
    #[case("\\q", "\\q")]
    #[case("trailing\\", "trailing\\")]
    fn test_interpret_escapes_unknown_passthrough(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(interpret_escapes(input), expected);
    }
}
