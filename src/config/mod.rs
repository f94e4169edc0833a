//! Configuration loading and management for the lint gate
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain values
//! - Default tool names and directory layout are embedded here, not in the CLI
//! - Validation happens at load time so the orchestrator can assume a sane config

use crate::domain::outcome::{GateError, GateResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for the lint gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Directory layout relative to the base path
    #[serde(default)]
    pub layout: LayoutConfig,
    /// External tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Source discovery for the docstring stage
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Directory layout the checks run against, relative to the base path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Package source tree checked by all three stages
    #[serde(default = "default_package_dir")]
    pub package_dir: String,
    /// Test tree checked by the style stage only
    #[serde(default = "default_tests_dir")]
    pub tests_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { package_dir: default_package_dir(), tests_dir: default_tests_dir() }
    }
}

/// Configuration for the three external tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Style checker (fatal stage)
    #[serde(default = "ToolConfig::style")]
    pub style: ToolConfig,
    /// Secondary linter (informational stage)
    #[serde(default)]
    pub lint: LintToolConfig,
    /// Docstring convention checker (informational stage)
    #[serde(default = "ToolConfig::docstyle")]
    pub docstyle: ToolConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            style: ToolConfig::style(),
            lint: LintToolConfig::default(),
            docstyle: ToolConfig::docstyle(),
        }
    }
}

/// A plain external tool invoked by program name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Program name or path looked up via PATH
    pub program: String,
}

impl ToolConfig {
    fn style() -> Self {
        Self { program: "pep8".to_string() }
    }

    fn docstyle() -> Self {
        Self { program: "pep257".to_string() }
    }
}

/// The secondary linter takes an explicit rule-configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintToolConfig {
    /// Program name or path looked up via PATH
    #[serde(default = "default_lint_program")]
    pub program: String,
    /// Rule-configuration file, resolved relative to the base path
    #[serde(default = "default_rcfile")]
    pub rcfile: PathBuf,
}

impl Default for LintToolConfig {
    fn default() -> Self {
        Self { program: default_lint_program(), rcfile: default_rcfile() }
    }
}

/// Source discovery settings for the docstring stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Glob pattern matched against file names (not full paths)
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    /// Directory names whose subtrees are excluded from discovery
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { file_pattern: default_file_pattern(), exclude_dirs: default_exclude_dirs() }
    }
}

impl GateConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GateResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            GateError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            GateError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> GateResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GateError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration
    pub fn with_defaults() -> Self {
        Self {
            version: default_version(),
            layout: LayoutConfig::default(),
            tools: ToolsConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> GateResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(GateError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for (name, program) in [
            ("style", &self.tools.style.program),
            ("lint", &self.tools.lint.program),
            ("docstyle", &self.tools.docstyle.program),
        ] {
            if program.trim().is_empty() {
                return Err(GateError::config(format!("Tool '{name}' has an empty program name")));
            }
        }

        if self.layout.package_dir.trim().is_empty() {
            return Err(GateError::config("Package directory must not be empty"));
        }

        glob::Pattern::new(&self.discovery.file_pattern).map_err(|e| {
            GateError::config(format!(
                "Invalid file pattern '{}': {}",
                self.discovery.file_pattern, e
            ))
        })?;

        for dir in &self.discovery.exclude_dirs {
            if dir.is_empty() || dir.contains('/') || dir.contains('\\') {
                return Err(GateError::config(format!(
                    "Exclude entry '{dir}' must be a bare directory name"
                )));
            }
        }

        Ok(())
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> GateResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GateError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_package_dir() -> String {
    "tpaw".to_string()
}

fn default_tests_dir() -> String {
    "tests".to_string()
}

fn default_lint_program() -> String {
    "pylint".to_string()
}

fn default_rcfile() -> PathBuf {
    PathBuf::from(".pylintrc")
}

fn default_file_pattern() -> String {
    "[A-Za-z_]*.py".to_string()
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["tests".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tools.style.program, "pep8");
        assert_eq!(config.tools.lint.program, "pylint");
        assert_eq!(config.tools.docstyle.program, "pep257");
        assert_eq!(config.discovery.file_pattern, "[A-Za-z_]*.py");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = GateConfig::load_from_str(
            "version: \"1.0\"\nlayout:\n  package_dir: mylib\n",
        )
        .unwrap();

        assert_eq!(config.layout.package_dir, "mylib");
        assert_eq!(config.layout.tests_dir, "tests");
        assert_eq!(config.tools.lint.rcfile, PathBuf::from(".pylintrc"));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = GateConfig::load_from_str("version: \"2.0\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_program_rejected() {
        let result = GateConfig::load_from_str(
            "version: \"1.0\"\ntools:\n  style:\n    program: \"\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_file_pattern_rejected() {
        let result = GateConfig::load_from_str(
            "version: \"1.0\"\ndiscovery:\n  file_pattern: \"[invalid\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_exclude_dirs_must_be_bare_names() {
        let result = GateConfig::load_from_str(
            "version: \"1.0\"\ndiscovery:\n  exclude_dirs: [\"a/b\"]\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = GateConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let rehydrated = GateConfig::load_from_str(&yaml).unwrap();

        assert_eq!(rehydrated.version, config.version);
        assert_eq!(rehydrated.layout.package_dir, config.layout.package_dir);
        assert_eq!(rehydrated.tools.lint.rcfile, config.tools.lint.rcfile);
    }
}
