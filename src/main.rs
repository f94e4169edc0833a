//! Lintgate CLI - Command-line interface for the sequential lint gate
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to gate operations
//! - Handles external concerns like process exit codes and terminal output
//! - Provides clean separation between user interface and the check sequence

use clap::{Parser, Subcommand, ValueEnum};
use lintgate::{
    ci, GateConfig, GateResult, Orchestrator, OutputFormat, ReportFormatter,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

/// Lintgate - sequential lint gate for a Python source tree
#[derive(Parser)]
#[command(name = "lintgate")]
#[command(version = "0.1.0")]
#[command(about = "Sequential lint gate orchestrating Python static-analysis tools")]
#[command(
    long_about = "Lintgate runs a style checker, a secondary linter, and a docstring-convention checker over a project tree in a fixed order. The style stage is a hard gate; the other two relay their reports without affecting the exit code. Designed for commit hooks and CI integration."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the three-stage gate against a base path
    Run {
        /// Base path the directory layout is resolved against
        root: Option<PathBuf>,

        /// Override the package source directory
        #[arg(long)]
        package_dir: Option<String>,

        /// Override the test directory
        #[arg(long)]
        tests_dir: Option<String>,

        /// Override the linter rule-configuration file
        #[arg(long)]
        rcfile: Option<PathBuf>,

        /// Print a per-stage summary to stderr after the run
        #[arg(long)]
        summary: bool,

        /// Summary output format
        #[arg(long, value_enum, default_value = "human")]
        summary_format: SummaryFormatArg,
    },

    /// Run the gate as a pre-commit check (nonzero exit on gate failure)
    PreCommit {
        /// Base path the directory layout is resolved against
        root: Option<PathBuf>,
    },

    /// Validate a configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Show the resolved tool command lines
    Tools,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum SummaryFormatArg {
    Human,
    Json,
}

impl From<SummaryFormatArg> for OutputFormat {
    fn from(arg: SummaryFormatArg) -> Self {
        match arg {
            SummaryFormatArg::Human => OutputFormat::Human,
            SummaryFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> GateResult<i32> {
    match cli.command {
        Commands::Run { root, package_dir, tests_dir, rcfile, summary, summary_format } => {
            run_gate_command(
                cli.config,
                root,
                package_dir,
                tests_dir,
                rcfile,
                summary,
                summary_format,
            )
        }
        Commands::PreCommit { root } => run_pre_commit(cli.config, root),
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Tools => run_show_tools(cli.config),
    }
}

/// Load the configuration, probing the default file names when no explicit
/// path was given
fn load_config(config_path: Option<PathBuf>) -> GateResult<GateConfig> {
    if let Some(config_path) = config_path {
        return GateConfig::load_from_file(config_path);
    }

    let default_configs = ["lintgate.yaml", "lintgate.yml", ".lintgate.yaml"];

    for config_name in &default_configs {
        if Path::new(config_name).exists() {
            return GateConfig::load_from_file(config_name);
        }
    }

    Ok(GateConfig::default())
}

#[allow(clippy::too_many_arguments)]
fn run_gate_command(
    config_path: Option<PathBuf>,
    root: Option<PathBuf>,
    package_dir: Option<String>,
    tests_dir: Option<String>,
    rcfile: Option<PathBuf>,
    summary: bool,
    summary_format: SummaryFormatArg,
) -> GateResult<i32> {
    let mut config = load_config(config_path)?;

    if let Some(package_dir) = package_dir {
        config.layout.package_dir = package_dir;
    }
    if let Some(tests_dir) = tests_dir {
        config.layout.tests_dir = tests_dir;
    }
    if let Some(rcfile) = rcfile {
        config.tools.lint.rcfile = rcfile;
    }

    let root = root.unwrap_or_else(|| PathBuf::from("."));

    let orchestrator = Orchestrator::new(config)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let report = orchestrator.run(&root, &mut handle)?;

    if summary {
        let formatted = ReportFormatter::new().format_report(&report, summary_format.into())?;
        eprintln!("\n{formatted}");
    }

    Ok(report.exit_code)
}

fn run_pre_commit(config_path: Option<PathBuf>, root: Option<PathBuf>) -> GateResult<i32> {
    let config = load_config(config_path)?;
    let root = root.unwrap_or_else(|| PathBuf::from("."));

    match ci::pre_commit_check(config, &root) {
        Ok(()) => Ok(0),
        Err(e) => {
            eprintln!("{e}");
            Ok(1)
        }
    }
}

fn run_validate_config(config_path: Option<PathBuf>) -> GateResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("lintgate.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match GateConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  Package dir: {}", config.layout.package_dir);
            println!("  Tests dir:   {}", config.layout.tests_dir);
            println!(
                "  Tools:       {} / {} / {}",
                config.tools.style.program,
                config.tools.lint.program,
                config.tools.docstyle.program
            );
            println!("  Pattern:     {}", config.discovery.file_pattern);
            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_show_tools(config_path: Option<PathBuf>) -> GateResult<i32> {
    let config = load_config(config_path)?;

    println!(
        "style:    {} <package_dir> <tests_dir>  (fatal)",
        config.tools.style.program
    );
    println!(
        "lint:     {} --rcfile={} <package_dir>  (informational, stdout captured)",
        config.tools.lint.program,
        config.tools.lint.rcfile.display()
    );
    println!(
        "docstyle: {} <files matching {}>  (informational, streams merged)",
        config.tools.docstyle.program, config.discovery.file_pattern
    );

    Ok(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();
}
