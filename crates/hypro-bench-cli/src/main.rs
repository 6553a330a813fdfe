// crates/hypro-bench-cli/src/main.rs
// ============================================================================
// Module: HyPro Bench CLI Entry Point
// Description: Command dispatcher for benchmark runs and config utilities.
// Purpose: Provide a localized CLI that drives the HyPro instance suite.
// Dependencies: clap, hypro-bench-config, hypro-bench-core, serde_json, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The HyPro Bench CLI loads a suite configuration, applies command-line
//! overrides, and runs every instance through the bounded process runner.
//! Results stream to stdout as they arrive; diagnostics go to stderr. All
//! user-facing diagnostics are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use hypro_bench_cli::console::ConsoleReportSink;
use hypro_bench_cli::console::ReportFormat;
use hypro_bench_cli::i18n::Locale;
use hypro_bench_cli::i18n::set_locale;
use hypro_bench_cli::t;
use hypro_bench_config::AuditConfig;
use hypro_bench_config::BenchConfig;
use hypro_bench_config::config_toml_example;
use hypro_bench_core::BenchAuditSink;
use hypro_bench_core::BoundedRunner;
use hypro_bench_core::DriverError;
use hypro_bench_core::FileAuditSink;
use hypro_bench_core::NoopAuditSink;
use hypro_bench_core::StderrAuditSink;
use hypro_bench_core::SuiteReport;
use hypro_bench_core::run_suite;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "HYPRO_BENCH_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "hypro-bench", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `HYPRO_BENCH_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every instance of the configured suite.
    Run(RunCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for a benchmark run.
#[derive(Args, Debug)]
struct RunCommand {
    /// Path to the suite configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Per-instance timeout in seconds (overrides `run.timeout_secs`).
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
    /// Formula path shared by the suite (overrides `run.formula`).
    #[arg(long, value_name = "PATH")]
    formula: Option<String>,
    /// Verification tool binary (overrides `tool.binary`).
    #[arg(long, value_name = "PATH")]
    tool: Option<String>,
    /// Primary report format.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
    /// Also write the JSON report to this file.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Append JSON-lines audit events to this file.
    #[arg(long, value_name = "PATH")]
    audit_log: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a suite configuration file.
    Validate(ConfigValidateCommand),
    /// Print the canonical example configuration.
    Example,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Path to the suite configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

/// Supported report formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum FormatArg {
    /// Streamed text lines.
    Text,
    /// One JSON document after the run.
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(&command).await,
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(&help).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let mut config = BenchConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    apply_overrides(&mut config, command)?;
    let plan = config.to_plan();
    let audit = open_audit_sink(command.audit_log.as_deref(), &config.audit)?;

    let format = ReportFormat::from(command.format);
    let mut sink = ConsoleReportSink::new(std::io::stdout(), std::io::stderr(), format);
    let report = run_suite(&plan, &BoundedRunner, &mut sink, audit.as_ref())
        .await
        .map_err(|err| CliError::new(driver_error_message(&err)))?;

    if format == ReportFormat::Json {
        let json = render_report_json(&report)?;
        write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    if let Some(path) = &command.report {
        write_report_file(path, &report)?;
    }

    let violations = report.protocol_violations();
    if violations > 0 {
        return Err(CliError::new(t!("run.protocol_violations", count = violations)));
    }
    Ok(ExitCode::SUCCESS)
}

/// Applies command-line overrides and revalidates the result.
fn apply_overrides(config: &mut BenchConfig, command: &RunCommand) -> CliResult<()> {
    if let Some(timeout_secs) = command.timeout_secs {
        config.run.timeout_secs = timeout_secs;
    }
    if let Some(formula) = &command.formula {
        config.run.formula.clone_from(formula);
    }
    if let Some(tool) = &command.tool {
        config.tool.binary.clone_from(tool);
    }
    config.validate().map_err(|err| CliError::new(t!("run.override_invalid", error = err)))
}

/// Selects the audit sink: `--audit-log` wins, then the `[audit]` block.
fn open_audit_sink(
    flag: Option<&Path>,
    audit: &AuditConfig,
) -> CliResult<Box<dyn BenchAuditSink>> {
    let path = match flag {
        Some(path) => Some(path.to_path_buf()),
        None if audit.enabled => audit.path.as_ref().map(PathBuf::from),
        None => return Ok(Box::new(NoopAuditSink)),
    };
    match path {
        Some(path) => {
            let sink = FileAuditSink::new(&path).map_err(|err| {
                CliError::new(t!("run.audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(StderrAuditSink)),
    }
}

/// Formats a driver failure for the user.
fn driver_error_message(error: &DriverError) -> String {
    match error {
        DriverError::Launch {
            program,
            system,
            source,
        } => t!("run.launch_failed", program = program, system = system, error = source),
        DriverError::Runner {
            ..
        } => t!("run.failed", error = error),
        DriverError::Report(err) => output_error("stdout", err),
    }
}

/// Serializes the suite report as pretty JSON.
fn render_report_json(report: &SuiteReport) -> CliResult<String> {
    serde_json::to_string_pretty(report)
        .map_err(|err| CliError::new(t!("run.report.serialize_failed", error = err)))
}

/// Writes the JSON report to `path`.
fn write_report_file(path: &Path, report: &SuiteReport) -> CliResult<()> {
    let mut json = render_report_json(report)?;
    json.push('\n');
    fs::write(path, json).map_err(|err| {
        CliError::new(t!("run.report.write_failed", path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = BenchConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let plan = config.to_plan();
    write_stdout_line(&t!(
        "config.validate.ok",
        groups = plan.suite.groups.len(),
        instances = plan.suite.instance_count()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the canonical example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Locale Helpers
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
