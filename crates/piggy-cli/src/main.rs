// crates/piggy-cli/src/main.rs
// ============================================================================
// Module: Piggy Explorer CLI Entry Point
// Description: Command dispatcher for serving and querying a finance export.
// Purpose: Acquire the session, then hand it to the MCP server or the gate.
// Dependencies: clap, piggy-config, piggy-mcp, piggy-store-sqlite, tokio.
// ============================================================================

//! ## Overview
//! `piggy-explorer serve` stages an optional backup, opens the export,
//! provisions the bootstrap view, and serves MCP until the transport stops.
//! Any startup failure is printed to stderr and exits with status 1.
//! `query` runs one gated statement, and `config validate` checks a config
//! file. All user-facing strings go through the [`piggy_cli::t`] catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use piggy_cli::t;
use piggy_config::ConfigOverrides;
use piggy_config::PiggyConfig;
use piggy_mcp::McpServer;
use piggy_store_sqlite::QueryGate;
use piggy_store_sqlite::SqliteSession;
use piggy_store_sqlite::stage_latest_backup;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "piggy-explorer", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the export and start the MCP server.
    Serve(ServeCommand),
    /// Run one gated query against the export and print the payload.
    Query(QueryCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments locating the export and its bootstrap script.
#[derive(Args, Debug)]
struct DatabaseArgs {
    /// Optional config file path (defaults to piggy-explorer.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Path to the `SQLite` export (defaults to ./piggy.sqlite).
    #[arg(long, value_name = "PATH")]
    db_path: Option<PathBuf>,
    /// Path to the bootstrap view script (defaults to ./sqls/expenses.view.sql).
    #[arg(long, value_name = "PATH")]
    view_script: Option<PathBuf>,
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Export location arguments.
    #[command(flatten)]
    database: DatabaseArgs,
    /// Directory to search for the newest backup export; it is copied onto
    /// the database path before opening.
    #[arg(long, value_name = "DIR")]
    backup_dir: Option<PathBuf>,
}

/// Configuration for the `query` command.
#[derive(Args, Debug)]
struct QueryCommand {
    /// Export location arguments.
    #[command(flatten)]
    database: DatabaseArgs,
    /// SQL text to classify and run.
    #[arg(value_name = "SQL")]
    sql: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Piggy Explorer configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to piggy-explorer.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
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
        Commands::Serve(command) => command_serve(command).await,
        Commands::Query(command) => command_query(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.database, command.backup_dir)?;
    if let Some(backup) = &config.database.backup {
        let staged = stage_latest_backup(backup, &config.database.path)
            .map_err(|err| CliError::new(err.to_string()))?;
        write_stderr_line(&t!(
            "serve.backup.staged",
            backup = staged.display(),
            path = config.database.path.display()
        ))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    let session = SqliteSession::acquire(config.session_config())
        .map_err(|err| CliError::new(err.to_string()))?;
    write_stderr_line(&t!("serve.view.created", view = capitalize(&config.database.view_name)))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let server = McpServer::new(config, Arc::new(session))
        .map_err(|err| CliError::new(t!("serve.failed", error = err)))?;
    server.serve().await.map_err(|err| CliError::new(t!("serve.failed", error = err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Query Command
// ============================================================================

/// Executes the `query` command.
fn command_query(command: &QueryCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.database, None)?;
    let session = SqliteSession::acquire(config.session_config())
        .map_err(|err| CliError::new(err.to_string()))?;
    let gate = QueryGate::new(Arc::new(session));
    let payload = gate.execute(&command.sql);
    gate.session()
        .release()
        .map_err(|err| CliError::new(t!("query.release_failed", error = err)))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = PiggyConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration and applies command-line overrides.
fn load_config(database: &DatabaseArgs, backup_dir: Option<PathBuf>) -> CliResult<PiggyConfig> {
    let mut config = PiggyConfig::load(database.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    config
        .apply_overrides(ConfigOverrides {
            db_path: database.db_path.clone(),
            view_script: database.view_script.clone(),
            backup_dir,
        })
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    Ok(config)
}

/// Upper-cases the first character of a view name for display.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    t!("output.write_failed", stream = stream, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&t!("main.error", error = message));
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::missing_docs_in_private_items,
        reason = "Test-only helpers and cases."
    )]

    use clap::CommandFactory;

    use super::Cli;
    use super::capitalize;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn capitalize_view_names() {
        assert_eq!(capitalize("expenses"), "Expenses");
        assert_eq!(capitalize(""), "");
    }
}
