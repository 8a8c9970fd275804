// crates/component-gateway-cli/src/main.rs
// ============================================================================
// Module: Component Gateway CLI Entry Point
// Description: Command dispatcher for serving the gateway and checking config.
// Purpose: Provide the `component-gateway` binary.
// Dependencies: clap, component-gateway-config, component-gateway-mcp, tokio
// ============================================================================

//! ## Overview
//! `component-gateway serve` loads configuration (file, environment, then
//! command-line overrides) and runs the MCP gateway until Ctrl-C.
//! `component-gateway check-config` validates the same configuration and
//! prints a JSON summary including each component's resolved address.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use component_gateway_config::DuplicatePolicy;
use component_gateway_config::GatewayConfig;
use component_gateway_config::ToolNaming;
use component_gateway_mcp::McpServer;
use component_gateway_mcp::resolver::resolver_from_config;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "component-gateway", disable_help_subcommand = true, disable_version_flag = true)]
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
    /// Start the component gateway.
    Serve(ServeCommand),
    /// Validate configuration and print a summary.
    CheckConfig(CheckConfigCommand),
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Config file path (overrides `COMPONENT_GATEWAY_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Listen address (overrides `server.bind`).
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Arguments for `check-config`.
#[derive(Args, Debug)]
struct CheckConfigCommand {
    /// Config file path (overrides `COMPONENT_GATEWAY_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration summary printed by `check-config`.
#[derive(Debug, Serialize)]
struct ConfigSummary {
    /// Listen address.
    bind: String,
    /// Components in directory order.
    components: Vec<ComponentSummary>,
    /// Whether call arguments are validated.
    validate_arguments: bool,
    /// Cross-component duplicate policy.
    duplicate_policy: DuplicatePolicy,
    /// Exposed tool naming.
    tool_naming: ToolNaming,
    /// Listing cache window in milliseconds (0 disables caching).
    listing_cache_ttl_ms: u64,
    /// Whether request audit events are emitted.
    audit_enabled: bool,
}

/// One component in the configuration summary.
#[derive(Debug, Serialize)]
struct ComponentSummary {
    /// Operator-facing identifier.
    identifier: String,
    /// Resolved internal address.
    address: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
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
        write_stdout_line(&format!("component-gateway {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::CheckConfig(command) => command_check_config(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref(), command.bind.as_deref())?;
    let bind = config.server.bind.clone();
    let components = config.components.names.len();
    let server = McpServer::from_config(config)
        .map_err(|err| CliError::new(format!("gateway init failed: {err}")))?;
    write_stderr_line(&format!(
        "component-gateway listening on {bind} with {components} component(s)"
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("gateway failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `check-config` command.
fn command_check_config(command: &CheckConfigCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref(), None)?;
    let summary = build_summary(&config);
    let rendered = serde_json::to_string_pretty(&summary)
        .map_err(|err| CliError::new(format!("summary serialization failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Helpers
// ============================================================================

/// Loads configuration and applies command-line overrides.
fn load_config(path: Option<&Path>, bind: Option<&str>) -> CliResult<GatewayConfig> {
    let mut config = GatewayConfig::load(path)
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    apply_bind_override(&mut config, bind)?;
    Ok(config)
}

/// Replaces the listen address and revalidates.
fn apply_bind_override(config: &mut GatewayConfig, bind: Option<&str>) -> CliResult<()> {
    let Some(bind) = bind else {
        return Ok(());
    };
    config.server.bind = bind.trim().to_string();
    config.validate().map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Builds the `check-config` summary.
fn build_summary(config: &GatewayConfig) -> ConfigSummary {
    let resolver = resolver_from_config(&config.components);
    ConfigSummary {
        bind: config.server.bind.clone(),
        components: config
            .components
            .names
            .iter()
            .map(|identifier| ComponentSummary {
                identifier: identifier.clone(),
                address: resolver.resolve(identifier),
            })
            .collect(),
        validate_arguments: config.validation.validate_arguments,
        duplicate_policy: config.discovery.duplicate_policy,
        tool_naming: config.discovery.tool_naming,
        listing_cache_ttl_ms: config.discovery.listing_cache_ttl_ms,
        audit_enabled: config.audit.enabled,
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help();
    write_stdout_line(&help.to_string()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

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

/// Formats an output stream failure.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    format!("failed to write to {stream}: {err}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
