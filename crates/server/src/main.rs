//! Template App - Main Application Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{EnvLoader, Environment, ServerConfig};
use std::{path::PathBuf, process::ExitCode};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use types::{ConfigurationError, EnvironmentKind, LogLevel};

mod api;
mod app;
mod log_store;

use app::Application;

#[derive(Debug, Parser)]
#[command(name = "template-app", version, about = "Template App server")]
struct Cli {
    /// Read variables from this file instead of `.env` plus the process environment
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Validate the environment and print the active profile
    ValidateEnv,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Nothing runs before the environment has been validated
    let environment = match load_environment(&cli) {
        Ok(environment) => environment,
        Err(e) => {
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(environment).await,
        Command::ValidateEnv => {
            validate_env(&environment);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn load_environment(cli: &Cli) -> Result<Environment> {
    match &cli.env_file {
        Some(path) => EnvLoader::load_from_file(path),
        None => EnvLoader::load(),
    }
}

/// Print validation failures as the aggregated field list, anything else
/// with its context chain
fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<ConfigurationError>() {
        Some(config_err) => eprintln!("{config_err}"),
        None => eprintln!("Error: {e:#}"),
    }
}

fn validate_env(environment: &Environment) {
    let profile = environment.resolver().active_config();
    println!("Environment: {}", environment.kind());
    println!("App: {} v{}", profile.app.name, profile.app.version);
    println!("URL: {}", profile.app.url);
    println!("API: {}", profile.api.base_url);
    println!("Environment validation passed");
}

async fn serve(environment: Environment) -> Result<()> {
    init_logging(environment.kind(), environment.validated().log_level)?;

    info!("Starting Template App v{}", env!("CARGO_PKG_VERSION"));

    let server_config = ServerConfig::load().context("Failed to load server configuration")?;
    info!(
        host = %server_config.host,
        port = server_config.port,
        "Server configuration loaded"
    );

    let app = Application::new(environment, &server_config)
        .context("Failed to create application")?;

    let shutdown_signal = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
        }
    };

    info!("Application starting...");
    app.run(shutdown_signal).await?;

    info!("Template App shutdown complete");
    Ok(())
}

/// Initialize tracing: pretty output in development, JSON otherwise.
/// `RUST_LOG` overrides the validated `LOG_LEVEL`.
fn init_logging(kind: EnvironmentKind, level: LogLevel) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);

    if kind.is_development() {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("Failed to initialize pretty logging")?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("Failed to initialize JSON logging")?;
    }

    info!(environment = %kind, level = %level, "Logging initialized");
    Ok(())
}
