// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wigstock - inventory and sign-in for a small wig shop.
//!
//! This is the binary entry point.

mod chart;
mod logging;
mod products;
mod prompt;
mod users;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use thiserror::Error;
use wigstock_config::WigstockConfig;
use wigstock_core::{ErrorSink, HealthStatus, TracingSink, WigstockError};
use wigstock_storage::Gateway;

use crate::products::ProductsCommand;

/// Wigstock - inventory and sign-in for a small wig shop.
#[derive(Parser, Debug)]
#[command(name = "wigstock", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database and its tables if they do not exist.
    Init,
    /// Create an account. The password is prompted for.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
    },
    /// Check a username and password.
    Login {
        #[arg(long)]
        username: String,
    },
    /// Manage products. Requires signing in.
    Products {
        /// Account to sign in as.
        #[arg(long)]
        user: String,
        #[command(subcommand)]
        command: ProductsCommand,
    },
    /// Chart the best-stocked products. Requires signing in.
    Chart {
        /// Account to sign in as.
        #[arg(long)]
        user: String,
    },
}

/// Failures of a single command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] WigstockError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid username or password")]
    AccessDenied,

    #[error("product #{0} not found")]
    NotFound(i64),

    #[error("failed to read from terminal: {0}")]
    Prompt(std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => wigstock_config::load_and_validate_path(path),
        None => wigstock_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            wigstock_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!(
            "wigstock: cannot open error log {}: {e}",
            config.logging.error_log
        );
        return ExitCode::FAILURE;
    }

    let use_color = !cli.plain && std::io::stdout().is_terminal();

    let mut gateway = match open_gateway(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            report(&CliError::from(e), use_color);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut gateway, &config, cli.command, use_color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, use_color);
            ExitCode::FAILURE
        }
    }
}

/// Connect to the configured backend and make sure the tables exist.
fn open_gateway(config: &WigstockConfig) -> Result<Gateway, WigstockError> {
    let sink: Arc<dyn ErrorSink> = Arc::new(TracingSink);
    let mut gateway = Gateway::from_config(&config.storage, sink);
    gateway.connect()?;
    gateway.bootstrap_schema()?;
    Ok(gateway)
}

fn run(
    gateway: &mut Gateway,
    config: &WigstockConfig,
    command: Commands,
    use_color: bool,
) -> Result<(), CliError> {
    match command {
        Commands::Init => {
            print_init(gateway, config, use_color);
            Ok(())
        }
        Commands::Register { email, username } => users::run_register(gateway, &email, &username),
        Commands::Login { username } => users::run_login(gateway, &username),
        Commands::Products { user, command } => {
            users::require_login(gateway, &user)?;
            products::run_products(gateway, command, use_color)
        }
        Commands::Chart { user } => {
            users::require_login(gateway, &user)?;
            chart::run_chart(gateway, use_color);
            Ok(())
        }
    }
}

fn print_init(gateway: &mut Gateway, config: &WigstockConfig, use_color: bool) {
    let location = match config.storage.backend {
        wigstock_core::BackendKind::Sqlite => config.storage.sqlite.path.clone(),
        wigstock_core::BackendKind::MySql => format!(
            "{}:{}/{}",
            config.storage.mysql.host, config.storage.mysql.port, config.storage.mysql.database
        ),
    };

    match gateway.health_check() {
        HealthStatus::Healthy if use_color => {
            println!("{} {} storage ready at {location}", "✓".green(), gateway.kind());
        }
        HealthStatus::Healthy => println!("[OK] {} storage ready at {location}", gateway.kind()),
        HealthStatus::Unhealthy(reason) => {
            println!("[FAIL] {} storage at {location}: {reason}", gateway.kind());
        }
    }
}

fn report(error: &CliError, use_color: bool) {
    if use_color {
        eprintln!("{}: {error}", "error".red());
    } else {
        eprintln!("error: {error}");
    }
}
