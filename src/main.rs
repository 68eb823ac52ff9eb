//! Salesboard - sales analytics dashboard
//!
//! Loads a cleaned sales CSV once at startup and renders total sales,
//! customer and order counts plus sales by product category, age group
//! and zone, optionally filtered to one region.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing dataset, bad config, missing column, etc.)

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;
mod session;

use anyhow::{Context, Result};
use analysis::{AnalyticsService, DashboardSettings};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so the file can turn on verbose output
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&args, &config);

    info!("Salesboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(args, config).await {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salesboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the dataset path, column names and chart limits.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout only carries the dashboard. `RUST_LOG`
/// overrides the CLI-derived level.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Load the dataset once and serve the requested view.
async fn run(args: Args, config: Config) -> Result<()> {
    let data_path = Path::new(&config.dataset.path);
    let options = dataset::LoadOptions::from(&config);
    let table = dataset::load(data_path, &options).context("Cannot start without the sales dataset")?;
    info!("{} records available for queries", table.len());

    if table.rows_dropped() > 0 {
        info!(
            "Skipped {} of {} malformed rows",
            table.rows_dropped(),
            table.rows_read()
        );
    }
    if table.is_empty() {
        warn!("Dataset has no usable rows; every figure will be zero");
    }

    let service = AnalyticsService::new(
        Arc::new(table),
        DashboardSettings::from(&config.dashboard),
    );

    // Dropdown options
    if args.list_regions {
        print!("{}", report::render_regions(service.regions()));
        return Ok(());
    }

    if args.interactive {
        let session_options = session::SessionOptions {
            format: config.report.format,
            report: config.report.clone(),
        };
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        return session::run(&service, stdin, &mut stdout, &session_options).await;
    }

    let region = args.region_filter();
    if let Some(r) = region {
        if !service.regions().iter().any(|known| known == r) {
            warn!("No sales recorded for region '{}'", r);
        }
    }

    let view = service.dashboard(region);
    println!("{}", report::render(&view, config.report.format, &config.report)?);

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // An explicit config path must load
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
