//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::OrderCountMode;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Salesboard - sales analytics dashboard in the terminal
///
/// Loads a cleaned sales CSV once and shows total sales, customers and
/// orders alongside sales by product category, age group and zone,
/// optionally filtered to a single region.
///
/// Examples:
///   salesboard --data data/processed/sales.csv
///   salesboard --region Maharashtra --top-n 5
///   salesboard --list-regions
///   salesboard --interactive
///   salesboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the sales dataset (CSV)
    ///
    /// Overrides `dataset.path` from .salesboard.toml.
    #[arg(short, long, value_name = "FILE", env = "SALESBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only include sales from this region
    #[arg(short, long, value_name = "NAME")]
    pub region: Option<String>,

    /// Keep only the top N groups in every chart
    #[arg(short = 'n', long, value_name = "N")]
    pub top_n: Option<usize>,

    /// How the "total orders" figure is computed
    #[arg(long, value_name = "MODE")]
    pub orders: Option<OrderCountMode>,

    /// Output format (text, json)
    ///
    /// Overrides `report.format` from .salesboard.toml (default: text).
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Print the available regions and exit
    #[arg(long, conflicts_with = "interactive")]
    pub list_regions: bool,

    /// Prompt for regions and re-render the dashboard after each one
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salesboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Text tables and bars (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Region filter to apply, treating an empty string as "all regions".
    pub fn region_filter(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.top_n == Some(0) {
            return Err("--top-n must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.interactive && self.region.is_some() {
            return Err("--region cannot be combined with --interactive".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Args {
            data: None,
            config: None,
            region: None,
            top_n: None,
            orders: None,
            format: None,
            list_regions: false,
            interactive: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }
}
