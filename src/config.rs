//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salesboard.toml` files.

use crate::cli::OutputFormat;
use crate::models::{Dimension, OrderCountMode};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".salesboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset location and column mapping.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// KPI and chart settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Rendering settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the cleaned sales CSV.
    #[serde(default = "default_data_path")]
    pub path: String,

    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Header names for each field.
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
            columns: ColumnMapping::default(),
        }
    }
}

fn default_data_path() -> String {
    "data/processed/cleaned_diwali_sales_processed.csv".to_string()
}

fn default_delimiter() -> char {
    ','
}

/// Maps logical fields to header names in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_region_column")]
    pub region: String,
    #[serde(default = "default_category_column")]
    pub category: String,
    #[serde(default = "default_age_group_column")]
    pub age_group: String,
    #[serde(default = "default_zone_column")]
    pub zone: String,
    #[serde(default = "default_customer_column")]
    pub customer: String,
    #[serde(default = "default_amount_column")]
    pub amount: String,
    /// Only read when orders are counted by quantity.
    #[serde(default = "default_quantity_column")]
    pub quantity: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            region: default_region_column(),
            category: default_category_column(),
            age_group: default_age_group_column(),
            zone: default_zone_column(),
            customer: default_customer_column(),
            amount: default_amount_column(),
            quantity: default_quantity_column(),
        }
    }
}

fn default_region_column() -> String {
    "state".to_string()
}

fn default_category_column() -> String {
    "product_category".to_string()
}

fn default_age_group_column() -> String {
    "age_group".to_string()
}

fn default_zone_column() -> String {
    "zone".to_string()
}

fn default_customer_column() -> String {
    "user_id".to_string()
}

fn default_amount_column() -> String {
    "amount".to_string()
}

fn default_quantity_column() -> String {
    "orders".to_string()
}

/// KPI and chart settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How the "total orders" KPI is computed.
    #[serde(default)]
    pub order_count: OrderCountMode,

    /// Keep only the first N categories.
    #[serde(default)]
    pub category_top_n: Option<usize>,

    /// Keep only the first N age groups.
    #[serde(default)]
    pub age_group_top_n: Option<usize>,

    /// Keep only the first N zones.
    #[serde(default)]
    pub zone_top_n: Option<usize>,
}

impl DashboardConfig {
    /// Reject limits that would always produce an empty chart.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            (Dimension::Category, self.category_top_n),
            (Dimension::AgeGroup, self.age_group_top_n),
            (Dimension::Zone, self.zone_top_n),
        ];

        for (dimension, limit) in limits {
            if limit == Some(0) {
                bail!("dashboard.{}_top_n must be at least 1", dimension);
            }
        }

        Ok(())
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Dashboard heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Prefix for monetary values.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Width of the longest bar in text charts.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,

    /// Output format when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            currency_symbol: default_currency_symbol(),
            bar_width: default_bar_width(),
            format: OutputFormat::default(),
        }
    }
}

fn default_title() -> String {
    "Indian E-Commerce Dashboard (Diwali Sales)".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_bar_width() -> usize {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .dashboard
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicitly provided values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.display().to_string();
        }

        if let Some(mode) = args.orders {
            self.dashboard.order_count = mode;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }

        // A global --top-n applies to every chart
        if let Some(n) = args.top_n {
            self.dashboard.category_top_n = Some(n);
            self.dashboard.age_group_top_n = Some(n);
            self.dashboard.zone_top_n = Some(n);
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
