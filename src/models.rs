//! Data models for the sales dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing sales rows, aggregations and
//! dashboard views.

use crate::error::DashboardError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A categorical column used as a group-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Product category
    Category,
    /// Bucketed customer age
    AgeGroup,
    /// Coarse grouping of regions
    Zone,
}

impl Dimension {
    /// All dimensions, in dashboard order.
    #[allow(dead_code)]
    pub const ALL: [Dimension; 3] = [Dimension::Category, Dimension::AgeGroup, Dimension::Zone];

    /// Returns the value of this dimension for a record.
    pub fn key<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            Dimension::Category => &record.category,
            Dimension::AgeGroup => &record.age_group,
            Dimension::Zone => &record.zone,
        }
    }

    /// Column heading used by the renderers.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Category => "Product Category",
            Dimension::AgeGroup => "Age Group",
            Dimension::Zone => "Zone",
        }
    }

    /// Chart title used by the renderers.
    pub fn title(&self) -> &'static str {
        match self {
            Dimension::Category => "Top Product Categories",
            Dimension::AgeGroup => "Sales by Age Group",
            Dimension::Zone => "Sales by Zone",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Category => write!(f, "category"),
            Dimension::AgeGroup => write!(f, "age_group"),
            Dimension::Zone => write!(f, "zone"),
        }
    }
}

impl FromStr for Dimension {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "category" | "product_category" => Ok(Dimension::Category),
            "age" | "age_group" => Ok(Dimension::AgeGroup),
            "zone" => Ok(Dimension::Zone),
            _ => Err(DashboardError::UnknownDimension(s.to_string())),
        }
    }
}

/// How the "total orders" KPI is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderCountMode {
    /// Number of rows in the filtered set
    #[default]
    Rows,
    /// Sum of the per-row quantity column
    Quantity,
}

/// One row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Administrative region (state).
    pub region: String,
    /// Product category.
    pub category: String,
    /// Age bucket, e.g. "26-35".
    pub age_group: String,
    /// Coarse region grouping.
    pub zone: String,
    /// Customer identifier.
    pub customer_id: String,
    /// Monetary amount. Always finite.
    pub amount: f64,
    /// Per-row order quantity, when the dataset carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
}

/// Summed amount for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    /// Dimension value.
    pub key: String,
    /// Sum of amounts in the group.
    pub amount: f64,
    /// Number of rows in the group.
    pub count: usize,
}

/// Groups of one dimension, sorted by amount descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub dimension: Dimension,
    pub groups: Vec<GroupTotal>,
}

impl AggregationResult {
    /// Returns true if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of groups.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns the (key, amount) pairs.
    #[allow(dead_code)] // Convenience view for callers that don't need counts
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.groups
            .iter()
            .map(|g| (g.key.as_str(), g.amount))
            .collect()
    }
}

/// KPI triple for a filtered row set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Sum of amounts.
    pub total_amount: f64,
    /// Distinct customer identifiers.
    pub customers: usize,
    /// Row count or summed quantity, depending on the order count mode.
    pub orders: u64,
}

/// Everything the presentation layer needs for one region selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    /// Selected region, `None` for all regions.
    pub region: Option<String>,
    pub summary: SummaryTotals,
    pub by_category: AggregationResult,
    pub by_age_group: AggregationResult,
    pub by_zone: AggregationResult,
    /// When the view was computed.
    pub generated_at: DateTime<Utc>,
}

impl DashboardView {
    /// The three charts in dashboard order.
    pub fn charts(&self) -> [&AggregationResult; 3] {
        [&self.by_category, &self.by_age_group, &self.by_zone]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, age_group: &str, zone: &str) -> SalesRecord {
        SalesRecord {
            region: "Maharashtra".to_string(),
            category: category.to_string(),
            age_group: age_group.to_string(),
            zone: zone.to_string(),
            customer_id: "1000001".to_string(),
            amount: 10.0,
            quantity: None,
        }
    }

    #[test]
    fn test_dimension_from_str() {
        assert_eq!("category".parse::<Dimension>().unwrap(), Dimension::Category);
        assert_eq!(
            "Product_Category".parse::<Dimension>().unwrap(),
            Dimension::Category
        );
        assert_eq!("age".parse::<Dimension>().unwrap(), Dimension::AgeGroup);
        assert_eq!(" zone ".parse::<Dimension>().unwrap(), Dimension::Zone);
    }

    #[test]
    fn test_dimension_from_str_unknown() {
        let err = "colour".parse::<Dimension>().unwrap_err();
        assert!(matches!(err, DashboardError::UnknownDimension(ref d) if d == "colour"));
    }

    #[test]
    fn test_dimension_key() {
        let r = record("Food", "26-35", "Western");
        assert_eq!(Dimension::Category.key(&r), "Food");
        assert_eq!(Dimension::AgeGroup.key(&r), "26-35");
        assert_eq!(Dimension::Zone.key(&r), "Western");
    }

    #[test]
    fn test_dimension_display_roundtrips() {
        for dim in Dimension::ALL {
            assert_eq!(dim.to_string().parse::<Dimension>().unwrap(), dim);
        }
    }

    #[test]
    fn test_order_count_mode_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: OrderCountMode,
        }
        let w: Wrapper = toml::from_str("mode = \"quantity\"").unwrap();
        assert_eq!(w.mode, OrderCountMode::Quantity);
        assert_eq!(OrderCountMode::default(), OrderCountMode::Rows);
    }
}
