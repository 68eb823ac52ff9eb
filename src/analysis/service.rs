//! Query service consumed by the presentation layer.

use super::aggregator;
use crate::config::DashboardConfig;
use crate::dataset::Table;
use crate::error::Result;
use crate::models::{AggregationResult, DashboardView, Dimension, OrderCountMode, SummaryTotals};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Per-chart settings applied by [`AnalyticsService::dashboard`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSettings {
    pub order_count: OrderCountMode,
    pub category_top_n: Option<usize>,
    pub age_group_top_n: Option<usize>,
    pub zone_top_n: Option<usize>,
}

impl DashboardSettings {
    /// Top-N limit configured for a dimension.
    pub fn top_n(&self, dimension: Dimension) -> Option<usize> {
        match dimension {
            Dimension::Category => self.category_top_n,
            Dimension::AgeGroup => self.age_group_top_n,
            Dimension::Zone => self.zone_top_n,
        }
    }
}

impl From<&DashboardConfig> for DashboardSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            order_count: config.order_count,
            category_top_n: config.category_top_n,
            age_group_top_n: config.age_group_top_n,
            zone_top_n: config.zone_top_n,
        }
    }
}

/// Read-only analytics over a shared table.
///
/// Cloning is cheap; every clone shares the same table.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    table: Arc<Table>,
    settings: DashboardSettings,
}

impl AnalyticsService {
    pub fn new(table: Arc<Table>, settings: DashboardSettings) -> Self {
        Self { table, settings }
    }

    /// Dropdown options: sorted distinct regions.
    pub fn regions(&self) -> &[String] {
        self.table.regions()
    }

    pub fn summarize(&self, region: Option<&str>) -> SummaryTotals {
        aggregator::summarize(&self.table, region, self.settings.order_count)
    }

    #[allow(dead_code)] // Typed counterpart of group_by_name
    pub fn group_by(
        &self,
        dimension: Dimension,
        region: Option<&str>,
        top_n: Option<usize>,
    ) -> AggregationResult {
        aggregator::group_by(&self.table, dimension, region, top_n)
    }

    /// Group by a dimension given by name. Unknown names are an error.
    pub fn group_by_name(
        &self,
        dimension: &str,
        region: Option<&str>,
        top_n: Option<usize>,
    ) -> Result<AggregationResult> {
        aggregator::group_by_name(&self.table, dimension, region, top_n)
    }

    /// Compute every KPI and chart for one region selection.
    pub fn dashboard(&self, region: Option<&str>) -> DashboardView {
        let region = region.filter(|r| !r.is_empty());
        let rows = aggregator::filter_region(&self.table, region);

        debug!(
            "Dashboard query for {}: {} rows",
            region.unwrap_or("all regions"),
            rows.len()
        );

        let chart = |dimension: Dimension| {
            aggregator::group_records(&rows, dimension, self.settings.top_n(dimension))
        };

        DashboardView {
            region: region.map(String::from),
            summary: aggregator::summarize_records(&rows, self.settings.order_count),
            by_category: chart(Dimension::Category),
            by_age_group: chart(Dimension::AgeGroup),
            by_zone: chart(Dimension::Zone),
            generated_at: Utc::now(),
        }
    }
}
