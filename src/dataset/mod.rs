//! Sales dataset loading and the in-memory table.
//!
//! The table is built once at startup and only ever read afterwards.

pub mod loader;

pub use loader::{load, LoadOptions};

use crate::models::SalesRecord;
use std::collections::BTreeSet;

/// Immutable set of sales records with load statistics.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<SalesRecord>,
    regions: Vec<String>,
    rows_read: usize,
    rows_dropped: usize,
}

impl Table {
    /// Build a table from already-validated records.
    #[allow(dead_code)] // Constructor for in-memory data
    pub fn new(records: Vec<SalesRecord>) -> Self {
        let rows_read = records.len();
        Self::with_stats(records, rows_read, 0)
    }

    pub(crate) fn with_stats(records: Vec<SalesRecord>, rows_read: usize, rows_dropped: usize) -> Self {
        let regions = records
            .iter()
            .map(|r| r.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            records,
            regions,
            rows_read,
            rows_dropped,
        }
    }

    /// All records that survived loading.
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Sorted, deduplicated region values.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Data rows seen in the source, including dropped ones.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Rows discarded because the amount (or the row itself) was malformed.
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped
    }
}
