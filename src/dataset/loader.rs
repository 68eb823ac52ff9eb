//! CSV dataset loader.
//!
//! Reads the cleaned sales file, trims header names, coerces the amount
//! column to a number and silently drops rows where that fails. Only a
//! missing file (or a missing required column) is fatal.

use super::Table;
use crate::config::{ColumnMapping, Config};
use crate::error::{DashboardError, Result};
use crate::models::{OrderCountMode, SalesRecord};
use csv::StringRecord;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Options controlling how the dataset is parsed.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header names for each field.
    pub columns: ColumnMapping,
    /// Field delimiter.
    pub delimiter: char,
    /// Read the quantity column (required when orders are summed).
    pub read_quantity: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            delimiter: ',',
            read_quantity: false,
        }
    }
}

impl From<&Config> for LoadOptions {
    fn from(config: &Config) -> Self {
        Self {
            columns: config.dataset.columns.clone(),
            delimiter: config.dataset.delimiter,
            read_quantity: config.dashboard.order_count == OrderCountMode::Quantity,
        }
    }
}

/// Positions of the mapped columns within a header row.
struct ColumnIndex {
    region: usize,
    category: usize,
    age_group: usize,
    zone: usize,
    customer: usize,
    amount: usize,
    quantity: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, options: &LoadOptions, source_label: &str) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name.trim())
                .ok_or_else(|| DashboardError::MissingColumn {
                    column: name.to_string(),
                    source_label: source_label.to_string(),
                })
        };

        let columns = &options.columns;
        Ok(Self {
            region: find(&columns.region)?,
            category: find(&columns.category)?,
            age_group: find(&columns.age_group)?,
            zone: find(&columns.zone)?,
            customer: find(&columns.customer)?,
            amount: find(&columns.amount)?,
            quantity: if options.read_quantity {
                Some(find(&columns.quantity)?)
            } else {
                None
            },
        })
    }

    /// Build a record from a row, or `None` if the row must be dropped.
    fn record(&self, row: &StringRecord) -> Option<SalesRecord> {
        let amount = parse_amount(row.get(self.amount)?)?;

        let quantity = match self.quantity {
            Some(idx) => row.get(idx).and_then(|q| q.trim().parse::<u64>().ok()),
            None => None,
        };

        Some(SalesRecord {
            region: row.get(self.region)?.to_string(),
            category: row.get(self.category)?.to_string(),
            age_group: row.get(self.age_group)?.to_string(),
            zone: row.get(self.zone)?.to_string(),
            customer_id: row.get(self.customer)?.to_string(),
            amount,
            quantity,
        })
    }
}

/// Largest absolute amount accepted for a single row.
///
/// Any realistic number of rows at this size still sums to a finite total.
pub const MAX_AMOUNT: f64 = 1e15;

/// Parse a monetary amount. Empty, non-numeric, non-finite and
/// out-of-range values are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= MAX_AMOUNT)
}

/// Load the dataset from a file path.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Table> {
    info!("Loading dataset: {}", path.display());

    if !path.exists() {
        return Err(DashboardError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_from_reader(file, options, &path.display().to_string())
}

/// Load the dataset from any reader. `source_label` names the input in errors and logs.
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions, source_label: &str) -> Result<Table> {
    if !options.delimiter.is_ascii() {
        return Err(DashboardError::InvalidDelimiter(options.delimiter));
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter as u8)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    debug!("Dataset headers: {:?}", headers.iter().collect::<Vec<_>>());

    let index = ColumnIndex::resolve(&headers, options, source_label)?;

    let mut records = Vec::new();
    let mut rows_read = 0;
    let mut rows_dropped = 0;

    for (line, result) in csv_reader.records().enumerate() {
        rows_read += 1;

        let parsed = match result {
            Ok(row) => index.record(&row),
            Err(e) => {
                debug!("Unreadable row at line {}: {}", line + 2, e);
                None
            }
        };

        match parsed {
            Some(record) => records.push(record),
            None => {
                rows_dropped += 1;
                debug!("Dropping malformed row at line {}", line + 2);
            }
        }
    }

    info!(
        "Loaded {} records from {} ({} dropped)",
        records.len(),
        source_label,
        rows_dropped
    );

    Ok(Table::with_stats(records, rows_read, rows_dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/sales_sample.csv")
    }

    fn load_str(csv: &str) -> Result<Table> {
        load_from_reader(csv.as_bytes(), &LoadOptions::default(), "inline")
    }

    #[test]
    fn test_load_fixture() {
        let table = load(&fixture_path(), &LoadOptions::default()).unwrap();

        assert_eq!(table.rows_read(), 10);
        assert_eq!(table.rows_dropped(), 2);
        assert_eq!(table.len(), 8);
        assert_eq!(
            table.regions(),
            ["Andhra Pradesh", "Gujarat", "Karnataka", "Maharashtra", "Uttar Pradesh"]
        );
        assert!(table.records().iter().all(|r| r.quantity.is_none()));
    }

    #[test]
    fn test_load_reads_quantity_when_requested() {
        let options = LoadOptions {
            read_quantity: true,
            ..LoadOptions::default()
        };
        let table = load(&fixture_path(), &options).unwrap();

        let total: u64 = table.records().iter().filter_map(|r| r.quantity).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.csv");

        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DashboardError::DatasetNotFound { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_non_numeric_amount_dropped() {
        let table = load_str(
            "state,product_category,age_group,zone,user_id,amount\n\
             X,A,18-25,N,u1,100\n\
             X,A,18-25,N,u2,abc\n",
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].amount, 100.0);
        assert_eq!(table.rows_dropped(), 1);
    }

    #[test]
    fn test_header_whitespace_trimmed() {
        let table = load_str(
            "  state , product_category,age_group ,zone,user_id,  amount  \n\
             X,A,18-25,N,u1, 42.5 \n",
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].amount, 42.5);
        assert_eq!(table.records()[0].region, "X");
    }

    #[test]
    fn test_missing_column() {
        let err = load_str("state,product_category,age_group,zone,amount\nX,A,18-25,N,1\n")
            .unwrap_err();

        match err {
            DashboardError::MissingColumn { column, source_label } => {
                assert_eq!(column, "user_id");
                assert_eq!(source_label, "inline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_quantity_column_only_required_when_read() {
        let csv = "state,product_category,age_group,zone,user_id,amount\nX,A,18-25,N,u1,1\n";
        assert!(load_str(csv).is_ok());

        let options = LoadOptions {
            read_quantity: true,
            ..LoadOptions::default()
        };
        let err = load_from_reader(csv.as_bytes(), &options, "inline").unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn { ref column, .. } if column == "orders"));
    }

    #[test]
    fn test_short_rows_and_special_values_dropped() {
        let table = load_str(
            "state,product_category,age_group,zone,user_id,amount\n\
             X,A,18-25,N,u1,10\n\
             X,A,18-25\n\
             X,A,18-25,N,u2,NaN\n\
             X,A,18-25,N,u3,inf\n\
             X,A,18-25,N,u4,\n",
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows_read(), 5);
        assert_eq!(table.rows_dropped(), 4);
    }

    #[test]
    fn test_custom_delimiter_and_columns() {
        let options = LoadOptions {
            columns: ColumnMapping {
                customer: "customer_id".to_string(),
                ..ColumnMapping::default()
            },
            delimiter: ';',
            read_quantity: false,
        };
        let table = load_from_reader(
            "state;product_category;age_group;zone;customer_id;amount\nX;A;18-25;N;c9;7\n".as_bytes(),
            &options,
            "inline",
        )
        .unwrap();

        assert_eq!(table.records()[0].customer_id, "c9");
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let options = LoadOptions {
            delimiter: '→',
            ..LoadOptions::default()
        };
        let err = load_from_reader("a".as_bytes(), &options, "inline").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDelimiter('→')));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount("-3"), Some(-3.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("₹100"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("1e15"), Some(MAX_AMOUNT));
        assert_eq!(parse_amount("1e308"), None);
        assert_eq!(parse_amount("-1e308"), None);
    }

    #[test]
    fn test_huge_amounts_dropped() {
        let table = load_str(
            "state,product_category,age_group,zone,user_id,amount\n\
             X,A,18-25,N,u1,1e308\n\
             X,A,18-25,N,u2,1e308\n\
             X,A,18-25,N,u3,250\n",
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows_dropped(), 2);
        let total: f64 = table.records().iter().map(|r| r.amount).sum();
        assert!(total.is_finite());
        assert_eq!(total, 250.0);
    }
}
