//! Sales aggregation and summary statistics.
//!
//! Every function here is a pure function of the table and its
//! arguments. Groups are ordered by summed amount descending, ties
//! by key ascending.

use crate::dataset::Table;
use crate::error::Result;
use crate::models::{
    AggregationResult, Dimension, GroupTotal, OrderCountMode, SalesRecord, SummaryTotals,
};
use std::collections::{HashMap, HashSet};

/// Rows matching the region filter. `None` or an empty string selects everything.
pub fn filter_region<'a>(table: &'a Table, region: Option<&str>) -> Vec<&'a SalesRecord> {
    match region.filter(|r| !r.is_empty()) {
        Some(region) => table
            .records()
            .iter()
            .filter(|r| r.region == region)
            .collect(),
        None => table.records().iter().collect(),
    }
}

/// Compute the KPI triple over a set of rows.
pub fn summarize_records(records: &[&SalesRecord], mode: OrderCountMode) -> SummaryTotals {
    let total_amount: f64 = records.iter().map(|r| r.amount).sum();

    let customers = records
        .iter()
        .map(|r| r.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let orders = match mode {
        OrderCountMode::Rows => records.len() as u64,
        // Saturate rather than overflow on absurd quantities
        OrderCountMode::Quantity => records
            .iter()
            .filter_map(|r| r.quantity)
            .fold(0u64, |acc, q| acc.saturating_add(q)),
    };

    SummaryTotals {
        total_amount,
        customers,
        orders,
    }
}

/// Summary totals for the table, optionally filtered to one region.
pub fn summarize(table: &Table, region: Option<&str>, mode: OrderCountMode) -> SummaryTotals {
    summarize_records(&filter_region(table, region), mode)
}

/// Group a set of rows by a dimension and sum the amounts.
pub fn group_records(
    records: &[&SalesRecord],
    dimension: Dimension,
    top_n: Option<usize>,
) -> AggregationResult {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();

    for record in records {
        let entry = sums.entry(dimension.key(record)).or_insert((0.0, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let mut groups: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(key, (amount, count))| GroupTotal {
            key: key.to_string(),
            amount,
            count,
        })
        .collect();

    sort_groups(&mut groups);

    if let Some(n) = top_n {
        groups.truncate(n);
    }

    AggregationResult { dimension, groups }
}

/// Per-dimension sums for the table, optionally filtered and truncated.
pub fn group_by(
    table: &Table,
    dimension: Dimension,
    region: Option<&str>,
    top_n: Option<usize>,
) -> AggregationResult {
    group_records(&filter_region(table, region), dimension, top_n)
}

/// Like [`group_by`], with the dimension given by name.
pub fn group_by_name(
    table: &Table,
    dimension: &str,
    region: Option<&str>,
    top_n: Option<usize>,
) -> Result<AggregationResult> {
    let dimension: Dimension = dimension.parse()?;
    Ok(group_by(table, dimension, region, top_n))
}

/// Sort by amount descending, then key ascending.
pub fn sort_groups(groups: &mut [GroupTotal]) {
    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.key.cmp(&b.key)));
}

/// Percentage of `total` contributed by each group. Zero when the total is zero.
pub fn share_of_total(result: &AggregationResult, total: f64) -> Vec<(String, f64)> {
    result
        .groups
        .iter()
        .map(|g| {
            let share = if total == 0.0 {
                0.0
            } else {
                g.amount * 100.0 / total
            };
            (g.key.clone(), share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, category: &str, age: &str, zone: &str, cust: &str, amount: f64) -> SalesRecord {
        SalesRecord {
            region: region.to_string(),
            category: category.to_string(),
            age_group: age.to_string(),
            zone: zone.to_string(),
            customer_id: cust.to_string(),
            amount,
            quantity: None,
        }
    }

    fn scenario_table() -> Table {
        Table::new(vec![
            record("X", "A", "18-25", "N", "u1", 100.0),
            record("X", "B", "26-35", "N", "u2", 50.0),
            record("Y", "A", "18-25", "S", "u3", 30.0),
        ])
    }

    fn larger_table() -> Table {
        Table::new(vec![
            record("X", "Food", "18-25", "N", "u1", 40.0),
            record("X", "Auto", "26-35", "N", "u1", 90.0),
            record("X", "Toys", "36-45", "E", "u2", 15.0),
            record("Y", "Food", "18-25", "S", "u3", 25.0),
            record("Y", "Books", "46-50", "S", "u4", 60.0),
            record("Z", "Auto", "26-35", "W", "u5", 5.0),
            record("Z", "Toys", "55+", "W", "u6", 70.0),
        ])
    }

    #[test]
    fn test_summarize_all_regions() {
        let totals = summarize(&scenario_table(), None, OrderCountMode::Rows);
        assert_eq!(totals.total_amount, 180.0);
        assert_eq!(totals.customers, 3);
        assert_eq!(totals.orders, 3);
    }

    #[test]
    fn test_summarize_one_region() {
        let totals = summarize(&scenario_table(), Some("X"), OrderCountMode::Rows);
        assert_eq!(totals.total_amount, 150.0);
        assert_eq!(totals.customers, 2);
        assert_eq!(totals.orders, 2);
    }

    #[test]
    fn test_empty_region_is_no_filter() {
        let table = scenario_table();
        assert_eq!(
            summarize(&table, Some(""), OrderCountMode::Rows),
            summarize(&table, None, OrderCountMode::Rows)
        );
    }

    #[test]
    fn test_unknown_region_yields_zeroes() {
        let table = scenario_table();
        let totals = summarize(&table, Some("Nowhere"), OrderCountMode::Rows);
        assert_eq!(totals, SummaryTotals::default());

        for dim in Dimension::ALL {
            assert!(group_by(&table, dim, Some("Nowhere"), None).is_empty());
        }
    }

    #[test]
    fn test_group_by_category() {
        let result = group_by(&scenario_table(), Dimension::Category, None, None);
        assert_eq!(result.dimension, Dimension::Category);
        assert_eq!(result.pairs(), vec![("A", 130.0), ("B", 50.0)]);
        assert_eq!(result.groups[0].count, 2);
    }

    #[test]
    fn test_group_by_zone_filtered() {
        let result = group_by(&scenario_table(), Dimension::Zone, Some("Y"), None);
        assert_eq!(result.pairs(), vec![("S", 30.0)]);
    }

    #[test]
    fn test_group_by_sorted_descending() {
        let table = larger_table();
        for dim in Dimension::ALL {
            let result = group_by(&table, dim, None, None);
            for pair in result.groups.windows(2) {
                assert!(pair[0].amount >= pair[1].amount);
            }
        }
    }

    #[test]
    fn test_top_n_is_prefix() {
        let table = larger_table();
        let full = group_by(&table, Dimension::Category, None, None);

        for n in 0..=full.len() + 1 {
            let top = group_by(&table, Dimension::Category, None, Some(n));
            assert!(top.len() <= n);
            assert_eq!(top.groups[..], full.groups[..top.len()]);
        }
    }

    #[test]
    fn test_top_n_drops_rest() {
        let top = group_by(&larger_table(), Dimension::Category, None, Some(2));
        // Food 65, Auto 95, Toys 85, Books 60
        assert_eq!(top.pairs(), vec![("Auto", 95.0), ("Toys", 85.0)]);
    }

    #[test]
    fn test_ties_broken_by_key() {
        let table = Table::new(vec![
            record("X", "Zeta", "a", "N", "u1", 10.0),
            record("X", "Alpha", "a", "N", "u2", 10.0),
            record("X", "Mid", "a", "N", "u3", 10.0),
        ]);
        let result = group_by(&table, Dimension::Category, None, None);
        assert_eq!(result.pairs(), vec![("Alpha", 10.0), ("Mid", 10.0), ("Zeta", 10.0)]);
    }

    #[test]
    fn test_partition_consistency() {
        let table = larger_table();
        let all = summarize(&table, None, OrderCountMode::Rows);

        let mut amount = 0.0;
        let mut orders = 0;
        for region in table.regions() {
            let part = summarize(&table, Some(region), OrderCountMode::Rows);
            amount += part.total_amount;
            orders += part.orders;
        }

        assert!((all.total_amount - amount).abs() < 1e-9);
        assert_eq!(all.orders, orders);
    }

    #[test]
    fn test_quantity_mode() {
        let mut a = record("X", "A", "18-25", "N", "u1", 10.0);
        a.quantity = Some(3);
        let mut b = record("X", "A", "18-25", "N", "u1", 10.0);
        b.quantity = Some(4);
        let c = record("X", "A", "18-25", "N", "u2", 10.0);
        let table = Table::new(vec![a, b, c]);

        let totals = summarize(&table, None, OrderCountMode::Quantity);
        assert_eq!(totals.orders, 7);
        assert_eq!(totals.customers, 2);
        assert_eq!(summarize(&table, None, OrderCountMode::Rows).orders, 3);
    }

    #[test]
    fn test_quantity_mode_saturates() {
        let mut a = record("X", "A", "18-25", "N", "u1", 10.0);
        a.quantity = Some(u64::MAX);
        let mut b = record("X", "A", "18-25", "N", "u2", 10.0);
        b.quantity = Some(1);
        let table = Table::new(vec![a, b]);

        let totals = summarize(&table, None, OrderCountMode::Quantity);
        assert_eq!(totals.orders, u64::MAX);
    }

    #[test]
    fn test_group_by_name() {
        let table = scenario_table();
        let result = group_by_name(&table, "age_group", None, None).unwrap();
        assert_eq!(result.pairs(), vec![("18-25", 130.0), ("26-35", 50.0)]);

        let err = group_by_name(&table, "gender", None, None).unwrap_err();
        assert!(matches!(err, crate::error::DashboardError::UnknownDimension(_)));
    }

    #[test]
    fn test_share_of_total() {
        let table = scenario_table();
        let result = group_by(&table, Dimension::Category, None, None);
        let shares = share_of_total(&result, 200.0);
        assert_eq!(shares, vec![("A".to_string(), 65.0), ("B".to_string(), 25.0)]);

        assert_eq!(share_of_total(&result, 0.0)[0].1, 0.0);
    }
}
