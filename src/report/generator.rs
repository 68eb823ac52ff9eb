//! Dashboard rendering.
//!
//! This module turns a [`DashboardView`] into the text dashboard printed
//! to the terminal, or into JSON for other consumers.

use crate::analysis::share_of_total;
use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::models::{AggregationResult, DashboardView, SummaryTotals};
use anyhow::Result;

/// Render a dashboard in the requested format.
pub fn render(view: &DashboardView, format: OutputFormat, config: &ReportConfig) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(view),
        OutputFormat::Text => Ok(render_text(view, config)),
    }
}

/// Generate the complete text dashboard.
pub fn render_text(view: &DashboardView, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", config.title));

    output.push_str(&format!(
        "**Region:** {}\n\n",
        view.region.as_deref().unwrap_or("All regions")
    ));

    // KPI cards
    output.push_str(&generate_kpi_section(&view.summary, config));

    // Charts
    for chart in view.charts() {
        output.push_str(&render_chart(chart, view.summary.total_amount, config));
    }

    output.push_str(&format!(
        "*Computed {}*\n",
        view.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

/// Generate the KPI table.
fn generate_kpi_section(summary: &SummaryTotals, config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("| 💰 Total Sales | 👥 Total Customers | 🛒 Total Orders |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        format_currency(summary.total_amount, &config.currency_symbol),
        format_count(summary.customers as u64),
        format_count(summary.orders),
    ));

    section
}

/// Generate one chart: a table with a proportional bar per group.
///
/// Shares are relative to `total`, the sales total of the whole selection.
pub fn render_chart(result: &AggregationResult, total: f64, config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", result.dimension.title()));

    if result.is_empty() {
        section.push_str("_No sales for this selection._\n\n");
        return section;
    }

    section.push_str(&format!("| {} | Sales | Share | |\n", result.dimension.label()));
    section.push_str("|:---|---:|---:|:---|\n");

    let max = result
        .groups
        .iter()
        .map(|g| g.amount)
        .fold(0.0_f64, f64::max);
    let shares = share_of_total(result, total);

    for (group, (_, share)) in result.groups.iter().zip(shares) {
        section.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            group.key,
            format_currency(group.amount, &config.currency_symbol),
            share,
            bar(group.amount, max, config.bar_width),
        ));
    }
    section.push('\n');

    section
}

/// A bar of `█` scaled so that `max` fills `width` cells.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }

    let cells = ((value / max) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width.max(1)))
}

/// Format a monetary amount rounded to whole units with thousands separators.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = format!("{:.0}", amount.abs());
    let sign = if amount < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{}{}{}", symbol, sign, group_thousands(&rounded))
}

/// Format a count with thousands separators.
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Generate a JSON dashboard.
pub fn render_json(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}

/// List regions, one per line.
pub fn render_regions(regions: &[String]) -> String {
    let mut output = String::new();

    for region in regions {
        output.push_str(region);
        output.push('\n');
    }

    output
}
