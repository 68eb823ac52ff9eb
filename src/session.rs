//! Interactive dashboard session.
//!
//! Each line read from the input selects a region and re-renders the
//! dashboard, the terminal counterpart of picking a region from a
//! dropdown. Lines starting with `:` are commands.

use crate::analysis::AnalyticsService;
use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::report;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

const HELP: &str = "\
Enter a region name to filter the dashboard, or an empty line for all regions.
Commands:
  :regions              list available regions
  :chart <dim> [N]      show one chart (category, age_group, zone) for the current region
  :help                 show this help
  :q                    quit
";

/// Rendering settings for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub format: OutputFormat,
    pub report: ReportConfig,
}

/// What a single input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(Option<String>),
    Regions,
    Chart { dimension: String, top_n: Option<usize> },
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();

        if line.is_empty() {
            return Command::Select(None);
        }

        if matches!(line, "quit" | "exit") {
            return Command::Quit;
        }

        let Some(rest) = line.strip_prefix(':') else {
            return Command::Select(Some(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        match parts.next() {
            Some("q") | Some("quit") => Command::Quit,
            Some("regions") => Command::Regions,
            Some("help") => Command::Help,
            Some("chart") => {
                let Some(dimension) = parts.next() else {
                    return Command::Invalid("usage: :chart <dimension> [N]".to_string());
                };
                match parts.next().map(str::parse::<usize>) {
                    None => Command::Chart {
                        dimension: dimension.to_string(),
                        top_n: None,
                    },
                    Some(Ok(n)) if n > 0 => Command::Chart {
                        dimension: dimension.to_string(),
                        top_n: Some(n),
                    },
                    Some(_) => Command::Invalid("N must be a positive integer".to_string()),
                }
            }
            _ => Command::Invalid(format!("unknown command: {}", line)),
        }
    }
}

/// Read selections from `input` until EOF or quit, writing each dashboard to `out`.
pub async fn run<R, W>(
    service: &AnalyticsService,
    input: R,
    out: &mut W,
    options: &SessionOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut current: Option<String> = None;

    writeln!(out, "{}", HELP)?;
    write!(out, "region> ")?;
    out.flush()?;

    while let Some(line) = lines.next_line().await? {
        let command = Command::parse(&line);
        debug!("Session command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Regions => write!(out, "{}", report::render_regions(service.regions()))?,
            Command::Invalid(message) => writeln!(out, "{}", message)?,
            Command::Select(region) => {
                if let Some(ref r) = region {
                    if !service.regions().iter().any(|known| known == r) {
                        warn!("No sales recorded for region '{}'", r);
                    }
                }
                let view = service.dashboard(region.as_deref());
                writeln!(out, "{}", report::render(&view, options.format, &options.report)?)?;
                current = region;
            }
            Command::Chart { dimension, top_n } => {
                let region = current.as_deref();
                match service.group_by_name(&dimension, region, top_n) {
                    Ok(result) => {
                        let total = service.summarize(region).total_amount;
                        writeln!(out, "{}", report::render_chart(&result, total, &options.report))?;
                    }
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
        }

        write!(out, "region> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}
