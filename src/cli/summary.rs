//! Summary command implementation

use anyhow::{Context, Result};

use bugdeck::api::GatewayClient;
use bugdeck::config::Config;
use bugdeck::domain::DateRange;

/// Print the gateway's aggregate counts.
pub fn summary_command(
    config: &Config,
    source: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let client = GatewayClient::new(&config.gateway);
    let source = super::parse_source(source.as_deref())?;
    let range = parse_range(start, end)?;

    let summary = client
        .summary(source, range.as_ref())
        .context("Failed to fetch summary from gateway")?;

    println!("Total records: {}", summary.total);

    println!("\nBy source:");
    for (source, count) in &summary.by_source {
        println!("  {:<10} {}", source, count);
    }

    println!("\nBy priority:");
    for (priority, count) in &summary.by_priority {
        println!("  {:<12} {}", priority, count);
    }

    println!("\nBy state:");
    for (state, count) in &summary.by_state {
        println!("  {:<20} {}", state, count);
    }

    Ok(())
}

/// Parse optional CLI date bounds. Both must be present or both absent.
pub(crate) fn parse_range(start: Option<String>, end: Option<String>) -> Result<Option<DateRange>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => DateRange::parse(&start, &end)
            .map(Some)
            .with_context(|| format!("Invalid date range {}..{} (expected YYYY-MM-DD)", start, end)),
        _ => anyhow::bail!("--start and --end must be given together"),
    }
}
