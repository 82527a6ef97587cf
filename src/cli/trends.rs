//! Trends command implementation

use anyhow::{Context, Result};

use bugdeck::api::GatewayClient;
use bugdeck::config::Config;

/// Print per-day record counts as a text bar chart.
pub fn trends_command(config: &Config, days: u32, source: Option<String>) -> Result<()> {
    let client = GatewayClient::new(&config.gateway);
    let source = super::parse_source(source.as_deref())?;

    let points = client
        .time_series(days, source)
        .context("Failed to fetch activity trend from gateway")?;

    if points.is_empty() {
        println!("No activity in the last {} days", days);
        return Ok(());
    }

    let max = points.iter().map(|p| p.count).max().unwrap_or(0);
    for point in &points {
        println!("{:<12} {:>5} {}", point.date, point.count, bar(point.count, max));
    }

    let total: u64 = points.iter().map(|p| p.count).sum();
    println!("\n{} records over {} days", total, points.len());
    Ok(())
}

/// Bar scaled so the busiest day fills the full width.
fn bar(count: u64, max: u64) -> String {
    const WIDTH: u64 = 40;
    if max == 0 {
        return String::new();
    }
    let width = (count * WIDTH / max) as usize;
    "█".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_to_busiest_day() {
        assert_eq!(bar(10, 10).chars().count(), 40);
        assert_eq!(bar(5, 10).chars().count(), 20);
        assert_eq!(bar(0, 10), "");
        // A quiet window with zero everywhere must not divide by zero.
        assert_eq!(bar(0, 0), "");
    }
}
