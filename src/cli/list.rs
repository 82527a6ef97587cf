//! List command implementation

use anyhow::Result;

use bugdeck::api::GatewayClient;
use bugdeck::config::Config;
use bugdeck::domain::SourceFilter;
use bugdeck::fetch::fetch_records;
use bugdeck::filter::FilterState;

/// Options for the list command, straight from the CLI flags.
pub struct ListOptions {
    pub source: Option<String>,
    pub search: Option<String>,
    pub priority: Option<String>,
    pub state: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: usize,
}

/// Fetch, filter, and print records as a plain table.
pub fn list_command(config: &Config, options: ListOptions) -> Result<()> {
    let client = GatewayClient::new(&config.gateway);

    let selector = match super::parse_source(options.source.as_deref())? {
        Some(source) => SourceFilter::Only(source),
        None => SourceFilter::All,
    };
    let range = super::summary::parse_range(options.start, options.end)?;

    let merged = fetch_records(&client, selector, range.as_ref());
    for (source, error) in &merged.failures {
        eprintln!("warning: {} fetch failed: {}", source.as_str(), error);
    }
    if merged.is_total_failure() {
        anyhow::bail!("All sources failed; nothing to list");
    }

    let filter = FilterState {
        search: options.search.unwrap_or_default(),
        priority: options.priority,
        state: options.state,
        source: selector,
        date_range: range,
    };
    let matching = filter.apply(&merged.records);

    println!(
        "{:<22} {:<9} {:<10} {:<14} {}",
        "TICKET", "SOURCE", "PRIORITY", "STATE", "TITLE"
    );
    for record in matching.iter().take(options.limit) {
        println!(
            "{:<22} {:<9} {:<10} {:<14} {}",
            record.ticket_id,
            record.source_system.as_str(),
            record.priority_label(),
            record.workflow_state(),
            truncate(&record.title(), 60),
        );
    }

    let shown = matching.len().min(options.limit);
    if shown < matching.len() {
        println!("\n{} of {} matching records shown", shown, matching.len());
    } else {
        println!("\n{} matching records ({} fetched)", matching.len(), merged.records.len());
    }
    if merged.tally.total_contaminated() > 0 {
        eprintln!(
            "warning: {} record(s) dropped for source mismatch",
            merged.tally.total_contaminated()
        );
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
