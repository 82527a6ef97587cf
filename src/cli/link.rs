//! Link command implementation

use anyhow::{Context, Result};

use bugdeck::api::GatewayClient;
use bugdeck::config::Config;

/// Declare that two ticket identifiers refer to the same issue.
///
/// Write-through to the gateway; nothing changes locally, so the next
/// fetch reflects the linkage.
pub fn link_command(config: &Config, old_ticket_id: &str, new_ticket_id: &str) -> Result<()> {
    let client = GatewayClient::new(&config.gateway);
    client
        .link_bugs(old_ticket_id, new_ticket_id)
        .with_context(|| format!("Failed to link {} -> {}", old_ticket_id, new_ticket_id))?;
    println!("Linked {} -> {}", old_ticket_id, new_ticket_id);
    Ok(())
}
