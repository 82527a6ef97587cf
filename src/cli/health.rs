//! Health command implementation

use anyhow::{Context, Result};

use bugdeck::api::GatewayClient;
use bugdeck::config::Config;

/// Probe the gateway's liveness endpoint.
pub fn health_command(config: &Config) -> Result<()> {
    let client = GatewayClient::new(&config.gateway);
    client
        .health_check()
        .with_context(|| format!("Gateway at {} is not healthy", client.base_url()))?;
    println!("Gateway at {} is up", client.base_url());
    Ok(())
}
