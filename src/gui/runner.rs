//! GUI runner - wires up the fetch worker and launches the dashboard window.

use std::sync::mpsc;

use anyhow::Result;
use eframe::egui;
use tracing::info;

use crate::api::GatewayClient;
use crate::config::Config;
use crate::fetch::start_fetch_worker;

use super::app::DeckApp;

/// Run the dashboard GUI. Blocks until the window closes.
pub fn run_gui(config: Config) -> Result<()> {
    let client = GatewayClient::new(&config.gateway);
    info!("Starting dashboard against {}", client.base_url());

    // UI thread -> worker commands, worker -> UI updates
    let (command_tx, command_rx) = mpsc::channel();
    let (update_tx, update_rx) = mpsc::channel();
    start_fetch_worker(client, command_rx, update_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 680.0])
            .with_min_inner_size([800.0, 480.0])
            .with_decorations(true)
            .with_resizable(true),
        centered: true,
        ..Default::default()
    };

    let app = DeckApp::new(config, command_tx, update_rx);

    eframe::run_native("bugdeck", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))?;

    Ok(())
}
