//! Background fetch worker for the GUI.
//!
//! The worker thread owns the gateway client; the UI thread sends
//! [`FetchCommand`]s and receives [`FetchUpdate`]s over mpsc channels.
//! Every command carries a generation number. The app only applies the
//! update matching the latest generation it issued, so a stale in-flight
//! response can never overwrite newer state.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::debug;

use crate::api::GatewayClient;
use crate::domain::{DateRange, SourceFilter};

use super::{fetch_records, MergedFetch};

/// A fetch request from the UI thread.
#[derive(Debug, Clone)]
pub struct FetchCommand {
    pub generation: u64,
    pub selector: SourceFilter,
    pub date_range: Option<DateRange>,
}

/// The worker's answer, tagged with the generation it answers.
#[derive(Debug)]
pub struct FetchUpdate {
    pub generation: u64,
    pub result: MergedFetch,
}

/// Spawn the fetch worker thread. Returns when the command channel closes.
pub fn start_fetch_worker(
    client: GatewayClient,
    command_rx: Receiver<FetchCommand>,
    update_tx: Sender<FetchUpdate>,
) {
    thread::spawn(move || fetch_worker_loop(client, command_rx, update_tx));
}

fn fetch_worker_loop(
    client: GatewayClient,
    command_rx: Receiver<FetchCommand>,
    update_tx: Sender<FetchUpdate>,
) {
    while let Ok(mut command) = command_rx.recv() {
        // Commands queued behind this one supersede it; skip straight to
        // the newest so we never spend a round-trip on stale requests.
        while let Ok(newer) = command_rx.try_recv() {
            debug!("Superseding fetch generation {}", command.generation);
            command = newer;
        }

        let result = fetch_records(&client, command.selector, command.date_range.as_ref());
        let update = FetchUpdate {
            generation: command.generation,
            result,
        };
        if update_tx.send(update).is_err() {
            break;
        }
    }
}
