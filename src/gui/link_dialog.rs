//! Manual link dialog.
//!
//! Lets an operator declare that an old ticket identifier and a new one
//! refer to the same issue. The call is write-through: nothing changes
//! locally until the gateway accepts it, and a failure is shown verbatim
//! with the inputs intact for retry.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui::{self, RichText};
use tracing::{info, warn};

use crate::api::GatewayClient;
use crate::config::GatewaySettings;

use super::app::DeckApp;
use super::theme;

/// State of the link dialog, including the in-flight call if any.
#[derive(Default)]
pub struct LinkDialog {
    pub open: bool,
    pub old_id: String,
    pub new_id: String,
    pub error: Option<String>,
    in_flight: bool,
    result_rx: Option<Receiver<Result<(), String>>>,
}

impl LinkDialog {
    pub fn show(&mut self) {
        self.open = true;
        self.error = None;
    }

    /// Validate and start the link call on a one-off thread.
    /// Empty identifiers never reach the network.
    pub fn submit(&mut self, settings: &GatewaySettings) {
        let old_id = self.old_id.trim().to_string();
        let new_id = self.new_id.trim().to_string();
        if old_id.is_empty() {
            self.error = Some("Old ticket id is required".to_string());
            return;
        }
        if new_id.is_empty() {
            self.error = Some("New ticket id is required".to_string());
            return;
        }

        self.error = None;
        self.in_flight = true;
        let (tx, rx) = mpsc::channel();
        self.result_rx = Some(rx);
        let client = GatewayClient::new(settings);
        thread::spawn(move || {
            let result = client
                .link_bugs(&old_id, &new_id)
                .map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
    }

    /// Poll the in-flight call. Returns true exactly once, when a link
    /// succeeded; the caller re-fetches on that signal.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.result_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(Ok(())) => {
                info!("Link accepted; refreshing");
                self.in_flight = false;
                self.result_rx = None;
                self.open = false;
                self.old_id.clear();
                self.new_id.clear();
                true
            }
            Ok(Err(error)) => {
                warn!("Link rejected: {}", error);
                self.in_flight = false;
                self.result_rx = None;
                self.error = Some(error);
                false
            }
            Err(mpsc::TryRecvError::Empty) => false,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.in_flight = false;
                self.result_rx = None;
                self.error = Some("Link call aborted".to_string());
                false
            }
        }
    }
}

impl DeckApp {
    pub(super) fn render_link_dialog(&mut self, ctx: &egui::Context) {
        if !self.link_dialog.open {
            return;
        }
        if self.link_dialog.in_flight {
            ctx.request_repaint_after(std::time::Duration::from_millis(150));
        }

        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Link tickets")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(theme::BG_HIGHLIGHT)
                    .inner_margin(20.0),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Declare two ticket ids as the same issue")
                        .color(theme::TEXT_PRIMARY),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label(RichText::new("Old ticket").color(theme::TEXT_DIM));
                    ui.text_edit_singleline(&mut self.link_dialog.old_id);
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new("New ticket").color(theme::TEXT_DIM));
                    ui.text_edit_singleline(&mut self.link_dialog.new_id);
                });

                if let Some(error) = &self.link_dialog.error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(error).color(theme::ACCENT_RED));
                }
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if self.link_dialog.in_flight {
                        ui.spinner();
                        ui.label(RichText::new("linking…").small().color(theme::TEXT_MUTED));
                    } else {
                        if ui
                            .button(RichText::new("Link").color(theme::ACCENT_CYAN))
                            .clicked()
                        {
                            submit = true;
                        }
                        if ui
                            .button(RichText::new("Cancel").color(theme::TEXT_MUTED))
                            .clicked()
                        {
                            cancel = true;
                        }
                    }
                });
            });

        if submit {
            let settings = self.config.gateway.clone();
            self.link_dialog.submit(&settings);
        }
        if cancel {
            self.link_dialog.open = false;
            self.link_dialog.error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_never_start_a_call() {
        let settings = GatewaySettings {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            read_timeout_secs: 1,
        };

        let mut dialog = LinkDialog::default();
        dialog.new_id = "SC-2".to_string();
        dialog.submit(&settings);
        assert!(dialog.error.is_some());
        assert!(!dialog.in_flight);

        dialog.error = None;
        dialog.old_id = "ZD-1".to_string();
        dialog.new_id = "   ".to_string();
        dialog.submit(&settings);
        assert!(dialog.error.is_some());
        assert!(!dialog.in_flight);
    }

    #[test]
    fn failed_link_keeps_inputs_for_retry() {
        let settings = GatewaySettings {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            read_timeout_secs: 1,
        };
        let mut dialog = LinkDialog::default();
        dialog.open = true;
        dialog.old_id = "ZD-1".to_string();
        dialog.new_id = "SC-2".to_string();
        dialog.submit(&settings);
        assert!(dialog.in_flight);

        // Nothing listens on port 1, so the call fails quickly.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(30);
        loop {
            if dialog.poll() {
                panic!("link against a dead port cannot succeed");
            }
            if !dialog.in_flight {
                break;
            }
            assert!(std::time::Instant::now() < deadline, "link never resolved");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(dialog.error.is_some());
        assert!(dialog.open);
        assert_eq!(dialog.old_id, "ZD-1");
        assert_eq!(dialog.new_id, "SC-2");
    }
}
