//! Main dashboard application state.
//!
//! One `DeckApp` per window. All record data lives here; the fetch worker
//! thread owns the network and talks to the app over mpsc channels. Every
//! fetch carries a generation number and the app ignores updates for any
//! generation but the newest, so a slow response can never clobber the
//! state of a newer request.

use std::collections::BTreeSet;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use eframe::egui::{self, RichText};
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{BugRecord, DateRange, SourceFilter, SourceSystem};
use crate::fetch::{FetchCommand, FetchUpdate, SourceTally};
use crate::filter::FilterState;

use super::link_dialog::LinkDialog;
use super::theme;

/// View mode for the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Merged bug table with filters
    Bugs,
    /// Flow and resolution analytics
    Analytics,
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Created,
    Updated,
    Priority,
    Source,
}

/// Main application state
pub struct DeckApp {
    pub(super) config: Config,

    /// Merged record set from the last completed fetch.
    pub(super) records: Vec<BugRecord>,
    pub(super) tally: SourceTally,
    pub(super) fetch_failures: Vec<(SourceSystem, String)>,

    /// Active filter predicates.
    pub(super) filter: FilterState,

    /// Commands to the fetch worker.
    command_tx: Sender<FetchCommand>,
    /// Updates back from the fetch worker.
    update_rx: Receiver<FetchUpdate>,
    /// Generation of the newest fetch we issued. Updates tagged with an
    /// older generation are stale and dropped.
    generation: u64,
    pub(super) loading: bool,
    /// Banner error when a fetch failed completely; cleared on retry.
    pub(super) last_error: Option<String>,
    last_refresh: Option<Instant>,

    pub(super) view_mode: ViewMode,
    pub(super) sort: Option<(SortColumn, bool)>,
    pub(super) page: usize,
    pub(super) selected_ticket: Option<String>,

    /// Date-range text inputs ("YYYY-MM-DD"); applied on demand.
    pub(super) start_input: String,
    pub(super) end_input: String,
    pub(super) date_error: Option<String>,

    pub(super) link_dialog: LinkDialog,
}

impl DeckApp {
    pub fn new(
        config: Config,
        command_tx: Sender<FetchCommand>,
        update_rx: Receiver<FetchUpdate>,
    ) -> Self {
        let mut app = Self {
            config,
            records: Vec::new(),
            tally: SourceTally::default(),
            fetch_failures: Vec::new(),
            filter: FilterState::default(),
            command_tx,
            update_rx,
            generation: 0,
            loading: false,
            last_error: None,
            last_refresh: None,
            view_mode: ViewMode::Bugs,
            sort: None,
            page: 0,
            selected_ticket: None,
            start_input: String::new(),
            end_input: String::new(),
            date_error: None,
            link_dialog: LinkDialog::default(),
        };
        app.request_fetch();
        app
    }

    /// Issue a fetch for the current selector and date range, superseding
    /// anything in flight.
    pub(super) fn request_fetch(&mut self) {
        self.generation += 1;
        self.loading = true;
        self.last_error = None;
        let command = FetchCommand {
            generation: self.generation,
            selector: self.filter.source,
            date_range: self.filter.date_range,
        };
        debug!("Requesting fetch generation {}", command.generation);
        if self.command_tx.send(command).is_err() {
            self.loading = false;
            self.last_error = Some("Fetch worker is gone; restart the app".to_string());
        }
        self.last_refresh = Some(Instant::now());
    }

    /// Change the source selector. Per the filter contract this resets the
    /// other predicates and re-fetches: a priority or state picked for one
    /// source's vocabulary would silently empty the view under another.
    pub(super) fn set_source(&mut self, selector: SourceFilter) {
        if self.filter.source == selector {
            return;
        }
        info!("Source changed to {}", selector.label());
        self.filter.reset_for_source(selector);
        self.page = 0;
        self.selected_ticket = None;
        self.request_fetch();
    }

    /// Parse and apply the date-range inputs, then re-fetch. Empty inputs
    /// clear the range.
    pub(super) fn apply_date_range(&mut self) {
        self.date_error = None;
        let start = self.start_input.trim();
        let end = self.end_input.trim();
        if start.is_empty() && end.is_empty() {
            if self.filter.date_range.take().is_some() {
                self.request_fetch();
            }
            return;
        }
        match DateRange::parse(start, end) {
            Some(range) => {
                self.filter.date_range = Some(range);
                self.page = 0;
                self.request_fetch();
            }
            None => {
                self.date_error = Some("Dates must be YYYY-MM-DD".to_string());
            }
        }
    }

    /// Drain worker updates, applying only the newest generation.
    fn poll_updates(&mut self) {
        while let Ok(update) = self.update_rx.try_recv() {
            if update.generation != self.generation {
                debug!(
                    "Dropping stale fetch update (generation {} != {})",
                    update.generation, self.generation
                );
                continue;
            }
            self.loading = false;
            let result = update.result;
            if result.is_total_failure() {
                let detail = result
                    .failures
                    .iter()
                    .map(|(s, e)| format!("{}: {}", s.label(), e))
                    .collect::<Vec<_>>()
                    .join("; ");
                self.last_error = Some(detail);
                // Keep whatever was on screen; the banner offers a retry.
                continue;
            }
            self.records = result.records;
            self.tally = result.tally;
            self.fetch_failures = result.failures;
            if self.page * self.config.gui.page_size >= self.records.len() {
                self.page = 0;
            }
        }
    }

    /// Priority values present in the loaded set, for the filter dropdown.
    pub(super) fn priority_options(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .records
            .iter()
            .map(|r| r.priority_label().to_string())
            .collect();
        set.into_iter().collect()
    }

    /// Workflow states present in the loaded set.
    pub(super) fn state_options(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for record in &self.records {
            if let Some(state) = record.state.as_deref() {
                set.insert(state.to_string());
            }
            if let Some(status) = record.status.as_deref() {
                set.insert(status.to_string());
            }
        }
        set.into_iter().collect()
    }

    /// Filtered and sorted view of the loaded records.
    pub(super) fn visible_records(&self) -> Vec<&BugRecord> {
        let mut visible = self.filter.apply(&self.records);
        if let Some((column, ascending)) = self.sort {
            visible.sort_by(|a, b| {
                let ord = match column {
                    SortColumn::Created => a.created_at().cmp(&b.created_at()),
                    SortColumn::Updated => a.updated_at().cmp(&b.updated_at()),
                    SortColumn::Priority => {
                        priority_rank(a.priority_label()).cmp(&priority_rank(b.priority_label()))
                    }
                    SortColumn::Source => a.source_system.as_str().cmp(b.source_system.as_str()),
                };
                if ascending { ord } else { ord.reverse() }
            });
        }
        visible
    }

    /// Toggle sorting on a column: ascending, then descending, then off.
    pub(super) fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, true)) if current == column => Some((column, false)),
            Some((current, false)) if current == column => None,
            _ => Some((column, true)),
        };
        self.page = 0;
    }

    fn auto_refresh_due(&self) -> bool {
        let interval = self.config.gui.refresh_secs;
        if interval == 0 || self.loading {
            return false;
        }
        match self.last_refresh {
            Some(at) => at.elapsed().as_secs() >= interval,
            None => true,
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(egui::Frame::NONE.fill(theme::BG_SECONDARY).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("BUGDECK")
                            .monospace()
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.add_space(16.0);

                    for (mode, label) in
                        [(ViewMode::Bugs, "Bugs"), (ViewMode::Analytics, "Analytics")]
                    {
                        let selected = self.view_mode == mode;
                        let text = if selected {
                            RichText::new(label).color(theme::ACCENT_CYAN)
                        } else {
                            RichText::new(label).color(theme::TEXT_MUTED)
                        };
                        if ui.add(egui::Button::new(text).frame(false)).clicked() {
                            self.view_mode = mode;
                        }
                    }

                    ui.add_space(16.0);
                    self.render_source_selector(ui);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(RichText::new("⟳ Refresh").color(theme::TEXT_DIM))
                            .clicked()
                        {
                            self.request_fetch();
                        }
                        if ui
                            .button(RichText::new("🔗 Link tickets").color(theme::TEXT_DIM))
                            .clicked()
                        {
                            self.link_dialog.show();
                        }
                        if self.loading {
                            ui.spinner();
                            ui.label(RichText::new("loading…").small().color(theme::TEXT_MUTED));
                        }
                    });
                });
            });
    }

    fn render_source_selector(&mut self, ui: &mut egui::Ui) {
        let mut selector = self.filter.source;
        egui::ComboBox::from_id_salt("source_selector")
            .selected_text(selector.label())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selector, SourceFilter::All, "All sources");
                for source in SourceSystem::ALL {
                    ui.selectable_value(&mut selector, SourceFilter::Only(source), source.label());
                }
            });
        self.set_source(selector);
    }

    fn render_error_banner(&mut self, ctx: &egui::Context) {
        let Some(error) = self.last_error.clone() else {
            return;
        };
        egui::TopBottomPanel::top("error_banner")
            .frame(egui::Frame::NONE.fill(theme::BG_HIGHLIGHT).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(theme::ACCENT_RED));
                    ui.label(
                        RichText::new(format!("Fetch failed: {}", error))
                            .color(theme::TEXT_PRIMARY),
                    );
                    if ui
                        .button(RichText::new("Retry").color(theme::ACCENT_CYAN))
                        .clicked()
                    {
                        self.request_fetch();
                    }
                    if ui
                        .button(RichText::new("Dismiss").color(theme::TEXT_MUTED))
                        .clicked()
                    {
                        self.last_error = None;
                    }
                });
            });
    }

    fn render_degraded_notice(&self, ctx: &egui::Context) {
        if self.fetch_failures.is_empty() {
            return;
        }
        let failed: Vec<&str> = self
            .fetch_failures
            .iter()
            .map(|(s, _)| s.label())
            .collect();
        egui::TopBottomPanel::bottom("degraded_notice")
            .frame(egui::Frame::NONE.fill(theme::BG_SECONDARY).inner_margin(6.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!(
                        "Partial data: {} unavailable this fetch",
                        failed.join(", ")
                    ))
                    .small()
                    .color(theme::ACCENT_YELLOW),
                );
            });
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_updates();
        let link_completed = self.link_dialog.poll();
        if link_completed {
            // Successful link: re-fetch so the merged view reflects it.
            self.request_fetch();
        }
        if self.auto_refresh_due() {
            self.request_fetch();
        }
        if self.loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(150));
        }

        self.render_top_bar(ctx);
        self.render_error_banner(ctx);
        self.render_degraded_notice(ctx);

        match self.view_mode {
            ViewMode::Bugs => self.render_bugs(ctx),
            ViewMode::Analytics => self.render_analytics(ctx),
        }

        self.render_link_dialog(ctx);
    }
}

/// Rough ordering for priority sorting across source-native vocabularies.
/// Unrecognized labels sort last, after Low.
pub(super) fn priority_rank(priority: &str) -> u8 {
    let p = priority.to_lowercase();
    if p.contains("critical") || p.contains("urgent") || p.contains("p0") {
        0
    } else if p.contains("high") {
        1
    } else if p.contains("medium") || p.contains("normal") {
        2
    } else if p.contains("low") {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MergedFetch;
    use std::sync::mpsc;

    fn test_app() -> (DeckApp, Receiver<FetchCommand>, Sender<FetchUpdate>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (update_tx, update_rx) = mpsc::channel();
        let app = DeckApp::new(Config::default(), command_tx, update_rx);
        (app, command_rx, update_tx)
    }

    #[test]
    fn stale_generation_updates_are_dropped() {
        let (mut app, command_rx, update_tx) = test_app();
        let issued = command_rx.recv().unwrap();
        assert_eq!(issued.generation, 1);
        assert!(app.loading);

        let record: BugRecord =
            serde_json::from_str(r#"{"PK": "ZD-9", "sourceSystem": "zendesk"}"#).unwrap();
        let stale = MergedFetch {
            records: vec![record],
            ..MergedFetch::default()
        };
        update_tx
            .send(FetchUpdate {
                generation: 0,
                result: stale,
            })
            .unwrap();
        app.poll_updates();
        assert!(app.records.is_empty(), "stale result must not apply");
        assert!(app.loading, "stale result must not clear the spinner");

        update_tx
            .send(FetchUpdate {
                generation: 1,
                result: MergedFetch::default(),
            })
            .unwrap();
        app.poll_updates();
        assert!(!app.loading);
    }

    #[test]
    fn total_failure_keeps_previous_records_and_sets_banner() {
        let (mut app, _command_rx, update_tx) = test_app();
        let record: BugRecord =
            serde_json::from_str(r#"{"PK": "SC-4", "sourceSystem": "shortcut"}"#).unwrap();
        update_tx
            .send(FetchUpdate {
                generation: 1,
                result: MergedFetch {
                    records: vec![record],
                    ..MergedFetch::default()
                },
            })
            .unwrap();
        app.poll_updates();
        assert_eq!(app.records.len(), 1);

        app.request_fetch();
        update_tx
            .send(FetchUpdate {
                generation: 2,
                result: MergedFetch {
                    failures: vec![(SourceSystem::Shortcut, "connection refused".into())],
                    ..MergedFetch::default()
                },
            })
            .unwrap();
        app.poll_updates();
        assert_eq!(app.records.len(), 1, "failed fetch must not clear the view");
        assert!(app.last_error.is_some());
    }

    #[test]
    fn priority_rank_orders_common_vocabularies() {
        assert!(priority_rank("Critical") < priority_rank("High"));
        assert!(priority_rank("P0 Critical") < priority_rank("High"));
        assert!(priority_rank("High") < priority_rank("Medium"));
        assert!(priority_rank("Medium") < priority_rank("Low"));
        assert!(priority_rank("Low") < priority_rank("Unknown"));
    }
}
