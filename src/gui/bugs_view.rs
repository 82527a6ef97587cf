//! Bug list view: filter bar, record table, pagination, detail panel.

use eframe::egui::{self, RichText, ScrollArea};
use egui_extras::{Column, TableBuilder};

use crate::domain::{BugRecord, SourceSystem};

use super::app::{DeckApp, SortColumn};
use super::theme;

/// One table row, flattened out of a `BugRecord` so rendering does not
/// hold borrows into the record set while the UI mutates app state.
struct Row {
    ticket: String,
    source: SourceSystem,
    priority: String,
    state: String,
    title: String,
    reporter: String,
    created: String,
}

impl Row {
    fn from_record(record: &BugRecord) -> Row {
        Row {
            ticket: record.ticket_id.clone(),
            source: record.source_system,
            priority: record.priority_label().to_string(),
            state: record.workflow_state().to_string(),
            title: record.title(),
            reporter: record.reporter_display(),
            created: record
                .created_at()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| record.created_at_raw.clone()),
        }
    }
}

impl DeckApp {
    pub(crate) fn render_bugs(&mut self, ctx: &egui::Context) {
        let visible = self.visible_records();
        let total_matching = visible.len();
        let page_size = self.config.gui.page_size.max(1);
        let page_count = total_matching.div_ceil(page_size).max(1);
        let page = self.page.min(page_count - 1);

        let rows: Vec<Row> = visible
            .iter()
            .skip(page * page_size)
            .take(page_size)
            .map(|r| Row::from_record(r))
            .collect();

        let detail = self
            .selected_ticket
            .as_ref()
            .and_then(|ticket| {
                visible
                    .iter()
                    .find(|r| &r.ticket_id == ticket)
                    .map(|r| (*r).clone())
            });
        drop(visible);
        self.page = page;

        if let Some(record) = &detail {
            self.render_detail_panel(ctx, record);
        }

        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_PRIMARY)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                self.render_filter_bar(ui);
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "{} of {} records match",
                            total_matching,
                            self.records.len()
                        ))
                        .small()
                        .color(theme::TEXT_MUTED),
                    );
                    if self.tally.total_contaminated() > 0 {
                        ui.label(
                            RichText::new(format!(
                                "{} dropped for source mismatch",
                                self.tally.total_contaminated()
                            ))
                            .small()
                            .color(theme::ACCENT_YELLOW),
                        );
                    }
                });
                ui.add_space(4.0);
                ui.separator();

                if rows.is_empty() {
                    ui.add_space(24.0);
                    ui.vertical_centered(|ui| {
                        let message = if self.records.is_empty() && self.loading {
                            "Loading records…"
                        } else if self.records.is_empty() {
                            "No records fetched yet"
                        } else {
                            "No records match the active filters"
                        };
                        ui.label(RichText::new(message).color(theme::TEXT_DIM));
                    });
                } else {
                    self.render_table(ui, &rows);
                }

                ui.add_space(8.0);
                self.render_pagination(ui, page_count, total_matching);
            });
    }

    fn render_filter_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Search").small().color(theme::TEXT_DIM));
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.filter.search)
                    .hint_text("ticket, title, body, people")
                    .desired_width(220.0),
            );
            if response.changed() {
                self.page = 0;
            }

            ui.add_space(12.0);
            ui.label(RichText::new("Priority").small().color(theme::TEXT_DIM));
            let selected = self.filter.priority.clone().unwrap_or_else(|| "All".into());
            egui::ComboBox::from_id_salt("priority_filter")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.filter.priority.is_none(), "All")
                        .clicked()
                    {
                        self.filter.priority = None;
                        self.page = 0;
                    }
                    for option in self.priority_options() {
                        let active = self.filter.priority.as_deref() == Some(option.as_str());
                        if ui.selectable_label(active, &option).clicked() {
                            self.filter.priority = Some(option.clone());
                            self.page = 0;
                        }
                    }
                });

            ui.add_space(12.0);
            ui.label(RichText::new("State").small().color(theme::TEXT_DIM));
            let selected = self.filter.state.clone().unwrap_or_else(|| "All".into());
            egui::ComboBox::from_id_salt("state_filter")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.filter.state.is_none(), "All")
                        .clicked()
                    {
                        self.filter.state = None;
                        self.page = 0;
                    }
                    for option in self.state_options() {
                        let active = self.filter.state.as_deref() == Some(option.as_str());
                        if ui.selectable_label(active, &option).clicked() {
                            self.filter.state = Some(option.clone());
                            self.page = 0;
                        }
                    }
                });

            ui.add_space(12.0);
            ui.label(RichText::new("From").small().color(theme::TEXT_DIM));
            ui.add(
                egui::TextEdit::singleline(&mut self.start_input)
                    .hint_text("YYYY-MM-DD")
                    .desired_width(90.0),
            );
            ui.label(RichText::new("to").small().color(theme::TEXT_DIM));
            ui.add(
                egui::TextEdit::singleline(&mut self.end_input)
                    .hint_text("YYYY-MM-DD")
                    .desired_width(90.0),
            );
            if ui.button(RichText::new("Apply").color(theme::TEXT_DIM)).clicked() {
                self.apply_date_range();
            }
            if let Some(error) = &self.date_error {
                ui.label(RichText::new(error).small().color(theme::ACCENT_RED));
            }
        });
    }

    fn render_table(&mut self, ui: &mut egui::Ui, rows: &[Row]) {
        let mut clicked: Option<String> = None;
        let mut sort_clicked: Option<SortColumn> = None;

        let sort_label = |label: &str, column: SortColumn, sort: Option<(SortColumn, bool)>| {
            let marker = match sort {
                Some((c, true)) if c == column => " ▲",
                Some((c, false)) if c == column => " ▼",
                _ => "",
            };
            format!("{}{}", label, marker)
        };
        let sort = self.sort;

        TableBuilder::new(ui)
            .striped(true)
            .sense(egui::Sense::click())
            .column(Column::auto().at_least(140.0)) // ticket
            .column(Column::auto().at_least(80.0)) // source
            .column(Column::auto().at_least(80.0)) // priority
            .column(Column::auto().at_least(100.0)) // state
            .column(Column::remainder()) // title
            .column(Column::auto().at_least(110.0)) // reporter
            .column(Column::auto().at_least(120.0)) // created
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.label(RichText::new("Ticket").small().color(theme::TEXT_DIM));
                });
                header.col(|ui| {
                    if ui
                        .button(
                            RichText::new(sort_label("Source", SortColumn::Source, sort))
                                .small()
                                .color(theme::TEXT_DIM),
                        )
                        .clicked()
                    {
                        sort_clicked = Some(SortColumn::Source);
                    }
                });
                header.col(|ui| {
                    if ui
                        .button(
                            RichText::new(sort_label("Priority", SortColumn::Priority, sort))
                                .small()
                                .color(theme::TEXT_DIM),
                        )
                        .clicked()
                    {
                        sort_clicked = Some(SortColumn::Priority);
                    }
                });
                header.col(|ui| {
                    ui.label(RichText::new("State").small().color(theme::TEXT_DIM));
                });
                header.col(|ui| {
                    ui.label(RichText::new("Title").small().color(theme::TEXT_DIM));
                });
                header.col(|ui| {
                    ui.label(RichText::new("Reporter").small().color(theme::TEXT_DIM));
                });
                header.col(|ui| {
                    if ui
                        .button(
                            RichText::new(sort_label("Created", SortColumn::Created, sort))
                                .small()
                                .color(theme::TEXT_DIM),
                        )
                        .clicked()
                    {
                        sort_clicked = Some(SortColumn::Created);
                    }
                });
            })
            .body(|body| {
                body.rows(20.0, rows.len(), |mut table_row| {
                    let row = &rows[table_row.index()];
                    let selected = self.selected_ticket.as_deref() == Some(row.ticket.as_str());
                    table_row.set_selected(selected);

                    table_row.col(|ui| {
                        ui.label(
                            RichText::new(&row.ticket)
                                .monospace()
                                .color(theme::TEXT_PRIMARY),
                        );
                    });
                    table_row.col(|ui| {
                        ui.label(
                            RichText::new(row.source.label())
                                .color(theme::source_color(row.source)),
                        );
                    });
                    table_row.col(|ui| {
                        ui.label(
                            RichText::new(&row.priority)
                                .color(theme::priority_color(&row.priority)),
                        );
                    });
                    table_row.col(|ui| {
                        ui.label(RichText::new(&row.state).color(theme::TEXT_DIM));
                    });
                    table_row.col(|ui| {
                        ui.label(RichText::new(&row.title).color(theme::TEXT_PRIMARY));
                    });
                    table_row.col(|ui| {
                        ui.label(RichText::new(&row.reporter).color(theme::TEXT_DIM));
                    });
                    table_row.col(|ui| {
                        ui.label(RichText::new(&row.created).small().color(theme::TEXT_MUTED));
                    });

                    if table_row.response().clicked() {
                        clicked = Some(row.ticket.clone());
                    }
                });
            });

        if let Some(column) = sort_clicked {
            self.toggle_sort(column);
        }
        if let Some(ticket) = clicked {
            if self.selected_ticket.as_deref() == Some(ticket.as_str()) {
                self.selected_ticket = None;
            } else {
                self.selected_ticket = Some(ticket);
            }
        }
    }

    fn render_pagination(&mut self, ui: &mut egui::Ui, page_count: usize, total: usize) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.page > 0, egui::Button::new("◀ Prev"))
                .clicked()
            {
                self.page -= 1;
            }
            ui.label(
                RichText::new(format!("Page {} / {}", self.page + 1, page_count))
                    .small()
                    .color(theme::TEXT_DIM),
            );
            if ui
                .add_enabled(self.page + 1 < page_count, egui::Button::new("Next ▶"))
                .clicked()
            {
                self.page += 1;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{} total", total))
                        .small()
                        .color(theme::TEXT_MUTED),
                );
            });
        });
    }

    fn render_detail_panel(&mut self, ctx: &egui::Context, record: &BugRecord) {
        egui::SidePanel::right("detail_panel")
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_SECONDARY)
                    .inner_margin(12.0),
            )
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(&record.ticket_id)
                            .monospace()
                            .color(theme::ACCENT_CYAN),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(RichText::new("✕").color(theme::TEXT_MUTED)).clicked() {
                            self.selected_ticket = None;
                        }
                    });
                });
                ui.separator();

                ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    ui.label(RichText::new(record.title()).color(theme::TEXT_PRIMARY).size(15.0));
                    ui.add_space(8.0);

                    detail_line(ui, "Source", record.source_system.label());
                    detail_line(ui, "Priority", record.priority_label());
                    detail_line(ui, "State", record.workflow_state());
                    detail_line(ui, "Reporter", &record.reporter_display());
                    if !record.assignee.is_absent() {
                        detail_line(ui, "Assignee", &record.assignee.display());
                    }
                    detail_line(ui, "Created", &record.created_at_raw);
                    detail_line(ui, "Updated", &record.updated_at_raw);
                    if !record.tags.is_empty() {
                        detail_line(ui, "Tags", &record.tags.join(", "));
                    }

                    let body = record.body();
                    if !body.is_empty() {
                        ui.add_space(8.0);
                        ui.separator();
                        ui.label(RichText::new(body).color(theme::TEXT_DIM));
                    }
                });
            });
    }
}

fn detail_line(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).small().color(theme::TEXT_MUTED));
        ui.label(RichText::new(value).color(theme::TEXT_DIM));
    });
}
