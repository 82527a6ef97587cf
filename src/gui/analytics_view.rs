//! Analytics view: summary cards, breakdowns, flow and resolution metrics.
//!
//! Everything here derives from the records already in memory; switching to
//! this view never triggers a network call.

use eframe::egui::{self, Color32, RichText, ScrollArea};

use crate::metrics::{flow_metrics, resolution_stats, summary_counts, ElapsedBucket};

use super::app::DeckApp;
use super::theme;

impl DeckApp {
    pub(crate) fn render_analytics(&mut self, ctx: &egui::Context) {
        let summary = summary_counts(&self.records);
        let flow = flow_metrics(&self.records);
        let resolution = resolution_stats(&self.records);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_PRIMARY)
                    .inner_margin(16.0),
            )
            .show(ctx, |ui| {
                ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    // Summary cards
                    ui.horizontal(|ui| {
                        summary_card(ui, "Records", &summary.total.to_string(), theme::TEXT_PRIMARY);
                        summary_card(
                            ui,
                            "Completed",
                            &resolution.distribution.total_completed.to_string(),
                            theme::ACCENT_GREEN,
                        );
                        summary_card(
                            ui,
                            "Conversion",
                            &format!("{:.1}%", flow.conversion_percent()),
                            theme::ACCENT_CYAN,
                        );
                        summary_card(
                            ui,
                            "Connected",
                            &format!("~{}", flow.connected()),
                            theme::ACCENT_PURPLE,
                        );
                    });
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!(
                            "Conversion: {} Shortcut stories from {} Slack/Zendesk reports. \
                             Connected is an approximation, not a tracked join.",
                            flow.downstream_count, flow.upstream_count
                        ))
                        .small()
                        .color(theme::TEXT_MUTED),
                    );

                    ui.add_space(16.0);
                    ui.columns(2, |columns| {
                        breakdown_section(&mut columns[0], "By source", || {
                            summary
                                .by_source
                                .iter()
                                .map(|(name, count)| {
                                    let color = theme::source_color(
                                        crate::domain::SourceSystem::parse(name),
                                    );
                                    (name.clone(), *count, color)
                                })
                                .collect()
                        });
                        breakdown_section(&mut columns[1], "By priority", || {
                            summary
                                .by_priority
                                .iter()
                                .map(|(name, count)| {
                                    (name.clone(), *count, theme::priority_color(name))
                                })
                                .collect()
                        });
                    });

                    ui.add_space(16.0);
                    self.render_resolution_section(ui, &resolution);
                });
            });
    }

    fn render_resolution_section(
        &self,
        ui: &mut egui::Ui,
        resolution: &crate::metrics::ResolutionStats,
    ) {
        section_frame(ui, "Resolution time (completed items)", |ui| {
            if resolution.distribution.total_completed == 0 {
                ui.label(
                    RichText::new("No completed items in the loaded set")
                        .color(theme::TEXT_MUTED),
                );
                return;
            }

            ui.horizontal(|ui| {
                stat_chip(ui, "avg", resolution.overall.avg_hours);
                stat_chip(ui, "median", resolution.overall.median_hours);
                stat_chip(ui, "min", resolution.overall.min_hours);
                stat_chip(ui, "max", resolution.overall.max_hours);
            });
            ui.add_space(10.0);

            // Elapsed-time distribution with percentage bars
            for bucket in ElapsedBucket::ALL {
                let count = resolution.distribution.count(bucket);
                let percent = resolution.distribution.percent(bucket);
                ui.horizontal(|ui| {
                    ui.add_sized(
                        [70.0, 16.0],
                        egui::Label::new(
                            RichText::new(bucket.label()).small().color(theme::TEXT_DIM),
                        ),
                    );
                    let bar_width = 220.0 * (percent / 100.0) as f32;
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(220.0, 10.0),
                        egui::Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 2.0, theme::BG_HIGHLIGHT);
                    if bar_width > 0.0 {
                        let filled =
                            egui::Rect::from_min_size(rect.min, egui::vec2(bar_width, 10.0));
                        ui.painter().rect_filled(filled, 2.0, theme::ACCENT_CYAN);
                    }
                    ui.label(
                        RichText::new(format!("{} ({:.1}%)", count, percent))
                            .small()
                            .color(theme::TEXT_DIM),
                    );
                });
            }

            ui.add_space(10.0);
            ui.label(RichText::new("By priority").small().color(theme::TEXT_MUTED));
            egui::Grid::new("resolution_by_priority")
                .num_columns(5)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for header in ["Priority", "Done", "Avg", "Median", "Max"] {
                        ui.label(RichText::new(header).small().color(theme::TEXT_MUTED));
                    }
                    ui.end_row();
                    for (priority, stats) in &resolution.by_priority {
                        ui.label(
                            RichText::new(priority).color(theme::priority_color(priority)),
                        );
                        ui.label(
                            RichText::new(stats.completed.to_string()).color(theme::TEXT_DIM),
                        );
                        ui.label(
                            RichText::new(format_hours(stats.avg_hours)).color(theme::TEXT_DIM),
                        );
                        ui.label(
                            RichText::new(format_hours(stats.median_hours))
                                .color(theme::TEXT_DIM),
                        );
                        ui.label(
                            RichText::new(format_hours(stats.max_hours)).color(theme::TEXT_DIM),
                        );
                        ui.end_row();
                    }
                });
        });
    }
}

/// Render a summary card with a label and a preformatted value.
fn summary_card(ui: &mut egui::Ui, label: &str, value: &str, value_color: Color32) {
    egui::Frame::NONE
        .fill(theme::BG_SECONDARY)
        .corner_radius(4.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(130.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(label).small().color(theme::TEXT_DIM));
                ui.label(RichText::new(value).size(18.0).color(value_color));
            });
        });
}

fn stat_chip(ui: &mut egui::Ui, label: &str, hours: f64) {
    egui::Frame::NONE
        .fill(theme::BG_HIGHLIGHT)
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).small().color(theme::TEXT_MUTED));
            ui.label(RichText::new(format_hours(hours)).color(theme::TEXT_PRIMARY));
        });
}

fn breakdown_section(
    ui: &mut egui::Ui,
    title: &str,
    entries: impl FnOnce() -> Vec<(String, u64, Color32)>,
) {
    section_frame(ui, title, |ui| {
        let entries = entries();
        if entries.is_empty() {
            ui.label(RichText::new("No data").color(theme::TEXT_MUTED));
            return;
        }
        for (name, count, color) in entries {
            ui.horizontal(|ui| {
                ui.label(RichText::new(name).color(color));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(count.to_string()).color(theme::TEXT_DIM));
                });
            });
        }
    });
}

fn section_frame(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::NONE
        .fill(theme::BG_SECONDARY)
        .corner_radius(4.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.label(RichText::new(title).color(theme::TEXT_PRIMARY));
            ui.add_space(6.0);
            add_contents(ui);
        });
}

fn format_hours(hours: f64) -> String {
    if hours >= 48.0 {
        format!("{:.1}d", hours / 24.0)
    } else {
        format!("{:.1}h", hours)
    }
}
