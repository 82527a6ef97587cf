//! Color theme for the dashboard.

use eframe::egui::Color32;

/// Background: deep charcoal
pub const BG_PRIMARY: Color32 = Color32::from_rgb(18, 20, 24);
/// Secondary background for panels and cards
pub const BG_SECONDARY: Color32 = Color32::from_rgb(24, 28, 34);
/// Accent highlight background
pub const BG_HIGHLIGHT: Color32 = Color32::from_rgb(32, 40, 52);

/// Primary text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(220, 223, 228);
/// Secondary text
pub const TEXT_DIM: Color32 = Color32::from_rgb(150, 155, 165);
/// Muted text
pub const TEXT_MUTED: Color32 = Color32::from_rgb(95, 100, 110);

/// Accent colors
pub const ACCENT_CYAN: Color32 = Color32::from_rgb(0, 200, 220);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(80, 220, 120);
pub const ACCENT_YELLOW: Color32 = Color32::from_rgb(230, 200, 60);
pub const ACCENT_RED: Color32 = Color32::from_rgb(240, 90, 90);
pub const ACCENT_PURPLE: Color32 = Color32::from_rgb(190, 120, 255);

/// Per-source accent, used for table badges and the by-source cards.
pub fn source_color(source: crate::domain::SourceSystem) -> Color32 {
    use crate::domain::SourceSystem;
    match source {
        SourceSystem::Slack => ACCENT_PURPLE,
        SourceSystem::Zendesk => ACCENT_GREEN,
        SourceSystem::Shortcut => ACCENT_CYAN,
        SourceSystem::Unknown => TEXT_MUTED,
    }
}

/// Priority tint. Vocabularies are source-native, so this matches loosely
/// on the usual words and falls back to dim for anything else.
pub fn priority_color(priority: &str) -> Color32 {
    let p = priority.to_lowercase();
    if p.contains("critical") || p.contains("urgent") || p.contains("p0") {
        ACCENT_RED
    } else if p.contains("high") {
        ACCENT_YELLOW
    } else if p.contains("medium") || p.contains("normal") {
        ACCENT_CYAN
    } else if p.contains("low") {
        ACCENT_GREEN
    } else {
        TEXT_DIM
    }
}
