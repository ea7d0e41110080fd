//! Plain-text layout of cards, settings, presets, and community listings.
//!
//! Only layout lives here; what to show is decided by
//! [`widgetdash_core::render`].

use std::fmt::Write as _;

use widgetdash_core::editor::COLOR_PRESETS;
use widgetdash_core::render::{DataView, WidgetCard, LOADING_TEXT};
use widgetdash_core::settings::Settings;
use widgetdash_sync::CommunityListing;

const EMPTY_DASHBOARD: &str = "No widgets yet. Add one with `widgetdash add` or `widgetdash install`.";

/// Lines of the data area, without the card frame.
pub fn data_lines(view: &DataView) -> Vec<String> {
    match view {
        DataView::Loading => vec![LOADING_TEXT.to_string()],
        DataView::Error { message } => vec![format!("Error: {message}")],
        DataView::PlainText { text } | DataView::Scalar { text } => {
            text.lines().map(str::to_string).collect()
        }
        DataView::Fields { rows } => rows
            .iter()
            .map(|row| format!("{}: {}", row.label, row.value))
            .collect(),
        DataView::JsonPreview { preview } => preview.display().lines().map(str::to_string).collect(),
    }
}

pub fn card(card: &WidgetCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==  [{}]", card.title, card.id);

    let mut style = format!("title {}", card.style.title_color);
    if let Some(bg) = &card.style.background {
        let _ = write!(style, ", background {bg}");
    }
    if let Some(overlay) = card.style.overlay {
        let _ = write!(style, ", dimmed by {overlay}");
    }
    let _ = writeln!(out, "   ({style})");

    for line in data_lines(&card.body) {
        let _ = writeln!(out, "   {line}");
    }
    if let Some(at) = &card.last_updated {
        let _ = writeln!(out, "   Last updated: {at}");
    }
    out
}

pub fn dashboard(cards: &[WidgetCard]) -> String {
    if cards.is_empty() {
        return format!("{EMPTY_DASHBOARD}\n");
    }
    cards.iter().map(card).collect::<Vec<_>>().join("\n")
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

pub fn settings(settings: &Settings) -> String {
    format!(
        "auto-refresh      {}\ndark-mode         {}\nrefresh-interval  {}s\n",
        on_off(settings.auto_refresh),
        on_off(settings.dark_mode),
        settings.refresh_interval,
    )
}

pub fn presets(dark_mode: bool) -> String {
    COLOR_PRESETS
        .iter()
        .map(|p| {
            format!(
                "{:<8} background {:<10} text {:<10} label {}\n",
                p.name,
                p.background,
                p.text,
                p.label_color(dark_mode)
            )
        })
        .collect()
}

pub fn community(category: &str, listings: &[CommunityListing]) -> String {
    if listings.is_empty() {
        return format!("No community widgets in {category}.\n");
    }
    let mut out = String::new();
    for listing in listings {
        let w = &listing.widget;
        let badge = if listing.installed { "  [installed]" } else { "" };
        let _ = writeln!(out, "{}{badge}", w.title);
        if !w.description.is_empty() {
            let _ = writeln!(out, "   {}", w.description);
        }
        let category = if w.category.is_empty() {
            "Uncategorized"
        } else {
            w.category.as_str()
        };
        let author = if w.author.is_empty() {
            "unknown"
        } else {
            w.author.as_str()
        };
        let _ = writeln!(
            out,
            "   {category} | by {author} | every {}s | {} field(s)",
            w.refresh_interval,
            w.fields.len()
        );
    }
    out
}
