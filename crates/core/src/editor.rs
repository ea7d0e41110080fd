//! Create/edit form payloads, presence validation, and color presets.

use crate::color::is_light;
use crate::error::CoreError;
use crate::types::{new_id, WidgetId};
use crate::widget::{FieldType, Widget, WidgetData, WidgetField, DEFAULT_REFRESH_INTERVAL_SECS};

/// Refresh interval pre-filled in a fresh form.
pub const FORM_REFRESH_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#1e293b";

/// Swatch label color used on light presets in dark mode.
pub const DARK_SWATCH_LABEL_COLOR: &str = "#18181b";

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

pub const COLOR_PRESETS: &[ColorPreset] = &[
    ColorPreset {
        name: "Pink",
        background: "#c7036fff",
        text: "#ffffffff",
    },
    ColorPreset {
        name: "Blue",
        background: "#3B82F6",
        text: "#ffffff",
    },
    ColorPreset {
        name: "Teal",
        background: "#14B8A6",
        text: "#ffffff",
    },
    ColorPreset {
        name: "Orange",
        background: "#F97316",
        text: "#ffffff",
    },
    ColorPreset {
        name: "Red",
        background: "#a10137ff",
        text: "#ffffff",
    },
];

impl ColorPreset {
    /// Label color that stays readable on this swatch under the current theme.
    pub fn label_color(&self, dark_mode: bool) -> &'static str {
        if !dark_mode || !is_light(self.background) {
            self.text
        } else {
            DARK_SWATCH_LABEL_COLOR
        }
    }
}

pub fn find_preset(name: &str) -> Option<&'static ColorPreset> {
    COLOR_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// The contents of the create/edit form.
///
/// A draft with an `id` edits that widget; without one it creates a new
/// widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDraft {
    pub id: Option<WidgetId>,
    pub title: String,
    pub api_url: String,
    pub refresh_interval: Option<u64>,
    pub background_color: String,
    pub text_color: String,
    pub fields: Vec<WidgetField>,
}

impl Default for WidgetDraft {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            api_url: String::new(),
            refresh_interval: Some(FORM_REFRESH_INTERVAL_SECS),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            fields: Vec::new(),
        }
    }
}

impl WidgetDraft {
    /// Pre-fill the form from an existing widget for editing.
    pub fn from_widget(widget: &Widget) -> Self {
        Self {
            id: Some(widget.id.clone()),
            title: widget.title.clone(),
            api_url: widget.api_url.clone(),
            refresh_interval: Some(widget.refresh_interval),
            background_color: widget.background_color.clone(),
            text_color: widget.text_color.clone(),
            fields: widget.fields.clone(),
        }
    }

    /// Title and API URL must be non-blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() || self.api_url.trim().is_empty() {
            return Err(CoreError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        Ok(())
    }

    /// Append a projected field. Label and key must be non-blank.
    pub fn add_field(
        &mut self,
        label: &str,
        key: &str,
        field_type: FieldType,
    ) -> Result<&WidgetField, CoreError> {
        if label.trim().is_empty() || key.trim().is_empty() {
            return Err(CoreError::Validation(
                "Field label and key are required".to_string(),
            ));
        }
        self.fields.push(WidgetField::new(label, key, field_type));
        Ok(&self.fields[self.fields.len() - 1])
    }

    pub fn remove_field(&mut self, field_id: &str) {
        self.fields.retain(|f| f.id != field_id);
    }

    pub fn apply_preset(&mut self, preset: &ColorPreset) {
        self.background_color = preset.background.to_string();
        self.text_color = preset.text.to_string();
    }

    /// Validate and build the widget to save.
    ///
    /// Title and URL are trimmed; a missing or zero interval becomes the
    /// default. The result carries no data, so the next refresh fetches it.
    pub fn into_widget(self) -> Result<Widget, CoreError> {
        self.validate()?;
        Ok(Widget {
            id: self.id.unwrap_or_else(new_id),
            title: self.title.trim().to_string(),
            api_url: self.api_url.trim().to_string(),
            refresh_interval: self
                .refresh_interval
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS),
            background_color: self.background_color,
            text_color: self.text_color,
            fields: self.fields,
            data: WidgetData::Loading,
            last_updated: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn draft(title: &str, url: &str) -> WidgetDraft {
        WidgetDraft {
            title: title.to_string(),
            api_url: url.to_string(),
            ..WidgetDraft::default()
        }
    }

    #[test]
    fn blank_title_or_url_is_rejected() {
        assert_matches!(draft("  ", "https://x").into_widget(), Err(CoreError::Validation(_)));
        assert_matches!(draft("T", "").into_widget(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn new_draft_gets_fresh_id_and_trimmed_values() {
        let w = draft("  Weather ", " https://example.com ").into_widget().unwrap();
        assert!(!w.id.is_empty());
        assert_eq!(w.title, "Weather");
        assert_eq!(w.api_url, "https://example.com");
        assert_eq!(w.refresh_interval, FORM_REFRESH_INTERVAL_SECS);
        assert_eq!(w.background_color, DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn zero_or_missing_interval_falls_back() {
        let mut d = draft("T", "u");
        d.refresh_interval = Some(0);
        assert_eq!(d.clone().into_widget().unwrap().refresh_interval, 30);
        d.refresh_interval = None;
        assert_eq!(d.into_widget().unwrap().refresh_interval, 30);
    }

    #[test]
    fn edit_draft_keeps_id() {
        let original = draft("T", "u").into_widget().unwrap();
        let mut edit = WidgetDraft::from_widget(&original);
        edit.title = "Renamed".to_string();
        let saved = edit.into_widget().unwrap();
        assert_eq!(saved.id, original.id);
        assert_eq!(saved.title, "Renamed");
    }

    #[test]
    fn fields_require_label_and_key() {
        let mut d = draft("T", "u");
        assert!(d.add_field("", "k", FieldType::Text).is_err());
        let id = d.add_field("Temp", "temp", FieldType::Number).unwrap().id.clone();
        d.add_field("Wind", "wind", FieldType::Text).unwrap();
        assert_eq!(d.fields.len(), 2);
        d.remove_field(&id);
        assert_eq!(d.fields.len(), 1);
        assert_eq!(d.fields[0].label, "Wind");
    }

    #[test]
    fn presets_and_swatch_labels() {
        let blue = find_preset("blue").unwrap();
        let mut d = draft("T", "u");
        d.apply_preset(blue);
        assert_eq!(d.background_color, "#3B82F6");
        assert_eq!(d.text_color, "#ffffff");

        for preset in COLOR_PRESETS {
            assert_eq!(preset.label_color(false), preset.text);
            // None of the shipped presets is light.
            assert_eq!(preset.label_color(true), preset.text);
        }

        let light = ColorPreset { name: "Paper", background: "#fafafa", text: "#ffffff" };
        assert_eq!(light.label_color(true), DARK_SWATCH_LABEL_COLOR);
    }
}
