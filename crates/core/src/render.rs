//! Field projection and the per-widget display decision.
//!
//! [`render_data`] turns a widget's payload and field list into a
//! [`DataView`], a presentation-neutral description of what a card shows.
//! Front ends only lay the view out; every display rule lives here.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use crate::color::is_light;
use crate::widget::{Widget, WidgetData, WidgetField};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Characters of pretty JSON shown in the collapsed preview.
pub const PREVIEW_CHARS: usize = 300;

/// Characters of pretty JSON shown in the expanded preview.
pub const EXPANDED_PREVIEW_CHARS: usize = 2000;

/// Characters shown for a bare scalar payload.
pub const SCALAR_CHARS: usize = 100;

/// Characters shown in the editor's endpoint test result.
pub const TEST_PREVIEW_CHARS: usize = 200;

pub const LOADING_TEXT: &str = "Loading...";
pub const ELLIPSIS: &str = "...";

/// Rendered value of a field whose key is missing from the payload.
pub const UNDEFINED: &str = "undefined";

/// Title color for widgets without their own text color.
pub const DEFAULT_TITLE_COLOR_LIGHT: &str = "#1e293b";
pub const DEFAULT_TITLE_COLOR_DARK: &str = "#f1f5f9";

/// Dimming layer drawn over light custom backgrounds in dark mode.
pub const DARK_OVERLAY_COLOR: &str = "rgba(24,24,27,0.7)";

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Which truncation limit applies to the JSON preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    Collapsed,
    Expanded,
}

impl PreviewMode {
    pub fn limit(self) -> usize {
        match self {
            PreviewMode::Collapsed => PREVIEW_CHARS,
            PreviewMode::Expanded => EXPANDED_PREVIEW_CHARS,
        }
    }
}

/// One `label: value` row of a field projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    /// Stable row key: field id, else label, else position.
    pub key: String,
    pub label: String,
    pub value: String,
}

/// A possibly truncated block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub text: String,
    pub truncated: bool,
}

impl Preview {
    /// Text followed by `...` when truncated.
    pub fn display(&self) -> String {
        if self.truncated {
            format!("{}{ELLIPSIS}", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// What the data area of a widget card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataView {
    Loading,
    Error { message: String },
    PlainText { text: String },
    Fields { rows: Vec<FieldRow> },
    JsonPreview { preview: Preview },
    Scalar { text: String },
}

// ---------------------------------------------------------------------------
// Stringification
// ---------------------------------------------------------------------------

/// Stringify a JSON value the way JavaScript's `String()` does.
///
/// `None` (a missing property) is `"undefined"`, arrays join their elements
/// with commas, and objects collapse to `"[object Object]"`.
pub fn js_string(value: Option<&Value>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => js_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn js_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) => js_f64(f),
        None => n.to_string(),
    }
}

/// JavaScript `Number.prototype.toString()` for finite values.
///
/// Shortest round-trip digits; plain notation for exponents in `-7..21`,
/// `d.ddde±x` outside it.
fn js_f64(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let sign = if f < 0.0 { "-" } else { "" };

    // `{:e}` yields the shortest digits as `d.ddde<exp>`.
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        let frac = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        format!("{first}{frac}e{exp_sign}{}", (n - 1).abs())
    };
    format!("{sign}{body}")
}

/// Look up a field key: object property, array index for numeric keys, or an
/// array's `length`.
pub fn lookup<'a>(data: &'a Value, key: &str) -> Option<Cow<'a, Value>> {
    match data {
        Value::Object(map) => map.get(key).map(Cow::Borrowed),
        Value::Array(items) if key == "length" => Some(Cow::Owned(Value::from(items.len()))),
        Value::Array(items) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get(i))
            .map(Cow::Borrowed),
        _ => None,
    }
}

fn truncate_chars(text: &str, limit: usize) -> Preview {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Preview {
            text: text[..cut].to_string(),
            truncated: true,
        },
        None => Preview {
            text: text.to_string(),
            truncated: false,
        },
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

/// Project `fields` over `data`, one row per field in order.
pub fn project_fields(data: &Value, fields: &[WidgetField]) -> Vec<FieldRow> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| FieldRow {
            key: row_key(field, idx),
            label: field.label.clone(),
            value: js_string(lookup(data, &field.key).as_deref()),
        })
        .collect()
}

fn row_key(field: &WidgetField, idx: usize) -> String {
    if !field.id.is_empty() {
        format!("field-{}", field.id)
    } else if !field.label.is_empty() {
        format!("field-{}", field.label)
    } else {
        format!("field-{idx}")
    }
}

/// Decide what a widget's data area shows. First matching rule wins.
pub fn render_data(data: &WidgetData, fields: &[WidgetField], mode: PreviewMode) -> DataView {
    match data {
        WidgetData::Loading => DataView::Loading,
        WidgetData::Error { message, .. } => DataView::Error {
            message: message.clone(),
        },
        WidgetData::Text(text) => DataView::PlainText { text: text.clone() },
        WidgetData::Json(value) if !fields.is_empty() => DataView::Fields {
            rows: project_fields(value, fields),
        },
        WidgetData::Json(value @ (Value::Object(_) | Value::Array(_) | Value::Null)) => {
            DataView::JsonPreview {
                preview: truncate_chars(&pretty(value), mode.limit()),
            }
        }
        WidgetData::Json(scalar) => DataView::Scalar {
            text: truncate_chars(&js_string(Some(scalar)), SCALAR_CHARS).text,
        },
    }
}

/// The untruncated raw payload, when the raw toggle applies.
///
/// Available for strings and for anything object-shaped (error markers and
/// `null` included); `None` for bare scalars and unfetched widgets.
pub fn raw_view(data: &WidgetData) -> Option<String> {
    match data {
        WidgetData::Loading => None,
        WidgetData::Text(text) => Some(text.clone()),
        WidgetData::Json(Value::Bool(_) | Value::Number(_) | Value::String(_)) => None,
        other => other.to_value().map(|v| pretty(&v)),
    }
}

/// Short preview shown by the editor after testing an endpoint.
///
/// Always ends in `...`, even when nothing was cut.
pub fn test_result_preview(data: &WidgetData) -> String {
    let text = match data {
        WidgetData::Loading => return LOADING_TEXT.to_string(),
        WidgetData::Text(text) => text.clone(),
        other => other.to_value().map(|v| pretty(&v)).unwrap_or_default(),
    };
    format!("{}{ELLIPSIS}", truncate_chars(&text, TEST_PREVIEW_CHARS).text)
}

// ---------------------------------------------------------------------------
// Card appearance
// ---------------------------------------------------------------------------

/// Theme-aware appearance of a widget card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardStyle {
    /// The widget's own background, or `None` to use the theme surface.
    pub background: Option<String>,
    pub title_color: String,
    /// Present when a dimming overlay must be drawn over the background.
    pub overlay: Option<&'static str>,
}

pub fn card_style(widget: &Widget, dark_mode: bool) -> CardStyle {
    let background =
        (!widget.background_color.is_empty()).then(|| widget.background_color.clone());

    let title_color = if !widget.text_color.is_empty() {
        widget.text_color.clone()
    } else if dark_mode {
        DEFAULT_TITLE_COLOR_DARK.to_string()
    } else {
        DEFAULT_TITLE_COLOR_LIGHT.to_string()
    };

    let overlay = match &background {
        Some(bg) if dark_mode && is_light(bg) => Some(DARK_OVERLAY_COLOR),
        _ => None,
    };

    CardStyle {
        background,
        title_color,
        overlay,
    }
}

/// Everything a front end needs to draw one widget card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetCard {
    pub id: String,
    pub title: String,
    pub style: CardStyle,
    pub body: DataView,
    /// Untruncated payload when the raw toggle is available.
    pub raw: Option<String>,
    pub last_updated: Option<String>,
}

pub fn widget_card(widget: &Widget, dark_mode: bool, mode: PreviewMode) -> WidgetCard {
    WidgetCard {
        id: widget.id.clone(),
        title: widget.title.clone(),
        style: card_style(widget, dark_mode),
        body: render_data(&widget.data, &widget.fields, mode),
        raw: raw_view(&widget.data),
        last_updated: widget.last_updated.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
