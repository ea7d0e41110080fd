//! Widget records, field projections, and the fetched-payload sum type.
//!
//! Widgets are stored as one JSON array under the `widgets` key using the
//! camelCase property names below. The in-memory collection is a plain
//! `Vec<Widget>`; the helpers at the bottom of this module keep the id
//! uniqueness invariant on every mutation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::types::WidgetId;

/// Refresh interval used when a stored widget or draft carries none.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Error message stored when a dashboard refresh cannot reach the endpoint.
pub const FETCH_ERROR_MESSAGE: &str = "Couldn't fetch data";

/// Error message stored when a manual endpoint test cannot connect.
pub const CONNECT_ERROR_MESSAGE: &str = "Failed to connect";

// ---------------------------------------------------------------------------
// WidgetField
// ---------------------------------------------------------------------------

/// Advisory display type of a projected field. Never coerces the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// Parse a type name; anything unrecognised is `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "number" => FieldType::Number,
            "boolean" | "bool" => FieldType::Boolean,
            _ => FieldType::Text,
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(FieldType::parse).unwrap_or_default())
    }
}

/// A named extraction rule projecting one JSON property into a display row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetField {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub key: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl WidgetField {
    pub fn new(label: impl Into<String>, key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: crate::types::new_id(),
            label: label.into(),
            key: key.into(),
            field_type,
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetData
// ---------------------------------------------------------------------------

/// The last-fetched payload of a widget.
///
/// Stored form: absent (`Loading`), an object with an `error` key (`Error`),
/// a JSON string (`Text`, a body that was not JSON), or any other JSON value
/// (`Json`). An `Error` keeps the whole object it was parsed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WidgetData {
    #[default]
    Loading,
    Error {
        /// The `error` value, stringified for display.
        message: String,
        /// The complete object, stored and shown raw unchanged.
        payload: Value,
    },
    Text(String),
    Json(Value),
}

impl WidgetData {
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetData::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WidgetData::Error { .. })
    }

    /// A locally produced error marker, `{"error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        WidgetData::Error {
            payload: serde_json::json!({ "error": message }),
            message,
        }
    }

    /// The display message of an error marker.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WidgetData::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Classify an already-parsed JSON value.
    ///
    /// Strings become `Text`; objects carrying an `error` key become `Error`.
    pub fn from_value(value: Value) -> Self {
        let message = match &value {
            Value::Object(map) => map.get("error").map(|e| crate::render::js_string(Some(e))),
            _ => None,
        };
        match (value, message) {
            (Value::String(s), _) => WidgetData::Text(s),
            (payload, Some(message)) => WidgetData::Error { message, payload },
            (other, None) => WidgetData::Json(other),
        }
    }

    /// Classify a response body: strict JSON if it parses, raw text otherwise.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => WidgetData::from_value(value),
            Err(_) => WidgetData::Text(body.to_string()),
        }
    }

    /// The stored JSON form. `Loading` has none.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            WidgetData::Loading => None,
            WidgetData::Error { payload, .. } => Some(payload.clone()),
            WidgetData::Text(s) => Some(Value::String(s.clone())),
            WidgetData::Json(v) => Some(v.clone()),
        }
    }
}

impl Serialize for WidgetData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WidgetData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(WidgetData::from_value)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

/// Treat an explicit `null` list the same as a missing one.
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user-defined binding between a dashboard card and a remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    pub title: String,
    pub api_url: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub fields: Vec<WidgetField>,
    #[serde(default, skip_serializing_if = "WidgetData::is_loading")]
    pub data: WidgetData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Widget {
    /// Copy of this widget carrying a new fetch outcome.
    pub fn with_data(&self, data: WidgetData, last_updated: String) -> Self {
        Self {
            data,
            last_updated: Some(last_updated),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Collection helpers
// ---------------------------------------------------------------------------

/// Replace the widget with the same id, or append it when none matches.
///
/// Returns `true` when an existing entry was replaced.
pub fn upsert(widgets: &mut Vec<Widget>, widget: Widget) -> bool {
    match widgets.iter_mut().find(|w| w.id == widget.id) {
        Some(slot) => {
            *slot = widget;
            true
        }
        None => {
            widgets.push(widget);
            false
        }
    }
}

/// Remove every widget with `id`. Returns whether anything was removed.
pub fn remove(widgets: &mut Vec<Widget>, id: &str) -> bool {
    let before = widgets.len();
    widgets.retain(|w| w.id != id);
    widgets.len() != before
}

pub fn find<'a>(widgets: &'a [Widget], id: &str) -> Option<&'a Widget> {
    widgets.iter().find(|w| w.id == id)
}

/// Case-sensitive exact title match.
pub fn find_by_title<'a>(widgets: &'a [Widget], title: &str) -> Option<&'a Widget> {
    widgets.iter().find(|w| w.title == title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn widget(id: &str) -> Widget {
        Widget {
            id: id.to_string(),
            title: format!("Widget {id}"),
            api_url: "https://example.com/api".to_string(),
            refresh_interval: 60,
            background_color: "#ffffff".to_string(),
            text_color: "#1e293b".to_string(),
            fields: Vec::new(),
            data: WidgetData::Loading,
            last_updated: None,
        }
    }

    #[test]
    fn body_classification() {
        assert_eq!(WidgetData::from_body("42"), WidgetData::Json(json!(42)));
        assert_eq!(
            WidgetData::from_body("not json"),
            WidgetData::Text("not json".to_string())
        );
        assert_eq!(WidgetData::from_body("true"), WidgetData::Json(json!(true)));
        assert_eq!(WidgetData::from_body("null"), WidgetData::Json(Value::Null));
        assert_eq!(
            WidgetData::from_body("\"quoted\""),
            WidgetData::Text("quoted".to_string())
        );
        assert_matches!(WidgetData::from_body("[1,2]"), WidgetData::Json(Value::Array(_)));
        assert_eq!(WidgetData::from_body(""), WidgetData::Text(String::new()));
    }

    #[test]
    fn object_with_error_key_is_error() {
        assert_eq!(
            WidgetData::from_body(r#"{"error":"rate limited"}"#),
            WidgetData::error("rate limited")
        );
    }

    #[test]
    fn error_object_keeps_every_key() {
        let data = WidgetData::from_body(r#"{"error":"rate limited","retryAfter":30}"#);
        assert_eq!(data.error_message(), Some("rate limited"));
        assert_eq!(
            data.to_value(),
            Some(json!({"error": "rate limited", "retryAfter": 30}))
        );

        let numeric = WidgetData::from_value(json!({"error": 5}));
        assert_eq!(numeric.error_message(), Some("5"));
        assert_eq!(numeric.to_value(), Some(json!({"error": 5})));
    }

    #[test]
    fn widget_serializes_camel_case_and_omits_loading() {
        let value = serde_json::to_value(widget("1")).unwrap();
        assert_eq!(value["apiUrl"], "https://example.com/api");
        assert_eq!(value["refreshInterval"], 60);
        assert_eq!(value["backgroundColor"], "#ffffff");
        assert!(value.get("data").is_none());
        assert!(value.get("lastUpdated").is_none());
    }

    #[test]
    fn stored_payload_shapes_round_trip() {
        let cases = [
            WidgetData::error(FETCH_ERROR_MESSAGE),
            WidgetData::from_value(json!({"error": {"code": 429}, "detail": "slow down"})),
            WidgetData::Text("plain".to_string()),
            WidgetData::Json(json!({"temp": 72})),
            WidgetData::Json(json!(42)),
            WidgetData::Json(Value::Null),
        ];
        for data in cases {
            let w = widget("1").with_data(data.clone(), "9:00:00 AM".to_string());
            let text = serde_json::to_string(&w).unwrap();
            let back: Widget = serde_json::from_str(&text).unwrap();
            assert_eq!(back.data, data);
            assert_eq!(back.last_updated.as_deref(), Some("9:00:00 AM"));
        }
    }

    #[test]
    fn error_marker_stored_as_object() {
        let w = widget("1").with_data(WidgetData::error(FETCH_ERROR_MESSAGE), "now".into());
        let value = serde_json::to_value(&w).unwrap();
        assert_eq!(value["data"], json!({"error": "Couldn't fetch data"}));
    }

    #[test]
    fn lenient_deserialization() {
        let w: Widget = serde_json::from_value(json!({
            "id": "1700000000000",
            "title": "Weather",
            "apiUrl": "https://example.com",
            "fields": null
        }))
        .unwrap();
        assert!(w.fields.is_empty());
        assert_eq!(w.refresh_interval, DEFAULT_REFRESH_INTERVAL_SECS);
        assert!(w.data.is_loading());

        let f: WidgetField =
            serde_json::from_value(json!({"label": "A", "key": "a", "type": "date"})).unwrap();
        assert_eq!(f.field_type, FieldType::Text);
        assert_eq!(f.id, "");
    }

    #[test]
    fn field_type_names() {
        assert_eq!(FieldType::parse("Number"), FieldType::Number);
        assert_eq!(FieldType::parse("bool"), FieldType::Boolean);
        assert_eq!(FieldType::parse("whatever"), FieldType::Text);
        assert_eq!(serde_json::to_value(FieldType::Boolean).unwrap(), json!("boolean"));
    }

    #[test]
    fn upsert_replaces_by_id_or_appends() {
        let mut widgets = vec![widget("a"), widget("b")];

        let mut edited = widget("a");
        edited.title = "Edited".to_string();
        assert!(upsert(&mut widgets, edited));
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].title, "Edited");

        assert!(!upsert(&mut widgets, widget("c")));
        assert_eq!(widgets.len(), 3);
    }

    #[test]
    fn remove_drops_exactly_the_matching_id() {
        let mut widgets = vec![widget("a"), widget("b"), widget("c")];
        assert!(remove(&mut widgets, "b"));
        assert_eq!(widgets.len(), 2);
        assert!(find(&widgets, "b").is_none());
        assert!(!remove(&mut widgets, "missing"));
        assert_eq!(widgets.len(), 2);
    }

    #[test]
    fn title_lookup_is_exact() {
        let widgets = vec![widget("a")];
        assert!(find_by_title(&widgets, "Widget a").is_some());
        assert!(find_by_title(&widgets, "widget a").is_none());
    }
}
