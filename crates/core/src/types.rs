/// Widget and field identifiers are opaque strings.
pub type WidgetId = String;

/// All machine-readable timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered identifier.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Human-readable local wall-clock time used for "last updated" stamps.
///
/// Presentation only; never parsed back.
pub fn display_time_now() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}
