//! Export snapshot of the local collections.
//!
//! Produced for display and copying only; there is no import path.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::types::Timestamp;
use crate::widget::Widget;

/// `{ widgets, settings, exportDate }` as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub widgets: Vec<Widget>,
    pub settings: Settings,
    /// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
    pub export_date: String,
}

impl ExportDocument {
    pub fn new(widgets: Vec<Widget>, settings: Settings, at: Timestamp) -> Self {
        Self {
            widgets,
            settings,
            export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
