//! User preference flags stored under the `settings` key.

use serde::{Deserialize, Serialize};

use crate::widget::DEFAULT_REFRESH_INTERVAL_SECS;

/// Persisted preferences.
///
/// Every key is optional in storage; a blob written by an older theme
/// toggle may hold nothing but `darkMode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Stored and shown, but nothing schedules refreshes from it yet.
    pub auto_refresh: bool,
    pub dark_mode: bool,
    /// Default refresh interval in seconds. Not wired to a timer.
    pub refresh_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            dark_mode: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

/// A single preference change, applied read-modify-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    AutoRefresh(bool),
    DarkMode(bool),
    RefreshInterval(u64),
}

impl Settings {
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::AutoRefresh(v) => self.auto_refresh = v,
            SettingChange::DarkMode(v) => self.dark_mode = v,
            SettingChange::RefreshInterval(v) => self.refresh_interval = v,
        }
    }
}
