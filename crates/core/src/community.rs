//! Community widget descriptors and the install mapping.
//!
//! The community manifest is a static JSON array of [`CommunityWidget`]s.
//! Installing one copies its display and fetch settings into a fresh local
//! [`Widget`]. A local widget with the same title counts as already
//! installed; the match is on title alone, not on URL or descriptor id.

use serde::{Deserialize, Serialize};

use crate::types::new_id;
use crate::widget::{self, nullable_vec, Widget, WidgetData, WidgetField};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default location of the community manifest.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/leecheeyong/community-widgets/refs/heads/main/widgets.json";

/// Pseudo-category that matches every descriptor.
pub const CATEGORY_ALL: &str = "All";

/// Categories offered by the browser, in display order.
pub const CATEGORIES: &[&str] = &[
    CATEGORY_ALL,
    "Weather",
    "Finance",
    "Lifestyle",
    "Developer",
    "News",
    "Entertainment",
];

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// One entry of the community manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityWidget {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub api_url: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub fields: Vec<WidgetField>,
}

fn default_refresh_interval() -> u64 {
    widget::DEFAULT_REFRESH_INTERVAL_SECS
}

impl CommunityWidget {
    /// Map into a new local widget with a fresh id and no data.
    pub fn to_widget(&self) -> Widget {
        Widget {
            id: new_id(),
            title: self.title.clone(),
            api_url: self.api_url.clone(),
            refresh_interval: self.refresh_interval,
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
            fields: self.fields.clone(),
            data: WidgetData::Loading,
            last_updated: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// Descriptors in `category`; [`CATEGORY_ALL`] keeps everything.
pub fn filter_by_category<'a>(
    widgets: &'a [CommunityWidget],
    category: &str,
) -> Vec<&'a CommunityWidget> {
    widgets
        .iter()
        .filter(|w| category == CATEGORY_ALL || w.category == category)
        .collect()
}

pub fn is_installed(descriptor: &CommunityWidget, local: &[Widget]) -> bool {
    widget::find_by_title(local, &descriptor.title).is_some()
}

// ---------------------------------------------------------------------------
// Install
// ---------------------------------------------------------------------------

/// Result of installing a descriptor into a local collection.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallOutcome {
    Installed(Widget),
    /// A local widget already has this title; the collection is unchanged.
    AlreadyInstalled { existing_id: String },
}

/// Append the descriptor's widget unless its title is already present.
pub fn install(descriptor: &CommunityWidget, local: &mut Vec<Widget>) -> InstallOutcome {
    if let Some(existing) = widget::find_by_title(local, &descriptor.title) {
        return InstallOutcome::AlreadyInstalled {
            existing_id: existing.id.clone(),
        };
    }
    let widget = descriptor.to_widget();
    local.push(widget.clone());
    InstallOutcome::Installed(widget)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
