//! Community manifest client and installer.

use std::sync::Arc;

use serde_json::Value;
use widgetdash_core::community::{self, CommunityWidget, InstallOutcome};
use widgetdash_db::repositories::WidgetRepo;
use widgetdash_db::{Store, StoreError};

use crate::fetcher::{Fetch, FetchError};

/// Errors from reading the community manifest.
#[derive(Debug, thiserror::Error)]
pub enum CommunityError {
    #[error("Manifest fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest is not a JSON array")]
    NotAnArray,
}

/// A manifest entry annotated with its local install state.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityListing {
    pub widget: CommunityWidget,
    pub installed: bool,
}

/// Reads the community manifest and installs entries into the local store.
#[derive(Clone)]
pub struct CommunityClient {
    fetcher: Arc<dyn Fetch>,
    manifest_url: String,
    store: Store,
}

impl CommunityClient {
    pub fn new(fetcher: Arc<dyn Fetch>, manifest_url: impl Into<String>, store: Store) -> Self {
        Self {
            fetcher,
            manifest_url: manifest_url.into(),
            store,
        }
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    /// Fetch and decode the manifest.
    ///
    /// Entries that do not decode as descriptors are skipped with a warning.
    pub async fn try_fetch_manifest(&self) -> Result<Vec<CommunityWidget>, CommunityError> {
        let body = self.fetcher.get_text(&self.manifest_url).await?;
        let Value::Array(entries) = serde_json::from_str::<Value>(&body)? else {
            return Err(CommunityError::NotAnArray);
        };

        let widgets = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(widget) => Some(widget),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed community widget");
                    None
                }
            })
            .collect();
        Ok(widgets)
    }

    /// The manifest, or an empty list when it cannot be read.
    pub async fn fetch_manifest(&self) -> Vec<CommunityWidget> {
        match self.try_fetch_manifest().await {
            Ok(widgets) => widgets,
            Err(e) => {
                tracing::error!(url = %self.manifest_url, error = %e, "Error fetching community widgets");
                Vec::new()
            }
        }
    }

    /// Manifest entries in `category`, each marked installed or not.
    pub async fn browse(&self, category: &str) -> Vec<CommunityListing> {
        let manifest = self.fetch_manifest().await;
        let local = WidgetRepo::list(self.store.as_ref()).await;

        community::filter_by_category(&manifest, category)
            .into_iter()
            .map(|widget| CommunityListing {
                installed: community::is_installed(widget, &local),
                widget: widget.clone(),
            })
            .collect()
    }

    /// Install a descriptor unless a widget with its title already exists.
    pub async fn install(&self, descriptor: &CommunityWidget) -> Result<InstallOutcome, StoreError> {
        let mut widgets = WidgetRepo::list(self.store.as_ref()).await;
        let outcome = community::install(descriptor, &mut widgets);

        match &outcome {
            InstallOutcome::Installed(widget) => {
                WidgetRepo::save_all(self.store.as_ref(), &widgets).await?;
                tracing::info!(widget_id = %widget.id, title = %widget.title, "Community widget installed");
            }
            InstallOutcome::AlreadyInstalled { existing_id } => {
                tracing::info!(widget_id = %existing_id, title = %descriptor.title, "Community widget already installed");
            }
        }
        Ok(outcome)
    }

    /// Find a manifest entry by exact title and install it.
    ///
    /// Returns `Ok(None)` when the manifest has no such title.
    pub async fn install_by_title(&self, title: &str) -> Result<Option<InstallOutcome>, StoreError> {
        let manifest = self.fetch_manifest().await;
        match manifest.iter().find(|w| w.title == title) {
            Some(descriptor) => self.install(descriptor).await.map(Some),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
