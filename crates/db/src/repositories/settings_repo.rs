//! Repository for the `settings` blob.

use widgetdash_core::settings::{SettingChange, Settings};

use crate::store::{get_json, set_json, KeyValueStore, StoreError};
use crate::SETTINGS_KEY;

/// Provides access to the persisted preference flags.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Load settings, falling back to defaults when missing or unreadable.
    pub async fn load(store: &dyn KeyValueStore) -> Settings {
        match get_json::<Settings>(store, SETTINGS_KEY).await {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::error!(error = %e, "Error loading settings");
                Settings::default()
            }
        }
    }

    pub async fn save(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), StoreError> {
        set_json(store, SETTINGS_KEY, settings).await
    }

    /// Read-modify-write a single preference. Returns the stored result.
    pub async fn update(
        store: &dyn KeyValueStore,
        change: SettingChange,
    ) -> Result<Settings, StoreError> {
        let mut settings = Self::load(store).await;
        settings.apply(change);
        Self::save(store, &settings).await?;
        tracing::info!(?change, "Settings updated");
        Ok(settings)
    }
}
