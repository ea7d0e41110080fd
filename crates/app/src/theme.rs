//! Dark-mode state shared by everything that draws.
//!
//! [`ThemeState`] is loaded once from the settings blob and handed to
//! renderers explicitly. Toggling writes through to storage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use widgetdash_core::settings::SettingChange;
use widgetdash_db::repositories::SettingsRepo;
use widgetdash_db::{Store, StoreError};

/// Cloneable handle to the current theme.
#[derive(Clone)]
pub struct ThemeState {
    store: Store,
    dark: Arc<AtomicBool>,
}

impl ThemeState {
    /// Read `darkMode` from the stored settings (default light).
    pub async fn load(store: Store) -> Self {
        let settings = SettingsRepo::load(store.as_ref()).await;
        Self {
            store,
            dark: Arc::new(AtomicBool::new(settings.dark_mode)),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::SeqCst)
    }

    /// Switch theme and persist the flag, leaving other settings untouched.
    ///
    /// The in-memory flag changes even if the write fails.
    pub async fn set_dark_mode(&self, dark: bool) -> Result<(), StoreError> {
        self.dark.store(dark, Ordering::SeqCst);
        SettingsRepo::update(self.store.as_ref(), SettingChange::DarkMode(dark)).await?;
        tracing::debug!(dark, "Theme changed");
        Ok(())
    }

    pub async fn toggle(&self) -> Result<bool, StoreError> {
        let dark = !self.is_dark();
        self.set_dark_mode(dark).await?;
        Ok(dark)
    }
}

#[cfg(test)]
mod tests {
    use widgetdash_core::settings::Settings;
    use widgetdash_db::memory_store;

    use super::*;

    #[tokio::test]
    async fn starts_light_on_empty_store() {
        let theme = ThemeState::load(memory_store()).await;
        assert!(!theme.is_dark());
    }

    #[tokio::test]
    async fn clones_share_state_and_writes_persist() {
        let store = memory_store();
        let theme = ThemeState::load(store.clone()).await;
        let renderer_handle = theme.clone();

        theme.set_dark_mode(true).await.unwrap();
        assert!(renderer_handle.is_dark());
        assert!(ThemeState::load(store.clone()).await.is_dark());
    }

    #[tokio::test]
    async fn toggle_preserves_other_settings() {
        let store = memory_store();
        SettingsRepo::update(store.as_ref(), SettingChange::RefreshInterval(90))
            .await
            .unwrap();

        let theme = ThemeState::load(store.clone()).await;
        assert!(theme.toggle().await.unwrap());

        let stored = SettingsRepo::load(store.as_ref()).await;
        assert_eq!(
            stored,
            Settings {
                dark_mode: true,
                refresh_interval: 90,
                ..Settings::default()
            }
        );
    }
}
