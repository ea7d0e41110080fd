//! Repository for the `widgets` collection.
//!
//! The whole collection is read, changed in memory, and written back in
//! full on every mutation.

use widgetdash_core::editor::WidgetDraft;
use widgetdash_core::widget::{self, Widget};

use crate::store::{get_json, set_json, KeyValueStore, StoreError};
use crate::{DbError, WIDGETS_KEY};

/// Whether a save created a new widget or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Provides data access for the stored widget collection.
pub struct WidgetRepo;

impl WidgetRepo {
    /// Load every widget, in stored order.
    ///
    /// Read or decode failures are logged and yield an empty collection.
    pub async fn list(store: &dyn KeyValueStore) -> Vec<Widget> {
        match get_json::<Vec<Widget>>(store, WIDGETS_KEY).await {
            Ok(widgets) => widgets.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Error loading widgets");
                Vec::new()
            }
        }
    }

    /// Replace the stored collection.
    pub async fn save_all(store: &dyn KeyValueStore, widgets: &[Widget]) -> Result<(), StoreError> {
        set_json(store, WIDGETS_KEY, widgets).await
    }

    pub async fn find(store: &dyn KeyValueStore, id: &str) -> Option<Widget> {
        widget::find(&Self::list(store).await, id).cloned()
    }

    pub async fn count(store: &dyn KeyValueStore) -> usize {
        Self::list(store).await.len()
    }

    /// Validate a draft and store it.
    ///
    /// A draft whose id matches a stored widget replaces it; anything else
    /// is appended. Validation failures write nothing.
    pub async fn save(
        store: &dyn KeyValueStore,
        draft: WidgetDraft,
    ) -> Result<(Widget, SaveOutcome), DbError> {
        let widget = draft.into_widget()?;
        let mut widgets = Self::list(store).await;

        let outcome = if widget::upsert(&mut widgets, widget.clone()) {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };
        Self::save_all(store, &widgets).await?;

        tracing::info!(widget_id = %widget.id, ?outcome, "Widget saved");
        Ok((widget, outcome))
    }

    /// Remove the widget with `id`. Returns whether one was removed.
    pub async fn delete(store: &dyn KeyValueStore, id: &str) -> Result<bool, StoreError> {
        let mut widgets = Self::list(store).await;
        if !widget::remove(&mut widgets, id) {
            return Ok(false);
        }
        Self::save_all(store, &widgets).await?;
        tracing::info!(widget_id = %id, "Widget deleted");
        Ok(true)
    }
}
