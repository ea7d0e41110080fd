//! Concurrent refresh of the whole widget collection.
//!
//! Every widget is fetched at once (optionally capped), results are
//! assembled in input order after all attempts settle, and the merged
//! collection replaces the stored one. A failed fetch still yields its entry,
//! carrying the error marker, so a refresh never changes the collection size.

use futures::stream::{self, StreamExt};
use widgetdash_core::widget::Widget;
use widgetdash_db::repositories::WidgetRepo;
use widgetdash_db::Store;

use crate::fetcher::FetchNormalizer;

/// Orchestrates fetch, merge, and write-back for the dashboard.
#[derive(Clone)]
pub struct DashboardSync {
    store: Store,
    normalizer: FetchNormalizer,
    concurrency: Option<usize>,
}

impl DashboardSync {
    pub fn new(store: Store, normalizer: FetchNormalizer) -> Self {
        Self {
            store,
            normalizer,
            concurrency: None,
        }
    }

    /// Cap the number of in-flight fetches. `None` fetches all at once.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit.filter(|&n| n > 0);
        self
    }

    pub fn normalizer(&self) -> &FetchNormalizer {
        &self.normalizer
    }

    async fn refresh_one(&self, widget: &Widget) -> Widget {
        let outcome = self.normalizer.fetch_widget_data(&widget.api_url).await;
        widget.with_data(outcome.data, outcome.last_updated)
    }

    /// Fetch every widget and return the updated copies, in input order.
    ///
    /// Touches no storage.
    pub async fn fetch_all(&self, widgets: &[Widget]) -> Vec<Widget> {
        let limit = self.concurrency.unwrap_or(widgets.len()).max(1);
        stream::iter(widgets.iter().map(|w| self.refresh_one(w)))
            .buffered(limit)
            .collect()
            .await
    }

    /// Fetch every widget, then replace the stored collection with the result.
    ///
    /// A write failure is logged; the refreshed list is returned regardless.
    pub async fn refresh_all(&self, widgets: &[Widget]) -> Vec<Widget> {
        let updated = self.fetch_all(widgets).await;

        let failed = updated.iter().filter(|w| w.data.is_error()).count();
        tracing::info!(total = updated.len(), failed, "Widget refresh complete");

        if let Err(e) = WidgetRepo::save_all(self.store.as_ref(), &updated).await {
            tracing::error!(error = %e, "Failed to store refreshed widgets");
        }
        updated
    }

    /// Pull-to-refresh: reload the stored collection and refresh it.
    pub async fn refresh(&self) -> Vec<Widget> {
        let widgets = WidgetRepo::list(self.store.as_ref()).await;
        self.refresh_all(&widgets).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
