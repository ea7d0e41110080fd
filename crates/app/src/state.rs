use std::sync::Arc;

use widgetdash_db::Store;
use widgetdash_sync::{CommunityClient, DashboardSync, Fetch, FetchNormalizer, HttpFetcher};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::theme::ThemeState;

/// Shared application state handed to every command.
///
/// Cheaply cloneable; all members are handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Active storage backend.
    pub store: Store,
    pub theme: ThemeState,
    /// Fetch, merge, and write-back of the widget collection.
    pub sync: DashboardSync,
    pub community: CommunityClient,
}

impl AppState {
    /// Build state over the JSON file store and a real HTTP client.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("widgetdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let store = widgetdash_db::open_store(&config.data_dir);
        Ok(Self::with_parts(config, store, Arc::new(HttpFetcher::with_client(client))).await)
    }

    /// Build state over any store and transport.
    pub async fn with_parts(config: AppConfig, store: Store, fetcher: Arc<dyn Fetch>) -> Self {
        let normalizer = FetchNormalizer::new(fetcher.clone()).with_timeout(config.fetch_timeout);
        let sync = DashboardSync::new(store.clone(), normalizer)
            .with_concurrency(config.fetch_concurrency);
        let community = CommunityClient::new(fetcher, config.community_url.clone(), store.clone());
        let theme = ThemeState::load(store.clone()).await;

        Self {
            config: Arc::new(config),
            store,
            theme,
            sync,
            community,
        }
    }
}
