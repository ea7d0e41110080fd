//! `widgetdash-sync` -- network side of the dashboard.
//!
//! Fetches widget endpoints, classifies their payloads, refreshes the stored
//! collection, and reads the community manifest.

pub mod community;
pub mod dashboard;
pub mod fetcher;

pub use community::{CommunityClient, CommunityError, CommunityListing};
pub use dashboard::DashboardSync;
pub use fetcher::{
    EndpointTest, Fetch, FetchError, FetchNormalizer, FetchOutcome, HttpFetcher, StaticFetcher,
};
