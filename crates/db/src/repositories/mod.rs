//! Repositories over the two stored collections.
//!
//! Repositories are stateless; every method takes the store explicitly.

pub mod settings_repo;
pub mod widget_repo;

pub use settings_repo::SettingsRepo;
pub use widget_repo::{SaveOutcome, WidgetRepo};
