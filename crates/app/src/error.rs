use widgetdash_core::error::CoreError;
use widgetdash_db::{DbError, StoreError};

use crate::config::ConfigError;

/// Application-level error type for commands.
///
/// Wraps the crate errors that can reach the user. Fetch failures never
/// appear here; they are carried in-band as widget data.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A domain-level error from `widgetdash_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The command line could not be parsed.
    #[error("{0}")]
    Usage(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(e) => AppError::Core(e),
            DbError::Store(e) => AppError::Store(e),
        }
    }
}

/// Convenience type alias for command results.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// One-line message shown to the user before exiting.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => format!("No {entity} matches {id:?}"),
            AppError::Core(CoreError::Validation(msg)) => msg.clone(),
            AppError::Usage(msg) => format!("{msg}\nRun `widgetdash help` for usage."),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn db_errors_unwrap_into_matching_variants() {
        let err: AppError = DbError::Core(CoreError::Validation("x".into())).into();
        assert_matches!(err, AppError::Core(CoreError::Validation(_)));
    }

    #[test]
    fn user_messages() {
        let not_found = AppError::Core(CoreError::NotFound {
            entity: "widget",
            id: "abc".into(),
        });
        assert_eq!(not_found.user_message(), "No widget matches \"abc\"");

        let invalid = AppError::Core(CoreError::Validation("Please fill in all required fields".into()));
        assert_eq!(invalid.user_message(), "Please fill in all required fields");
    }
}
