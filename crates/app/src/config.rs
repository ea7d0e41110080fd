use std::path::PathBuf;
use std::time::Duration;

use widgetdash_core::community::DEFAULT_MANIFEST_URL;

/// Name of the data directory created under `$HOME` (or the working directory).
const DATA_DIR_NAME: &str = ".widgetdash";

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
///
/// Everything has a default; a fresh install needs no configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding `widgets.json` and `settings.json`.
    pub data_dir: PathBuf,
    /// Community manifest location.
    pub community_url: String,
    /// Per-fetch timeout. `None` waits as long as the HTTP client does.
    pub fetch_timeout: Option<Duration>,
    /// Cap on concurrent fetches during a refresh. `None` is unbounded.
    pub fetch_concurrency: Option<usize>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                         | Default                                  |
    /// |---------------------------------|------------------------------------------|
    /// | `WIDGETDASH_DATA_DIR`           | `$HOME/.widgetdash`, else `./.widgetdash` |
    /// | `WIDGETDASH_COMMUNITY_URL`      | the public community manifest            |
    /// | `WIDGETDASH_FETCH_TIMEOUT_SECS` | unset (no timeout)                       |
    /// | `WIDGETDASH_FETCH_CONCURRENCY`  | unset (all at once)                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match non_empty(lookup("WIDGETDASH_DATA_DIR")) {
            Some(dir) => PathBuf::from(dir),
            None => non_empty(lookup("HOME"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_DIR_NAME),
        };

        let community_url = non_empty(lookup("WIDGETDASH_COMMUNITY_URL"))
            .unwrap_or_else(|| DEFAULT_MANIFEST_URL.to_string());

        let fetch_timeout = parse_positive(&lookup, "WIDGETDASH_FETCH_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        let fetch_concurrency = parse_positive(&lookup, "WIDGETDASH_FETCH_CONCURRENCY")?
            .map(|n| n as usize);

        Ok(Self {
            data_dir,
            community_url,
            fetch_timeout,
            fetch_concurrency,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = non_empty(lookup(var)) else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("HOME", "/home/ada")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/ada/.widgetdash"));
        assert_eq!(config.community_url, DEFAULT_MANIFEST_URL);
        assert_eq!(config.fetch_timeout, None);
        assert_eq!(config.fetch_concurrency, None);
    }

    #[test]
    fn no_home_falls_back_to_working_directory() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./.widgetdash"));
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("WIDGETDASH_DATA_DIR", "/tmp/dash"),
            ("WIDGETDASH_COMMUNITY_URL", "http://localhost/manifest.json"),
            ("WIDGETDASH_FETCH_TIMEOUT_SECS", "10"),
            ("WIDGETDASH_FETCH_CONCURRENCY", " 4 "),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dash"));
        assert_eq!(config.community_url, "http://localhost/manifest.json");
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.fetch_concurrency, Some(4));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert_matches!(
            load(&[("WIDGETDASH_FETCH_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidNumber { var: "WIDGETDASH_FETCH_TIMEOUT_SECS", .. })
        );
        assert_matches!(
            load(&[("WIDGETDASH_FETCH_CONCURRENCY", "0")]),
            Err(ConfigError::InvalidNumber { var: "WIDGETDASH_FETCH_CONCURRENCY", .. })
        );
    }
}
