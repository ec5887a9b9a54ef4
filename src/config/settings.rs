use std::env;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/studymate.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SEARCH_BUDGET_SECS: u64 = 10;
const DEFAULT_SEARCH_MAX_RESULTS: usize = 12;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_DUCKDUCKGO_BASE: &str = "https://html.duckduckgo.com";
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;
const MAX_TIMEOUT_SECS: u64 = 300;
// YouTube rejects `maxResults` above 50.
const MAX_SEARCH_RESULTS: usize = 50;
const DEVELOPMENT_JWT_SECRET: &str = "studymate-development-secret-do-not-use-in-production";
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("JWT_SECRET_KEY must be set in production")]
    MissingSecret,
    #[error("JWT_SECRET_KEY must be at least 32 bytes in production")]
    WeakSecret,
}

/// Runtime configuration, read once at start-up and shared through `AppState`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub youtube_api_key: Option<String>,
    pub youtube_api_base: String,
    pub duckduckgo_base: String,
    pub fetch_timeout: Duration,
    pub search_budget: Duration,
    pub search_max_results: usize,
}

impl AppConfig {
    /// Build the configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let is_production = environment == "production";

        let jwt_secret = match get("JWT_SECRET_KEY") {
            Some(secret) => {
                if is_production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
                    return Err(ConfigError::WeakSecret);
                }
                secret
            }
            None if is_production => return Err(ConfigError::MissingSecret),
            None => {
                warn!("JWT_SECRET_KEY not set; using development secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        let host_raw = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "HOST",
                value: host_raw.clone(),
                reason: e.to_string(),
            })?;
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        let token_ttl_hours = parse_in_range(
            "TOKEN_TTL_HOURS",
            get("TOKEN_TTL_HOURS"),
            DEFAULT_TOKEN_TTL_HOURS,
            1..=MAX_TOKEN_TTL_HOURS,
        )?;
        let fetch_timeout_secs = parse_in_range(
            "FETCH_TIMEOUT_SECS",
            get("FETCH_TIMEOUT_SECS"),
            DEFAULT_FETCH_TIMEOUT_SECS,
            1..=MAX_TIMEOUT_SECS,
        )?;
        let search_budget_secs = parse_in_range(
            "SEARCH_BUDGET_SECS",
            get("SEARCH_BUDGET_SECS"),
            DEFAULT_SEARCH_BUDGET_SECS,
            1..=MAX_TIMEOUT_SECS,
        )?;
        let search_max_results = parse_in_range(
            "SEARCH_MAX_RESULTS",
            get("SEARCH_MAX_RESULTS"),
            DEFAULT_SEARCH_MAX_RESULTS,
            1..=MAX_SEARCH_RESULTS,
        )?;

        Ok(Self {
            environment,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: SocketAddr::from((host, port)),
            jwt_secret,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            youtube_api_base: trim_base(
                get("YOUTUBE_API_BASE").unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.to_string()),
            ),
            duckduckgo_base: trim_base(
                get("DUCKDUCKGO_BASE").unwrap_or_else(|| DEFAULT_DUCKDUCKGO_BASE.to_string()),
            ),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            search_budget: Duration::from_secs(search_budget_secs),
            search_max_results,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_in_range<T>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let value = parse_or(key, raw, default)?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: format!("must be between {} and {}", range.start(), range.end()),
        });
    }
    Ok(value)
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.environment, "development");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.jwt_secret, DEVELOPMENT_JWT_SECRET);
        assert_eq!(config.token_ttl, chrono::Duration::hours(24));
        assert_eq!(config.youtube_api_key, None);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.search_budget, Duration::from_secs(10));
        assert_eq!(config.search_max_results, 12);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("YOUTUBE_API_KEY", "yt-key"),
            ("FETCH_TIMEOUT_SECS", "2"),
            ("SEARCH_MAX_RESULTS", "5"),
            ("DUCKDUCKGO_BASE", "http://127.0.0.1:9999/"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.youtube_api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
        assert_eq!(config.search_max_results, 5);
        assert_eq!(config.duckduckgo_base, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = config_from(&[("YOUTUBE_API_KEY", "   ")]).unwrap();
        assert_eq!(config.youtube_api_key, None);
    }

    #[test]
    fn test_invalid_number_names_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_zero_max_results_is_rejected() {
        let err = config_from(&[("SEARCH_MAX_RESULTS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SEARCH_MAX_RESULTS",
                ..
            }
        ));
    }

    #[test]
    fn test_durations_out_of_range_are_rejected() {
        for (key, value) in [
            ("SEARCH_BUDGET_SECS", "18446744073709551615"),
            ("SEARCH_BUDGET_SECS", "0"),
            ("FETCH_TIMEOUT_SECS", "301"),
            ("TOKEN_TTL_HOURS", "9223372036854775807"),
            ("TOKEN_TTL_HOURS", "-1"),
            ("SEARCH_MAX_RESULTS", "51"),
        ] {
            let err = config_from(&[(key, value)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Invalid { key: k, .. } if *k == key),
                "{key}={value}: {err}"
            );
        }

        let config = config_from(&[("SEARCH_BUDGET_SECS", "300"), ("TOKEN_TTL_HOURS", "8784")])
            .unwrap();
        assert_eq!(config.search_budget, Duration::from_secs(300));
        assert_eq!(config.token_ttl, chrono::Duration::hours(8784));
    }

    #[test]
    fn test_production_requires_secret() {
        let err = config_from(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret));

        let err = config_from(&[("ENVIRONMENT", "production"), ("JWT_SECRET_KEY", "short")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret));

        let strong = "x".repeat(48);
        let config = config_from(&[("ENVIRONMENT", "production"), ("JWT_SECRET_KEY", &strong)])
            .unwrap();
        assert!(config.is_production());
        assert_eq!(config.jwt_secret, strong);
    }
}
