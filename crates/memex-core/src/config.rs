//! Search configuration.
//!
//! Configuration is read from environment variables (`MEMEX_*` prefixed) and
//! falls back to [`crate::defaults`] for anything unset.
//!
//! # Example
//!
//! ```rust,no_run
//! use memex_core::config::SearchConfig;
//!
//! let config = SearchConfig::from_env().expect("invalid search configuration");
//! assert!(config.default_limit > 0);
//! ```

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::defaults;

/// Environment variable for the default page size.
pub const ENV_DEFAULT_LIMIT: &str = "MEMEX_DEFAULT_LIMIT";
/// Environment variable for the per-page annotation cap in blank searches.
pub const ENV_MAX_ANNOTS_PER_PAGE: &str = "MEMEX_MAX_ANNOTS_PER_PAGE";
/// Environment variable for the minimum term length.
pub const ENV_MIN_TERM_LENGTH: &str = "MEMEX_MIN_TERM_LENGTH";
/// Environment variable for the bookmark event bus capacity.
pub const ENV_EVENT_BUS_CAPACITY: &str = "MEMEX_EVENT_BUS_CAPACITY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for query building and the search coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Page size used when a query omits `limit`.
    pub default_limit: usize,
    /// Annotations attached per page in a blank page search.
    pub max_annots_per_page: usize,
    /// Terms shorter than this are dropped by the query builder.
    pub min_term_length: usize,
    /// Buffer size of the bookmark event bus.
    pub event_bus_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::SEARCH_LIMIT,
            max_annots_per_page: defaults::MAX_ANNOTS_PER_PAGE,
            min_term_length: defaults::MIN_TERM_LENGTH,
            event_bus_capacity: defaults::EVENT_BUS_CAPACITY,
        }
    }
}

impl SearchConfig {
    /// Load configuration from the environment, validating the result.
    pub fn from_env() -> ConfigResult<Self> {
        let fallback = Self::default();
        let config = Self {
            default_limit: env_or(ENV_DEFAULT_LIMIT, fallback.default_limit)?,
            max_annots_per_page: env_or(ENV_MAX_ANNOTS_PER_PAGE, fallback.max_annots_per_page)?,
            min_term_length: env_or(ENV_MIN_TERM_LENGTH, fallback.min_term_length)?,
            event_bus_capacity: env_or(ENV_EVENT_BUS_CAPACITY, fallback.event_bus_capacity)?,
        };
        config.validate()?;
        debug!(?config, "Loaded search configuration");
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_limit == 0 {
            return Err(ConfigError::Validation(
                "default_limit must be greater than zero".to_string(),
            ));
        }
        if self.min_term_length == 0 {
            return Err(ConfigError::Validation(
                "min_term_length must be greater than zero".to_string(),
            ));
        }
        if self.event_bus_capacity == 0 {
            return Err(ConfigError::Validation(
                "event_bus_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(var: &'static str, fallback: T) -> ConfigResult<T> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(fallback),
    }
}
