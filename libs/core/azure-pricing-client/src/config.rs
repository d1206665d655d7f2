//! Client configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use reqwest::Url;

use crate::error::{PricingError, PricingResult};
use crate::logger::{NopLogger, PricingLogger};
use crate::retry::{Backoff, RetryAfterBackoff};

/// Azure Retail Prices API endpoint
pub const DEFAULT_BASE_URL: &str = "https://prices.azure.com/api/retail/prices";
pub const DEFAULT_RETRY_MAX: u32 = 3;
pub const DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_secs(1);
pub const DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_USER_AGENT: &str = concat!("azure-pricing-client/", env!("CARGO_PKG_VERSION"));
/// Pagination safety limit
pub const MAX_PAGINATION_PAGES: usize = 1000;

/// Configuration for [`crate::PricingClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,

    /// Retries after the first attempt; total attempts = `retry_max + 1`
    pub retry_max: u32,

    pub retry_wait_min: Duration,
    pub retry_wait_max: Duration,

    /// Per-request timeout, covering connect through body
    pub timeout: Duration,

    pub user_agent: String,

    /// Maximum page fetches per query
    pub max_pages: usize,

    pub logger: Arc<dyn PricingLogger>,

    pub backoff: Arc<dyn Backoff>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_max(mut self, retry_max: u32) -> Self {
        self.retry_max = retry_max;
        self
    }

    pub fn with_retry_wait(mut self, min: Duration, max: Duration) -> Self {
        self.retry_wait_min = min;
        self.retry_wait_max = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn PricingLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fill empty strings with defaults and reject unusable settings.
    pub(crate) fn validated(mut self) -> PricingResult<Self> {
        if self.base_url.is_empty() {
            self.base_url = DEFAULT_BASE_URL.to_string();
        }
        if self.user_agent.is_empty() {
            self.user_agent = DEFAULT_USER_AGENT.to_string();
        }

        if self.timeout.is_zero() {
            return Err(PricingError::invalid_config("timeout must be > 0"));
        }
        if self.retry_wait_min > self.retry_wait_max {
            return Err(PricingError::invalid_config(
                "retry_wait_min must be <= retry_wait_max",
            ));
        }
        if self.max_pages == 0 {
            return Err(PricingError::invalid_config("max_pages must be > 0"));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            PricingError::invalid_config(format!("base_url {:?} is not a valid URL: {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PricingError::invalid_config(format!(
                "base_url scheme must be http or https, got {:?}",
                url.scheme()
            )));
        }

        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry_max: DEFAULT_RETRY_MAX,
            retry_wait_min: DEFAULT_RETRY_WAIT_MIN,
            retry_wait_max: DEFAULT_RETRY_WAIT_MAX,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: MAX_PAGINATION_PAGES,
            logger: Arc::new(NopLogger),
            backoff: Arc::new(RetryAfterBackoff),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("retry_max", &self.retry_max)
            .field("retry_wait_min", &self.retry_wait_min)
            .field("retry_wait_max", &self.retry_wait_max)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl FromEnv for ClientConfig {
    /// Reads `AZURE_PRICES_*` variables; unset ones keep their defaults.
    /// The logger and backoff stay at their defaults.
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            base_url: env_or_default("AZURE_PRICES_BASE_URL", DEFAULT_BASE_URL),
            retry_max: env_parse("AZURE_PRICES_RETRY_MAX", defaults.retry_max)?,
            retry_wait_min: Duration::from_millis(env_parse(
                "AZURE_PRICES_RETRY_WAIT_MIN_MS",
                defaults.retry_wait_min.as_millis() as u64,
            )?),
            retry_wait_max: Duration::from_millis(env_parse(
                "AZURE_PRICES_RETRY_WAIT_MAX_MS",
                defaults.retry_wait_max.as_millis() as u64,
            )?),
            timeout: Duration::from_secs(env_parse(
                "AZURE_PRICES_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            user_agent: env_or_default("AZURE_PRICES_USER_AGENT", DEFAULT_USER_AGENT),
            max_pages: env_parse("AZURE_PRICES_MAX_PAGES", defaults.max_pages)?,
            ..defaults
        })
    }
}
