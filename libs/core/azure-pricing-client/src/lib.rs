//! Resilient client for the Azure Retail Prices REST API.
//!
//! Builds escaped OData filters, retries throttled and failed requests with
//! `Retry-After`-aware backoff, follows pagination up to a safety limit and
//! reports failures through a closed error taxonomy.
//!
//! # Example
//!
//! ```rust,ignore
//! use azure_pricing_client::{ClientConfig, PriceQuery, PricingClient, RequestContext};
//!
//! let client = PricingClient::new(ClientConfig::default())?;
//! let query = PriceQuery::new()
//!     .region("eastus")
//!     .sku("Standard_B1s")
//!     .currency("USD");
//!
//! let ctx = RequestContext::new().with_timeout(Duration::from_secs(120));
//! let items = client.get_prices(&ctx, &query).await?;
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod logger;
pub mod models;
pub mod retry;
mod transport;

pub use client::{MAX_RESPONSE_BODY_BYTES, MAX_SNIPPET_BYTES, PricingClient};
pub use config::{ClientConfig, MAX_PAGINATION_PAGES};
pub use context::{ContextError, RequestContext};
pub use error::{ErrorKind, PricingError, PricingResult, Severity};
pub use filter::{PriceQuery, QueryContext, build_filter, build_request_url, escape_odata_string};
pub use logger::{Field, FieldValue, NopLogger, PricingLogger, TracingLogger, field};
pub use models::{PriceItem, PriceResponse};
pub use retry::{Backoff, RetryAfterBackoff};
