//! Pricing client: page fetching and pagination.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use observability::{QueryTimer, RetailPriceMetrics};
use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};
use reqwest::{Method, Request, Response, Url};

use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::{ErrorKind, PricingError, PricingResult};
use crate::filter::{PriceQuery, build_request_url};
use crate::logger::{Field, PricingLogger, field};
use crate::models::{PriceItem, PriceResponse};
use crate::transport::RetryEngine;

/// Bytes of a response body kept for error messages.
pub const MAX_SNIPPET_BYTES: usize = 256;
/// Largest success body the client will buffer.
pub const MAX_RESPONSE_BODY_BYTES: usize = 10 * 1024 * 1024;

const POOL_MAX_IDLE_PER_HOST: usize = 10;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Client for the Azure Retail Prices API.
///
/// Cheap to share behind an `Arc`; concurrent queries use one connection pool.
pub struct PricingClient {
    config: ClientConfig,
    http: RwLock<reqwest::Client>,
    engine: RetryEngine,
    user_agent: HeaderValue,
}

/// One fetched page.
#[derive(Debug)]
struct Page {
    items: Vec<PriceItem>,
    next_link: Option<String>,
}

/// A pagination failure plus where it happened, before query context is attached.
struct Failure {
    error: PricingError,
    url: String,
    page: Option<usize>,
}

impl PricingClient {
    /// Validate `config` and build the connection pool.
    pub fn new(config: ClientConfig) -> PricingResult<Self> {
        let config = config.validated()?;
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            PricingError::invalid_config(format!("user_agent is not a valid header value: {}", e))
        })?;
        let http = build_http_client(&config)?;
        let engine = RetryEngine::new(&config);

        Ok(Self {
            config,
            http: RwLock::new(http),
            engine,
            user_agent,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch every price matching `query`, following pagination links.
    ///
    /// Fails with `NotFound` when the API returns no items at all and with
    /// `PaginationLimitExceeded` when more pages remain after `max_pages`
    /// fetches. Cancellation and deadline errors pass through unclassified.
    pub async fn get_prices(
        &self,
        ctx: &RequestContext,
        query: &PriceQuery,
    ) -> PricingResult<Vec<PriceItem>> {
        let timer = QueryTimer::start();

        match self.paginate(ctx, query).await {
            Ok(items) => {
                timer.succeeded(items.len());
                Ok(items)
            }
            Err(failure) => {
                timer.failed(failure.error.category());
                self.log_failure(query, &failure);
                Err(failure.error.with_query(query.context(), failure.page))
            }
        }
    }

    /// Release idle pooled connections.
    ///
    /// The client stays usable; later calls open new connections.
    pub fn close(&self) {
        match build_http_client(&self.config) {
            Ok(fresh) => {
                *self.http.write().unwrap_or_else(PoisonError::into_inner) = fresh;
            }
            Err(err) => self
                .config
                .logger
                .warn("closing idle connections failed", &[field("error", err.to_string())]),
        }
    }

    fn http(&self) -> reqwest::Client {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn paginate(&self, ctx: &RequestContext, query: &PriceQuery) -> Result<Vec<PriceItem>, Failure> {
        let http = self.http();
        let mut items = Vec::new();
        let mut url = build_request_url(&self.config.base_url, query);
        let mut pending = Some(url.clone());

        for page in 0..self.config.max_pages {
            let Some(current) = pending.take() else {
                break;
            };
            url = current;

            let fetched = self
                .fetch_page(&http, ctx, &url)
                .await
                .map_err(|error| Failure {
                    error,
                    url: url.clone(),
                    page: Some(page),
                })?;

            RetailPriceMetrics::record_page(fetched.items.len());
            items.extend(fetched.items);
            pending = fetched.next_link;
        }

        if let Some(next) = pending {
            return Err(Failure {
                error: PricingError::new(
                    ErrorKind::PaginationLimitExceeded,
                    format!("stopped after {} pages", self.config.max_pages),
                ),
                url: next,
                page: None,
            });
        }

        if items.is_empty() {
            return Err(Failure {
                error: PricingError::new(ErrorKind::NotFound, "no pricing data"),
                url,
                page: None,
            });
        }

        Ok(items)
    }

    async fn fetch_page(&self, http: &reqwest::Client, ctx: &RequestContext, url: &str) -> PricingResult<Page> {
        let parsed = Url::parse(url).map_err(|e| {
            PricingError::with_source(ErrorKind::RequestFailed, format!("creating request for {:?}", url), e)
        })?;
        let mut request = Request::new(Method::GET, parsed);
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self.engine.execute(http, ctx, request).await?;

        let status = response.status();
        if !status.is_success() {
            let snippet = read_snippet(ctx, response).await?;
            return Err(PricingError::from_status(status, &snippet));
        }

        let body = read_body(ctx, response).await?;
        let envelope: PriceResponse = serde_json::from_slice(&body).map_err(|e| {
            let message = format!("{} (response: {})", e, snippet_of(&body));
            PricingError::with_source(ErrorKind::InvalidResponse, message, e)
        })?;

        let next_link = envelope.next_link().map(str::to_string);
        Ok(Page {
            items: envelope.items,
            next_link,
        })
    }

    fn log_failure(&self, query: &PriceQuery, failure: &Failure) {
        let error = &failure.error;
        let severity = error.severity();
        let logger = &self.config.logger;
        if !logger.enabled(severity) {
            return;
        }

        let mut fields: Vec<Field> = query
            .non_empty_fields()
            .into_iter()
            .map(|(label, value)| field(label, value))
            .collect();
        fields.push(field("url", failure.url.as_str()));
        fields.push(field("error_category", error.category()));
        if let Some(page) = failure.page {
            fields.push(field("page", page));
        }
        if let Some(status) = error.status() {
            fields.push(field("status", status.as_u16()));
        }
        fields.push(field("error", error.to_string()));

        logger.log(severity, "pricing query error", &fields);
    }
}

impl std::fmt::Debug for PricingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn build_http_client(config: &ClientConfig) -> PricingResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build()
        .map_err(|e| PricingError::with_source(ErrorKind::InvalidConfig, "building HTTP client", e))
}

/// First [`MAX_SNIPPET_BYTES`] of an error body. Read failures just shorten it.
async fn read_snippet(ctx: &RequestContext, mut response: Response) -> PricingResult<String> {
    let mut buf = Vec::with_capacity(MAX_SNIPPET_BYTES);
    while buf.len() < MAX_SNIPPET_BYTES {
        match ctx.run(response.chunk()).await? {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(MAX_SNIPPET_BYTES - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) | Err(_) => break,
        }
    }
    Ok(snippet_of(&buf))
}

/// Whole success body, refusing anything over [`MAX_RESPONSE_BODY_BYTES`].
async fn read_body(ctx: &RequestContext, mut response: Response) -> PricingResult<Vec<u8>> {
    let too_large = || {
        PricingError::new(
            ErrorKind::InvalidResponse,
            format!("response body exceeds {} bytes", MAX_RESPONSE_BODY_BYTES),
        )
    };

    let announced = response.content_length().unwrap_or(0);
    if announced > MAX_RESPONSE_BODY_BYTES as u64 {
        return Err(too_large());
    }

    let mut body = Vec::with_capacity(announced as usize);
    loop {
        let chunk = ctx.run(response.chunk()).await?.map_err(|e| {
            PricingError::with_source(ErrorKind::InvalidResponse, format!("reading response: {}", e), e)
        })?;
        let Some(chunk) = chunk else {
            break;
        };
        if body.len() + chunk.len() > MAX_RESPONSE_BODY_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// At most [`MAX_SNIPPET_BYTES`] of `body` as text, never splitting a character.
fn snippet_of(body: &[u8]) -> String {
    let mut end = body.len().min(MAX_SNIPPET_BYTES);
    if let Err(e) = std::str::from_utf8(&body[..end]) {
        // A character cut off by the byte limit is dropped, not replaced.
        if e.error_len().is_none() {
            end = e.valid_up_to();
        }
    }

    let mut snippet = String::from_utf8_lossy(&body[..end]).into_owned();
    let mut cut = snippet.len().min(MAX_SNIPPET_BYTES);
    while !snippet.is_char_boundary(cut) {
        cut -= 1;
    }
    snippet.truncate(cut);
    snippet
}
