//! Retrying HTTP execution.

use std::sync::Arc;
use std::time::Duration;

use observability::RetailPriceMetrics;
use reqwest::{Request, Response};

use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::{ErrorKind, PricingError, PricingResult, Severity};
use crate::logger::{PricingLogger, field};
use crate::retry::{AttemptOutcome, Backoff, RetryDecision, check_retry};

/// Runs one logical request as up to `retry_max + 1` HTTP attempts.
pub(crate) struct RetryEngine {
    retry_max: u32,
    wait_min: Duration,
    wait_max: Duration,
    backoff: Arc<dyn Backoff>,
    logger: Arc<dyn PricingLogger>,
}

impl RetryEngine {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        Self {
            retry_max: config.retry_max,
            wait_min: config.retry_wait_min,
            wait_max: config.retry_wait_max,
            backoff: Arc::clone(&config.backoff),
            logger: Arc::clone(&config.logger),
        }
    }

    /// Execute `request`, retrying per [`check_retry`].
    ///
    /// Returns the first response the policy accepts, or the last response
    /// once retries run out; the caller classifies it by status. Fails with
    /// the context error when the caller gives up, and with `RequestFailed`
    /// when every attempt failed without a response.
    pub(crate) async fn execute(
        &self,
        http: &reqwest::Client,
        ctx: &RequestContext,
        request: Request,
    ) -> PricingResult<Response> {
        let mut attempt: u32 = 0;

        loop {
            if let Some(err) = ctx.err() {
                return Err(err.into());
            }

            let req = request.try_clone().ok_or_else(|| {
                PricingError::new(ErrorKind::RequestFailed, "request body cannot be replayed")
            })?;
            let result = ctx.run(http.execute(req)).await?;

            let outcome = match &result {
                Ok(response) => AttemptOutcome::Status(response.status()),
                Err(_) => AttemptOutcome::TransportError,
            };
            RetailPriceMetrics::record_request(outcome_label(outcome));

            match check_retry(ctx, outcome) {
                RetryDecision::Abort(err) => return Err(err.into()),
                RetryDecision::Stop => return result.map_err(|e| give_up(attempt + 1, e)),
                RetryDecision::Retry => {}
            }

            if attempt >= self.retry_max {
                return result.map_err(|e| give_up(attempt + 1, e));
            }

            let headers = result.as_ref().ok().map(Response::headers);
            let wait = self
                .backoff
                .next_delay(self.wait_min, self.wait_max, attempt, headers);

            if self.logger.enabled(Severity::Debug) {
                let mut fields = vec![
                    field("url", request.url().as_str()),
                    field("attempt", attempt + 1),
                    field("remaining", self.retry_max - attempt - 1),
                    field("wait_ms", wait.as_millis() as u64),
                ];
                match &result {
                    Ok(response) => fields.push(field("status", response.status().as_u16())),
                    Err(err) => fields.push(field("error", err.to_string())),
                }
                self.logger.debug("retrying request", &fields);
            }
            RetailPriceMetrics::record_retry();

            // Release the connection before sleeping.
            drop(result);
            ctx.sleep(wait).await?;
            attempt += 1;
        }
    }
}

fn outcome_label(outcome: AttemptOutcome) -> &'static str {
    match outcome {
        AttemptOutcome::Status(status) if status.is_success() => "success",
        AttemptOutcome::Status(_) => "http_error",
        AttemptOutcome::TransportError => "transport_error",
    }
}

fn give_up(attempts: u32, err: reqwest::Error) -> PricingError {
    PricingError::with_source(
        ErrorKind::RequestFailed,
        format!("giving up after {} attempt(s): {}", attempts, err),
        err,
    )
}
