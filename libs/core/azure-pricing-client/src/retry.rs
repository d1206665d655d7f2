//! Retry policy and backoff strategy.
//!
//! Both are pure: they look at one attempt's outcome and return a decision or
//! a duration. Neither sleeps nor logs; the transport does that.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::context::{ContextError, RequestContext};

/// What one HTTP attempt produced, as far as retrying is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A response arrived with this status.
    Status(StatusCode),
    /// No response: connection refused, timeout, DNS failure, ...
    TransportError,
}

/// Verdict of [`check_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after backing off.
    Retry,
    /// Accept this outcome as final.
    Stop,
    /// The caller gave up; surface this error unchanged.
    Abort(ContextError),
}

/// Decide whether an attempt should be retried.
///
/// Rules, first match wins:
/// 1. cancelled or expired context: abort with the context error
/// 2. transport failure: retry
/// 3. 429 or 503: retry
/// 4. anything else, success included: stop
pub fn check_retry(ctx: &RequestContext, outcome: AttemptOutcome) -> RetryDecision {
    if let Some(err) = ctx.err() {
        return RetryDecision::Abort(err);
    }

    match outcome {
        AttemptOutcome::TransportError => RetryDecision::Retry,
        AttemptOutcome::Status(StatusCode::TOO_MANY_REQUESTS)
        | AttemptOutcome::Status(StatusCode::SERVICE_UNAVAILABLE) => RetryDecision::Retry,
        AttemptOutcome::Status(_) => RetryDecision::Stop,
    }
}

/// Computes the wait before retry number `attempt` (zero-based).
///
/// `headers` are those of the failed attempt's response, if there was one.
/// Closures with the same signature implement this trait.
pub trait Backoff: Send + Sync {
    fn next_delay(
        &self,
        min: Duration,
        max: Duration,
        attempt: u32,
        headers: Option<&HeaderMap>,
    ) -> Duration;
}

impl<F> Backoff for F
where
    F: Fn(Duration, Duration, u32, Option<&HeaderMap>) -> Duration + Send + Sync,
{
    fn next_delay(
        &self,
        min: Duration,
        max: Duration,
        attempt: u32,
        headers: Option<&HeaderMap>,
    ) -> Duration {
        self(min, max, attempt, headers)
    }
}

/// Honors a positive `Retry-After` hint (capped at `max`), otherwise falls
/// back to [`exponential_backoff`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryAfterBackoff;

impl Backoff for RetryAfterBackoff {
    fn next_delay(
        &self,
        min: Duration,
        max: Duration,
        attempt: u32,
        headers: Option<&HeaderMap>,
    ) -> Duration {
        match headers.and_then(parse_retry_after) {
            Some(hint) if !hint.is_zero() => hint.min(max),
            _ => exponential_backoff(min, max, attempt),
        }
    }
}

/// `min * 2^attempt`, clamped to `[min, max]`.
pub fn exponential_backoff(min: Duration, max: Duration, attempt: u32) -> Duration {
    let delay = 2u32
        .checked_pow(attempt)
        .and_then(|factor| min.checked_mul(factor))
        .unwrap_or(max);
    delay.clamp(min, max.max(min))
}

/// Parse a `Retry-After` header.
///
/// Accepts a whole number of seconds or an HTTP-date. Returns `None` when the
/// header is absent or malformed (fractions included) and `Some(ZERO)` for
/// non-positive seconds or a date in the past.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(seconds) = value.parse::<i64>() {
        return Some(match u64::try_from(seconds) {
            Ok(seconds) => Duration::from_secs(seconds),
            Err(_) => Duration::ZERO,
        });
    }

    let at = parse_http_date(value)?;
    Some((at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}

/// IMF-fixdate, RFC 850 and asctime, as allowed by RFC 9110.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
