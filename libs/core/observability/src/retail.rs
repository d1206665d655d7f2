//! Metrics for Azure Retail Prices queries.

use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};

pub const REQUESTS_TOTAL: &str = "azure_prices_requests_total";
pub const RETRIES_TOTAL: &str = "azure_prices_retries_total";
pub const PAGES_TOTAL: &str = "azure_prices_pages_total";
pub const QUERIES_TOTAL: &str = "azure_prices_queries_total";
pub const QUERY_DURATION_SECONDS: &str = "azure_prices_query_duration_seconds";
pub const ITEMS_LAST_QUERY: &str = "azure_prices_items_last_query";

/// Retail prices metrics recorder
pub struct RetailPriceMetrics;

impl RetailPriceMetrics {
    /// Record one HTTP attempt. `outcome` is `success`, `http_error` or `transport_error`.
    pub fn record_request(outcome: &'static str) {
        counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    }

    pub fn record_retry() {
        counter!(RETRIES_TOTAL).increment(1);
    }

    /// Record a page fetched successfully.
    pub fn record_page(items: usize) {
        counter!(PAGES_TOTAL).increment(1);
        tracing::trace!(items = items, "Fetched price page");
    }

    pub fn record_query_succeeded(items: usize, duration: Duration) {
        counter!(QUERIES_TOTAL, "status" => "ok").increment(1);
        histogram!(QUERY_DURATION_SECONDS, "status" => "ok").record(duration.as_secs_f64());
        gauge!(ITEMS_LAST_QUERY).set(items as f64);

        tracing::debug!(
            items = items,
            duration_ms = duration.as_millis() as u64,
            "Price query completed"
        );
    }

    /// Record a failed query. `category` is the error category label.
    pub fn record_query_failed(category: &'static str, duration: Duration) {
        counter!(QUERIES_TOTAL, "status" => category).increment(1);
        histogram!(QUERY_DURATION_SECONDS, "status" => category).record(duration.as_secs_f64());
    }
}

/// Times one query and records its outcome.
///
/// A timer dropped without an outcome (the query future was dropped) is
/// recorded with status `abandoned`.
pub struct QueryTimer {
    start: Instant,
    finished: bool,
}

impl QueryTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            finished: false,
        }
    }

    pub fn succeeded(mut self, items: usize) {
        self.finished = true;
        RetailPriceMetrics::record_query_succeeded(items, self.start.elapsed());
    }

    pub fn failed(mut self, category: &'static str) {
        self.finished = true;
        RetailPriceMetrics::record_query_failed(category, self.start.elapsed());
    }
}

impl Drop for QueryTimer {
    fn drop(&mut self) {
        if !self.finished {
            RetailPriceMetrics::record_query_failed("abandoned", self.start.elapsed());
        }
    }
}
