//! Observability utilities for the Azure prices tooling.
//!
//! This crate provides:
//! - Metrics for retail price queries, recorded through the `metrics` facade
//! - An optional Prometheus recorder for processes that want to export them
//!
//! Recording is a no-op until a recorder is installed, so libraries can
//! record unconditionally.
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, RetailPriceMetrics};
//!
//! let handle = init_metrics()?;
//! RetailPriceMetrics::record_retry();
//! println!("{}", handle.render());
//! ```

pub mod retail;

pub use retail::{QueryTimer, RetailPriceMetrics};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder as the global recorder.
///
/// Later calls return the handle from the first successful call.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");

        describe_metrics();
        Ok(handle)
    })
}

/// Get the metrics handle (`None` until [`init_metrics`] succeeds)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Render all metrics in Prometheus text format.
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        retail::REQUESTS_TOTAL,
        "HTTP attempts against the Retail Prices API by outcome"
    );
    describe_counter!(retail::RETRIES_TOTAL, "Retried HTTP attempts");
    describe_counter!(retail::PAGES_TOTAL, "Result pages fetched");
    describe_counter!(
        retail::QUERIES_TOTAL,
        "Price queries by final status or error category"
    );
    describe_histogram!(
        retail::QUERY_DURATION_SECONDS,
        Unit::Seconds,
        "Price query duration including retries and pagination"
    );
    describe_gauge!(
        retail::ITEMS_LAST_QUERY,
        "Items returned by the most recent successful query"
    );
}
