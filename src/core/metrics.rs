//! Prometheus metrics for the resolver
//!
//! Tracks request outcomes, extractor latency and cache effectiveness.
#![allow(clippy::unwrap_used)]

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static! {
    /// Handled resolve requests
    /// Labels: action (metadata/download)
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "vidresolve_requests_total",
        "Total number of resolve requests by action",
        &["action"]
    )
    .unwrap();

    /// Failed resolve requests
    /// Labels: kind (invalid_input/video_unavailable/no_matching_format/timeout/...)
    pub static ref REQUESTS_FAILED_TOTAL: CounterVec = register_counter_vec!(
        "vidresolve_requests_failed_total",
        "Total number of failed resolve requests by error kind",
        &["kind"]
    )
    .unwrap();

    /// Extractor call duration in seconds
    /// Labels: source (yt-dlp/...), outcome (ok/error/timeout)
    pub static ref EXTRACTION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "vidresolve_extraction_duration_seconds",
        "Time spent waiting for the metadata extractor",
        &["source", "outcome"],
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]
    )
    .unwrap();

    /// Metadata cache lookups
    /// Labels: result (hit/miss)
    pub static ref CACHE_LOOKUPS_TOTAL: CounterVec = register_counter_vec!(
        "vidresolve_cache_lookups_total",
        "Metadata cache lookups by result",
        &["result"]
    )
    .unwrap();
}

/// Records a finished extractor call
pub fn record_extraction(source: &str, outcome: &str, seconds: f64) {
    EXTRACTION_DURATION_SECONDS
        .with_label_values(&[source, outcome])
        .observe(seconds);
}

/// Records a handled request
pub fn record_request(action: &str) {
    REQUESTS_TOTAL.with_label_values(&[action]).inc();
}

/// Records a failed request
pub fn record_failure(kind: &str) {
    REQUESTS_FAILED_TOTAL.with_label_values(&[kind]).inc();
}

/// Records a cache lookup
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    CACHE_LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}
