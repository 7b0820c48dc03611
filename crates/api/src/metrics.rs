// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::Response,
};
use prometheus::{
    Encoder, Gauge, HistogramVec, IntCounterVec, TextEncoder, register_gauge,
    register_histogram_vec, register_int_counter_vec,
};

/// Total number of property list requests, labeled by response status.
pub static REQUESTS_BY_STATUS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "blob_api_requests_total",
        "Total number of property list requests, labeled by response status",
        &["status"]
    )
    .expect("Failed to create blob_api_requests_total counter vec")
});

/// Histogram for blob fetch durations in seconds.
pub static BLOB_FETCH_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "blob_api_fetch_duration_seconds",
        "Blob fetch durations in seconds",
        &["result"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create blob fetch duration histogram")
});

/// Number of records in the most recent successful fetch
pub static LAST_RECORD_COUNT: LazyLock<Gauge> = LazyLock::new(|| {
    register_gauge!(
        "blob_api_last_record_count",
        "Number of property records returned by the most recent successful fetch"
    )
    .expect("Failed to create last record count gauge")
});

/// Increment the requests counter with the response status label
pub fn inc_requests_by_status(status: StatusCode) {
    REQUESTS_BY_STATUS
        .with_label_values(&[status.as_str()])
        .inc();
}

/// Observe the duration of a blob fetch
///
/// # Arguments
/// * `result` - `success`, or the blob error kind
/// * `duration_secs` - The duration of the fetch in seconds
pub fn observe_blob_fetch_duration(result: &str, duration_secs: f64) {
    BLOB_FETCH_DURATION
        .with_label_values(&[result])
        .observe(duration_secs);
}

/// Record how many properties the latest successful fetch returned
pub fn set_last_record_count(count: usize) {
    #[allow(clippy::cast_precision_loss)]
    LAST_RECORD_COUNT.set(count as f64);
}

/// Axum handler that exports metrics in Prometheus text format
///
/// # Panics
///
/// This function will panic if:
/// - The metrics encoder fails to encode the metrics data
/// - The UTF-8 conversion of the encoded buffer fails
/// - The HTTP response builder fails to create the response
pub async fn metrics_handler() -> Response<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(String::from_utf8(buffer).expect("metrics buffer should be valid UTF-8"))
        .expect("Failed to create metrics response")
}
