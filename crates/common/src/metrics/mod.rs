//! Metrics and observability utilities
//!
//! Metric names are prefixed with [`METRICS_PREFIX`]. The recorder itself is
//! installed by the binary; without one every call here is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics prefix for all Constellation metrics
pub const METRICS_PREFIX: &str = "constellation";

/// Buckets for upstream latency (Wikipedia round trips)
pub const UPSTREAM_BUCKETS: &[f64] = &[
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.000,  // 2s
    5.000,  // 5s
    10.00,  // 10s
];

/// Buckets for whole constellation builds (sequential fetches with delays)
pub const BUILD_BUCKETS: &[f64] = &[
    0.5,
    1.0,
    2.5,
    5.0,
    10.0,
    20.0,
    40.0,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_wiki_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of Wikipedia API requests"
    );

    describe_histogram!(
        format!("{}_wiki_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Wikipedia API latency in seconds"
    );

    describe_counter!(
        format!("{}_builds_total", METRICS_PREFIX),
        Unit::Count,
        "Total constellation builds by outcome"
    );

    describe_histogram!(
        format!("{}_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Constellation build latency in seconds"
    );

    describe_histogram!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Nodes per constellation"
    );

    describe_histogram!(
        format!("{}_graph_links", METRICS_PREFIX),
        Unit::Count,
        "Links per constellation"
    );

    tracing::info!("Metrics registered");
}

/// Record one upstream round trip
pub fn record_wiki_request(kind: &str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_wiki_requests_total", METRICS_PREFIX),
        "kind" => kind.to_string(),
        "status" => status
    )
    .increment(1);

    histogram!(
        format!("{}_wiki_request_duration_seconds", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .record(duration_secs);
}

/// Record a finished constellation build
pub fn record_build(duration_secs: f64, outcome: &str, nodes: usize, links: usize) {
    counter!(
        format!("{}_builds_total", METRICS_PREFIX),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(format!("{}_build_duration_seconds", METRICS_PREFIX)).record(duration_secs);

    if outcome == "success" {
        histogram!(format!("{}_graph_nodes", METRICS_PREFIX)).record(nodes as f64);
        histogram!(format!("{}_graph_links", METRICS_PREFIX)).record(links as f64);
    }
}
