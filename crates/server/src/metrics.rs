use std::time::Instant;

use axum::{extract::{MatchedPath, Request}, http::StatusCode, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter, Encoder, HistogramVec, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static PAGE_SAVES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("storefront_page_saves_total", "Page-editor documents saved")
        .expect("register page_saves_total")
});

pub static PAGE_LOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("storefront_page_loads_total", "Page-editor documents loaded")
        .expect("register page_loads_total")
});

pub static ORDERS_PLACED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("storefront_orders_placed_total", "Orders placed")
        .expect("register orders_placed_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "storefront_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "route", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register http_request_duration")
});

/// Route-level middleware observing every request's latency.
pub async fn track_http(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    // Matched template keeps label cardinality bounded.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let started = Instant::now();
    let response = next.run(req).await;
    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &route, response.status().as_str()])
        .observe(started.elapsed().as_secs_f64());
    response
}

pub async fn metrics_handler() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
