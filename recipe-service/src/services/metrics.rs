//! Metrics module for recipe-service.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "recipe_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Generative backend call counter
pub static GENAI_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Nutrition API search counter
pub static RECIPE_SEARCHES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    GENAI_REQUESTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "recipe_genai_requests_total",
                "Generative backend calls by operation and outcome"
            ),
            &["operation", "outcome"]
        )
        .expect("Failed to register GENAI_REQUESTS_TOTAL")
    });

    RECIPE_SEARCHES_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "recipe_searches_total",
                "Nutrition API searches by outcome"
            ),
            &["outcome"]
        )
        .expect("Failed to register RECIPE_SEARCHES_TOTAL")
    });

    // Force initialization of lazy statics
    let _ = &*DB_QUERY_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}

/// Record a generative backend call.
pub fn record_genai_request(operation: &str, outcome: &str) {
    if let Some(counter) = GENAI_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
}

/// Record a nutrition API search.
pub fn record_recipe_search(outcome: &str) {
    if let Some(counter) = RECIPE_SEARCHES_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}
