//! Prometheus metrics for the dayoff server.
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping.
//! Metrics carry no usernames, tokens or dates, only aggregate counts.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{self, Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static USERS_REGISTERED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dayoff_users_registered_total",
        "Total number of users created, root included",
    )
    .expect("metric creation failed")
});

pub static REGISTRATION_CONFLICTS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dayoff_registration_conflicts_total",
        "Total registrations rejected because the username exists",
    )
    .expect("metric creation failed")
});

pub static LOOKUPS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dayoff_lookups_total",
            "Total resolved day lookups by answer source",
        ),
        &["source"],
    )
    .expect("metric creation failed")
});

pub static OVERRIDE_WRITES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dayoff_override_writes_total",
            "Total override writes by outcome",
        ),
        &["outcome"],
    )
    .expect("metric creation failed")
});

pub static AUTH_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dayoff_auth_failures_total",
            "Total authorization failures by reason",
        ),
        &["reason"],
    )
    .expect("metric creation failed")
});

pub static CALENDAR_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dayoff_calendar_failures_total",
        "Total holiday calendar lookups that failed",
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
/// Safe to call more than once.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(USERS_REGISTERED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(REGISTRATION_CONFLICTS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(LOOKUPS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(OVERRIDE_WRITES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(AUTH_FAILURES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CALENDAR_FAILURES.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record an authorization failure.
pub fn record_auth_failure(reason: &str) {
    AUTH_FAILURES.with_label_values(&[reason]).inc();
}

/// Record a lookup answered from `source`.
pub fn record_lookup(source: &str) {
    LOOKUPS.with_label_values(&[source]).inc();
}

/// Record an override write by outcome.
pub fn record_override_write(outcome: &str) {
    OVERRIDE_WRITES.with_label_values(&[outcome]).inc();
}
