//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Remote catalog requests (by endpoint and outcome)
//! - Cache fallbacks (offline serves)
//! - Cache writes (snapshot and write-through persists)

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts, Registry};

/// Remote catalog requests by endpoint and outcome.
pub static REMOTE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gamedex_remote_requests_total",
            "Total remote catalog requests",
        ),
        &["endpoint", "outcome"], // endpoint: "games", "game_details", ... outcome: "ok", "error"
    )
    .unwrap()
});

/// Requests served from the cache after the remote came up empty.
pub static CACHE_FALLBACKS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gamedex_cache_fallbacks_total",
            "Requests answered from the local cache after a remote miss",
        ),
        &["endpoint"],
    )
    .unwrap()
});

/// Records written into the cache.
pub static CACHE_WRITES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gamedex_cache_writes_total",
            "Records written into the local cache",
        ),
        &["entity"], // "games", "genres"
    )
    .unwrap()
});

/// Register all core metrics into the given registry.
///
/// Registration errors are ignored so repeated calls (tests, restarts of
/// the in-process server) stay harmless.
pub fn register_metrics(registry: &Registry) {
    let _ = registry.register(Box::new(REMOTE_REQUESTS.clone()));
    let _ = registry.register(Box::new(CACHE_FALLBACKS.clone()));
    let _ = registry.register(Box::new(CACHE_WRITES.clone()));
}
