// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order creation (successes, failures by reason)
// - Status transitions (from/to)
// - Products service round trips (outcome, latency)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Order Metrics
    pub orders_created: IntCounter,
    pub order_creation_failures: IntCounterVec,
    pub status_changes: IntCounterVec,

    // Catalog Metrics
    pub catalog_requests: IntCounterVec,
    pub catalog_request_duration: Histogram,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Order Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_creation_failures = IntCounterVec::new(
            Opts::new("order_creation_failures_total", "Total failed order creations"),
            &["reason"],
        )?;
        registry.register(Box::new(order_creation_failures.clone()))?;

        let status_changes = IntCounterVec::new(
            Opts::new("order_status_changes_total", "Total applied order status changes"),
            &["from", "to"],
        )?;
        registry.register(Box::new(status_changes.clone()))?;

        // Catalog Metrics
        let catalog_requests = IntCounterVec::new(
            Opts::new("catalog_requests_total", "Total product validation requests"),
            &["outcome"],
        )?;
        registry.register(Box::new(catalog_requests.clone()))?;

        let catalog_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "catalog_request_duration_seconds",
                "Product validation round-trip duration",
            )
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(catalog_request_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_creation_failures,
            status_changes,
            catalog_requests,
            catalog_request_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_created(&self) {
        self.orders_created.inc();
    }

    pub fn record_order_creation_failure(&self, reason: &str) {
        self.order_creation_failures.with_label_values(&[reason]).inc();
    }

    pub fn record_status_change(&self, from: &str, to: &str) {
        self.status_changes.with_label_values(&[from, to]).inc();
    }

    pub fn record_catalog_request(&self, outcome: &str, duration_secs: f64) {
        self.catalog_requests.with_label_values(&[outcome]).inc();
        self.catalog_request_duration.observe(duration_secs);
    }
}
