//! Prometheus metrics for nomad node states

use once_cell::sync::Lazy;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::atomic::{AtomicI64, AtomicU64};

use super::model::NodeLabels;

/// Gauge tracking the maintenance status per node
pub static MAINTENANCE_STATUS: Lazy<Family<NodeLabels, Gauge<i64, AtomicI64>>> =
    Lazy::new(Family::default);

/// Gauge tracking the busy status per node
pub static BUSY_STATUS: Lazy<Family<NodeLabels, Gauge<f64, AtomicU64>>> =
    Lazy::new(Family::default);

/// Counter of failed poll cycles since startup
pub static FETCH_FAILURES: Lazy<Counter> = Lazy::new(Counter::default);

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::default();
    registry.register(
        "node_maintenance_status",
        "The maintenance status of a nomad node 0:ONLINE 1:MAINTENANCE 2:OFFLINE",
        MAINTENANCE_STATUS.clone(),
    );
    registry.register(
        "node_busy_status",
        "The busy status of a nomad node 0:IDLE 1:BUSY",
        BUSY_STATUS.clone(),
    );
    registry.register(
        "node_exporter_failure",
        "The number of failures to fetch or parse api data since startup",
        FETCH_FAILURES.clone(),
    );
    registry
});

/// Overwrite both gauge series for a node with freshly computed values
pub fn set_node_status(labels: &NodeLabels, maintenance: i64, busy: f64) {
    MAINTENANCE_STATUS.get_or_create(labels).set(maintenance);
    BUSY_STATUS.get_or_create(labels).set(busy);
}

/// Drop both gauge series for a node that disappeared from the scheduler
pub fn retract_node(labels: &NodeLabels) {
    MAINTENANCE_STATUS.remove(labels);
    BUSY_STATUS.remove(labels);
}

/// Record one failed fetch/decode poll cycle
pub fn record_fetch_failure() {
    FETCH_FAILURES.inc();
}
