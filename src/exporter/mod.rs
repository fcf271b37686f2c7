//! Core reconciliation engine
//!
//! This module contains the entity model, the allocation correlator, the
//! known-node registry with its per-poll reconciliation, the metric
//! definitions and the poll loop that drives them.

pub mod correlate;
pub mod metrics;
pub mod model;
pub mod poller;
pub mod registry;

pub use poller::Poller;
pub use registry::{NodeRegistry, SharedRegistry};
