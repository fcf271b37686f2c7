//! Known-node registry and per-poll reconciliation

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::metrics;
use super::model::NodeRecord;

/// Registry handle shared between the poll loop (writer) and the REST api
/// (reader)
pub type SharedRegistry = Arc<RwLock<NodeRegistry>>;

/// Mapping from identity key to the last-seen record for that node
///
/// An entry appears the first poll its key is observed, is replaced on every
/// poll where the key reappears, and is removed together with its gauge
/// series the first poll the key is absent from the node list.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    known: HashMap<String, NodeRecord>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.known.contains_key(key)
    }

    /// Iterate over the records of the last successful poll
    pub fn records(&self) -> impl Iterator<Item = &NodeRecord> {
        self.known.values()
    }

    /// Reconcile the registry and the gauge series against one poll's node
    /// list.
    ///
    /// Every current node gets both gauges overwritten with freshly computed
    /// values. Every previously known node missing from the current list has
    /// its series retracted and its entry dropped. Afterwards the registry's
    /// key set equals the key set of `current`.
    pub fn reconcile(&mut self, current: Vec<NodeRecord>) {
        let mut live = HashSet::with_capacity(current.len());

        for record in current {
            let key = record.identity_key();
            metrics::set_node_status(
                &record.labels(),
                record.maintenance_state().as_gauge(),
                record.busy_status(),
            );
            live.insert(key.clone());
            self.known.insert(key, record);
        }

        let vanished: Vec<String> = self
            .known
            .keys()
            .filter(|key| !live.contains(*key))
            .cloned()
            .collect();

        for key in vanished {
            if let Some(record) = self.known.remove(&key) {
                info!("node {} was removed from the scheduler, retracting metrics", key);
                metrics::retract_node(&record.labels());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use prometheus_client::encoding::text::encode;

    use super::*;
    use crate::exporter::metrics::{BUSY_STATUS, MAINTENANCE_STATUS, REGISTRY};

    fn record(name: &str, eligibility: &str, status: &str, busy: f64) -> NodeRecord {
        NodeRecord {
            name: name.to_string(),
            scheduling_eligibility: eligibility.to_string(),
            status: status.to_string(),
            node_class: "batch".to_string(),
            datacenter: "dc1".to_string(),
            busy,
        }
    }

    fn exposition() -> String {
        let mut buffer = String::new();
        encode(&mut buffer, &REGISTRY).unwrap();
        buffer
    }

    #[test]
    fn registry_key_set_converges_to_the_current_node_list() {
        let mut registry = NodeRegistry::new();

        registry.reconcile(vec![
            record("conv-a", "eligible", "ready", 0.0),
            record("conv-b", "eligible", "ready", 1.0),
        ]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("conv-a_dc1_batch"));
        assert!(registry.contains("conv-b_dc1_batch"));

        registry.reconcile(vec![record("conv-c", "eligible", "ready", 0.0)]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("conv-c_dc1_batch"));

        registry.reconcile(vec![]);
        assert!(registry.is_empty());
    }

    #[test]
    fn vanished_node_has_its_series_retracted() {
        let mut registry = NodeRegistry::new();

        registry.reconcile(vec![
            record("gone-a", "eligible", "ready", 1.0),
            record("gone-b", "eligible", "ready", 0.0),
        ]);
        let before = exposition();
        assert!(before.contains(r#"name="gone-a""#));
        assert!(before.contains(r#"name="gone-b""#));

        registry.reconcile(vec![record("gone-b", "eligible", "ready", 0.0)]);
        let after = exposition();
        assert!(!after.contains(r#"name="gone-a""#));
        assert!(after.contains(r#"name="gone-b""#));
        assert!(!registry.contains("gone-a_dc1_batch"));
    }

    #[test]
    fn reappearing_key_is_updated_in_place() {
        let mut registry = NodeRegistry::new();

        registry.reconcile(vec![record("upd-a", "eligible", "ready", 0.0)]);
        let labels = record("upd-a", "eligible", "ready", 0.0).labels();
        assert_eq!(MAINTENANCE_STATUS.get_or_create(&labels).get(), 0);

        registry.reconcile(vec![record("upd-a", "ineligible", "ready", 1.0)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(MAINTENANCE_STATUS.get_or_create(&labels).get(), 1);
        assert_eq!(BUSY_STATUS.get_or_create(&labels).get(), 1.0);
    }

    #[test]
    fn mixed_poll_sets_gauges_then_retracts_the_vanished_node() {
        let mut registry = NodeRegistry::new();

        // Poll N: an eligible busy node and an ineligible idle one
        registry.reconcile(vec![
            record("mix-a", "eligible", "ready", 1.0),
            record("mix-b", "ineligible", "ready", 0.0),
        ]);
        assert_eq!(registry.len(), 2);

        let a = record("mix-a", "eligible", "ready", 1.0).labels();
        let b = record("mix-b", "ineligible", "ready", 0.0).labels();
        assert_eq!(MAINTENANCE_STATUS.get_or_create(&a).get(), 0);
        assert_eq!(BUSY_STATUS.get_or_create(&a).get(), 1.0);
        assert_eq!(MAINTENANCE_STATUS.get_or_create(&b).get(), 1);
        assert_eq!(BUSY_STATUS.get_or_create(&b).get(), 0.0);

        // Poll N+1: only the second node remains
        registry.reconcile(vec![record("mix-b", "ineligible", "ready", 0.0)]);
        assert_eq!(registry.len(), 1);
        assert!(!exposition().contains(r#"name="mix-a""#));
    }
}
