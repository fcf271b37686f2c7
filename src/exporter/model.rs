//! Entity model for worker nodes and their derived signals

use prometheus_client::encoding::EncodeLabelSet;

use crate::api::types::Node;

/// Labels identifying one node's metric series
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct NodeLabels {
    pub name: String,
    pub datacenter: String,
    pub node_class: String,
}

/// Maintenance signal of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceState {
    Online = 0,
    Maintenance = 1,
    Offline = 2,
}

impl MaintenanceState {
    pub fn as_gauge(self) -> i64 {
        self as i64
    }
}

/// Snapshot of one worker node at a single poll instant
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub name: String,
    pub scheduling_eligibility: String,
    pub status: String,
    pub node_class: String,
    pub datacenter: String,
    /// Set once per poll by the correlator. 0: idle, 1: busy
    pub busy: f64,
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            name: node.name,
            scheduling_eligibility: node.scheduling_eligibility,
            status: node.status,
            node_class: node.node_class,
            datacenter: node.datacenter,
            busy: 0.0,
        }
    }
}

impl NodeRecord {
    /// Derive the maintenance signal. Ineligibility dominates downtime: a
    /// node that is both ineligible and down reports Maintenance, not
    /// Offline.
    pub fn maintenance_state(&self) -> MaintenanceState {
        if self.scheduling_eligibility == "ineligible" {
            MaintenanceState::Maintenance
        } else if self.status == "down" {
            MaintenanceState::Offline
        } else {
            MaintenanceState::Online
        }
    }

    /// The busy signal computed by the correlator for this poll
    pub fn busy_status(&self) -> f64 {
        self.busy
    }

    /// Composite key under which the registry and both gauge series track
    /// this node. Depends only on name, datacenter and node class.
    pub fn identity_key(&self) -> String {
        format!("{}_{}_{}", self.name, self.datacenter, self.node_class)
    }

    pub fn labels(&self) -> NodeLabels {
        NodeLabels {
            name: self.name.clone(),
            datacenter: self.datacenter.clone(),
            node_class: self.node_class.clone(),
        }
    }
}
