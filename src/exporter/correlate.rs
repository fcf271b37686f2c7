//! Correlation of nodes with running allocations

use crate::api::types::Allocation;

use super::model::NodeRecord;

/// Mark each node busy when at least one returned allocation is placed on
/// it. First match wins; nodes with no matching allocation stay idle.
pub fn mark_busy(nodes: &mut [NodeRecord], allocations: &[Allocation]) {
    for node in nodes.iter_mut() {
        node.busy = if allocations.iter().any(|alloc| alloc.node_name == node.name) {
            1.0
        } else {
            0.0
        };
    }
}
