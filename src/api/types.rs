//! Serde views of the nomad api payloads
//!
//! Only the fields needed for the derived signals are modeled; the rest of
//! each payload is ignored.

use serde::Deserialize;

/// One element of `GET /v1/nodes`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    #[serde(default)]
    pub name: String,

    /// `"eligible"` or `"ineligible"`
    #[serde(default)]
    pub scheduling_eligibility: String,

    /// `"ready"`, `"down"` or other scheduler states
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub node_class: String,

    #[serde(default)]
    pub datacenter: String,
}

/// One element of `GET /v1/allocations`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Allocation {
    /// Name of the node the allocation is placed on
    #[serde(default)]
    pub node_name: String,

    /// Filtered server-side to `"running"`
    #[serde(default)]
    pub client_status: String,
}
