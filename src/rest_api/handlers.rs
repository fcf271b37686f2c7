//! Request handlers for the REST API

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::exporter::SharedRegistry;

/// JSON view of one known node, as of the last successful poll
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatusResponse {
    pub name: String,
    pub datacenter: String,
    pub node_class: String,
    pub maintenance_status: i64,
    pub busy_status: f64,
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// List the nodes currently tracked by the registry
pub async fn list_nodes(State(registry): State<SharedRegistry>) -> Json<Vec<NodeStatusResponse>> {
    let registry = registry.read().await;

    let mut nodes: Vec<NodeStatusResponse> = registry
        .records()
        .map(|record| NodeStatusResponse {
            name: record.name.clone(),
            datacenter: record.datacenter.clone(),
            node_class: record.node_class.clone(),
            maintenance_status: record.maintenance_state().as_gauge(),
            busy_status: record.busy_status(),
        })
        .collect();
    nodes.sort_by(|a, b| a.name.cmp(&b.name));

    Json(nodes)
}
