//! The poll loop driving fetch, correlation and reconciliation

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::NomadClient;
use crate::error::Result;

use super::correlate::mark_busy;
use super::metrics;
use super::model::NodeRecord;
use super::registry::SharedRegistry;

/// Delay before retrying after a failed poll cycle, distinct from the
/// configured poll interval
const FAILURE_BACKOFF: Duration = Duration::from_secs(5);

/// Background task polling the nomad api and reconciling node state
pub struct Poller {
    client: NomadClient,
    registry: SharedRegistry,
    interval: Duration,
}

impl Poller {
    pub fn new(client: NomadClient, registry: SharedRegistry, interval: Duration) -> Self {
        Self {
            client,
            registry,
            interval,
        }
    }

    /// Run until the token is cancelled. A failed cycle leaves the registry
    /// and all gauges untouched and retries after a short backoff.
    pub async fn run(self, cancel: CancellationToken) {
        info!("starting node poller (interval: {:?})", self.interval);

        loop {
            let delay = match self.poll_once().await {
                Ok(count) => {
                    debug!("reconciled {} nodes", count);
                    self.interval
                }
                Err(e) => {
                    warn!("poll cycle failed ({}), retrying in {:?}", e, FAILURE_BACKOFF);
                    FAILURE_BACKOFF
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("node poller shutting down");
                    return;
                }
                _ = sleep(delay) => {}
            }
        }
    }

    /// Run a single fetch, correlate and reconcile cycle.
    ///
    /// On a fetch or decode failure the cycle is abandoned before
    /// reconciliation and the failure counter is incremented once.
    pub async fn poll_once(&self) -> Result<usize> {
        match self.fetch_and_reconcile().await {
            Ok(count) => Ok(count),
            Err(e) => {
                metrics::record_fetch_failure();
                Err(e)
            }
        }
    }

    async fn fetch_and_reconcile(&self) -> Result<usize> {
        let nodes = self.client.list_nodes().await?;
        let allocations = self.client.list_allocations().await?;

        let mut records: Vec<NodeRecord> = nodes.into_iter().map(NodeRecord::from).collect();
        mark_busy(&mut records, &allocations);

        let count = records.len();
        self.registry.write().await.reconcile(records);
        Ok(count)
    }
}
