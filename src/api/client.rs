//! Authenticated HTTP client for the nomad api
//!
//! One `reqwest::Client` is built at startup and reused for every poll. The
//! pool keeps at most one idle connection to the scheduler, and the two
//! fetches of a poll cycle are awaited sequentially, so the load on the
//! nomad api stays at one in-flight request.

use std::time::Duration;

use reqwest::{Certificate, Client, Identity};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Error, Result};

use super::types::{Allocation, Node};

/// Per-request timeout so one slow endpoint cannot stall the poll loop
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the two nomad endpoints the exporter consumes
pub struct NomadClient {
    http: Client,
    base_url: String,
    allocation_filter: String,
}

impl NomadClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(1)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ));

        if let Some(tls) = &settings.tls {
            let mut identity_pem = tls.cert_pem.clone();
            identity_pem.extend_from_slice(&tls.key_pem);

            let identity = Identity::from_pem(&identity_pem)
                .map_err(|e| Error::ConfigError(format!("failed to create identity: {}", e)))?;

            let ca_cert = Certificate::from_pem(&tls.ca_pem)
                .map_err(|e| Error::ConfigError(format!("failed to parse CA cert: {}", e)))?;

            builder = builder.identity(identity).add_root_certificate(ca_cert);
        }

        let http = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.address.clone(),
            allocation_filter: settings.allocation_filter.clone(),
        })
    }

    /// List all worker nodes known to the scheduler
    pub async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.get_json("/v1/nodes", &[]).await
    }

    /// List running allocations, narrowed by the operator-supplied filter
    pub async fn list_allocations(&self) -> Result<Vec<Allocation>> {
        let filter = if self.allocation_filter.is_empty() {
            r#"ClientStatus contains "running""#.to_string()
        } else {
            format!(
                r#"ClientStatus contains "running" and {}"#,
                self.allocation_filter
            )
        };

        self.get_json("/v1/allocations", &[("task_states", "False"), ("filter", &filter)])
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("fetching {}", url);

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiStatus {
                endpoint: path.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
