use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::ProbeError;
use crate::filter::status_policy::StatusPolicy;

/// Outcome of one request that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: u16,
    /// Measured only when the status is one the policy could report.
    pub body_length: Option<u64>,
}

/// Issues one request for a composed URL.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError>;
}

/// Prober backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    method: Method,
    policy: Arc<StatusPolicy>,
}

impl HttpProber {
    /// Redirect handling and timeouts come from how `client` was built.
    pub fn new(client: Client, method: Method, policy: Arc<StatusPolicy>) -> Self {
        Self { client, method, policy }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError> {
        let start = Instant::now();
        let mut resp = self.client.request(self.method.clone(), url).send().await?;
        let status = resp.status().as_u16();

        // Bodies of responses that can never match are left unread.
        let body_length = if self.policy.allows(status) {
            let mut total = 0u64;
            while let Some(chunk) = resp.chunk().await? {
                total += chunk.len() as u64;
            }
            Some(total)
        } else {
            None
        };

        tracing::debug!(
            url,
            status,
            size = ?body_length,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "probe complete"
        );
        Ok(ProbeResult { status, body_length })
    }
}
