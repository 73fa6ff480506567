use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::config::RunConfig;
use crate::error::FuzzError;

const USER_AGENT: &str = concat!("webfuzz/", env!("CARGO_PKG_VERSION"));

/// Settings that shape the shared probe client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub max_idle_per_host: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            follow_redirects: false,
            max_idle_per_host: 10,
        }
    }
}

impl From<&RunConfig> for ClientSettings {
    fn from(config: &RunConfig) -> Self {
        Self {
            timeout: config.timeout,
            follow_redirects: config.follow_redirects,
            max_idle_per_host: config.concurrency,
        }
    }
}

/// Build the single client used for every probe of a run.
pub fn create_probe_client(settings: &ClientSettings) -> Result<Client, FuzzError> {
    let redirect = if settings.follow_redirects {
        reqwest::redirect::Policy::limited(10)
    } else {
        // Stop at the first hop so its 3xx status is what gets classified.
        reqwest::redirect::Policy::none()
    };

    let client = ClientBuilder::new()
        // Connection pooling - one idle slot per worker is enough
        .pool_max_idle_per_host(settings.max_idle_per_host)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .tcp_nodelay(true)

        // Timeouts
        .timeout(settings.timeout)
        .connect_timeout(settings.timeout.min(Duration::from_secs(5)))

        // Compression
        .gzip(true)
        .brotli(true)

        // TLS
        .use_rustls_tls()
        .https_only(false)
        // Targets under test often run self-signed certificates
        .danger_accept_invalid_certs(true)

        .redirect(redirect)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
