//! HTTP client for the sensor's metrics feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;

/// Request timeout for a single feed fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of metrics feed bodies.
///
/// Abstracts the HTTP fetch so the bridge loop can run against scripted
/// feeds in tests; see [`crate::MockSource`].
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch one feed body.
    async fn fetch(&self) -> Result<String>;

    /// Human-readable endpoint description for log lines.
    fn endpoint(&self) -> &str;
}

/// Client for the line-oriented metrics feed exposed by the sensor host.
///
/// The feed is plain text, one metric per line (`<name> <value>`), served at
/// the root of `{host}:{port}` with no path component.
#[derive(Debug, Clone)]
pub struct SensorClient {
    client: Client,
    endpoint: String,
}

impl SensorClient {
    /// Create a client for `host:port`.
    ///
    /// `host` carries the scheme (e.g. `http://192.168.1.50`); the endpoint
    /// is the plain concatenation `host:port`, matching the exporter's
    /// layout.
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: format!("{host}:{port}"),
        }
    }
}

#[async_trait]
impl MetricsSource for SensorClient {
    /// Fetch the feed body once.
    ///
    /// Any transport failure (refused connection, DNS failure, timeout) is an
    /// error; no retries happen here. A non-success HTTP status is not an
    /// error: the body is returned exactly as the exporter served it. The
    /// body is fully read before returning, so repeated cycles do not leak
    /// connections.
    async fn fetch(&self) -> Result<String> {
        let response = self.client.get(&self.endpoint).send().await?;
        debug!(status = %response.status(), "fetched metrics feed");
        Ok(response.text().await?)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_host_port_concatenation() {
        let client = SensorClient::new("http://0.0.0.0", 1006);
        assert_eq!(client.endpoint(), "http://0.0.0.0:1006");
    }

    #[test]
    fn test_endpoint_keeps_host_scheme() {
        let client = SensorClient::new("http://sensor.local", 9100);
        assert_eq!(client.endpoint(), "http://sensor.local:9100");
    }
}
