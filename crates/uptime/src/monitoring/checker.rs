use anyhow::{Result, anyhow};
use reqwest::{Method, StatusCode};
use std::time::{Duration, Instant};
use tracing::debug;

use super::types::{ProbeResult, ProbeStatus};
use crate::config::MonitorSettings;
use crate::endpoint::EndpointDescriptor;
use crate::error::MonitorError;

/// Probes one endpoint and classifies the outcome.
///
/// Implementations must absorb every failure into a DOWN result; nothing
/// a single endpoint does may abort the cycle.
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, endpoint: &EndpointDescriptor) -> ProbeResult;
}

/// UP iff the status is 2xx and the response arrived strictly within `threshold`
pub fn classify(status: StatusCode, elapsed: Duration, threshold: Duration) -> ProbeStatus {
    if status.is_success() && elapsed < threshold {
        ProbeStatus::Up
    } else {
        ProbeStatus::Down
    }
}

/// HTTP/HTTPS checker sharing one client across all probes
pub struct HttpChecker {
    client: reqwest::Client,
    latency_threshold: Duration,
}

impl HttpChecker {
    pub fn new(settings: &MonitorSettings) -> Result<Self, MonitorError> {
        let mut builder = reqwest::Client::builder().user_agent(&settings.user_agent).no_proxy();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self { client: builder.build()?, latency_threshold: settings.latency_threshold() })
    }

    /// Send the request, returning the status and the time to response headers
    async fn send(&self, endpoint: &EndpointDescriptor) -> Result<(StatusCode, Duration)> {
        let method = Method::from_bytes(endpoint.method.to_uppercase().as_bytes())
            .map_err(|_| anyhow!("Unsupported HTTP method: {}", endpoint.method))?;

        let mut request = self.client.request(method, &endpoint.url);
        for (key, value) in &endpoint.headers {
            request = request.header(key, value);
        }
        if let Some(body) = &endpoint.body {
            request = request.body(body.clone());
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|e| anyhow!("HTTP request failed: {}", e))?;
        let elapsed = start.elapsed();

        Ok((response.status(), elapsed))
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, endpoint: &EndpointDescriptor) -> ProbeResult {
        let domain = endpoint.domain();

        let status = match self.send(endpoint).await {
            Ok((status_code, elapsed)) => {
                let status = classify(status_code, elapsed, self.latency_threshold);
                debug!(
                    endpoint = endpoint.label(),
                    status_code = status_code.as_u16(),
                    latency_ms = elapsed.as_millis() as u64,
                    %status,
                    "probe completed"
                );
                status
            }
            Err(e) => {
                debug!(endpoint = endpoint.label(), error = %e, "probe failed");
                ProbeStatus::Down
            }
        };

        ProbeResult { domain, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_millis(500);

    #[test]
    fn fast_2xx_is_up() {
        assert_eq!(classify(StatusCode::OK, Duration::from_millis(100), THRESHOLD), ProbeStatus::Up);
        assert_eq!(
            classify(StatusCode::NO_CONTENT, Duration::from_millis(499), THRESHOLD),
            ProbeStatus::Up
        );
    }

    #[test]
    fn latency_threshold_is_exclusive() {
        assert_eq!(classify(StatusCode::OK, THRESHOLD, THRESHOLD), ProbeStatus::Down);
        assert_eq!(
            classify(StatusCode::OK, Duration::from_millis(600), THRESHOLD),
            ProbeStatus::Down
        );
    }

    #[test]
    fn non_2xx_is_down_however_fast() {
        for code in [199, 300, 301, 404, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(
                classify(status, Duration::from_millis(1), THRESHOLD),
                ProbeStatus::Down,
                "status {code}"
            );
        }
        assert_eq!(
            classify(StatusCode::from_u16(299).unwrap(), Duration::ZERO, THRESHOLD),
            ProbeStatus::Up
        );
    }

    #[tokio::test]
    async fn closed_port_is_down() {
        let checker = HttpChecker::new(&MonitorSettings::default()).unwrap();
        let result = checker.check(&EndpointDescriptor::new("http://127.0.0.1:1/health")).await;
        assert_eq!(result, ProbeResult::down("127.0.0.1:1"));
    }

    #[tokio::test]
    async fn unparseable_url_is_down() {
        let checker = HttpChecker::new(&MonitorSettings::default()).unwrap();
        let result = checker.check(&EndpointDescriptor::new("https://")).await;
        assert_eq!(result.status, ProbeStatus::Down);
        assert_eq!(result.domain, "https://");
    }
}
