use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::Result;
use crate::models::{ProbeOutcome, ProbeResult};
use crate::utils::error_chain;

/// One network check against a url. Implementations never fail: every
/// outcome is folded into the returned `ProbeResult`.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeResult;
}

pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    async fn attempt(&self, url: &str) -> ProbeOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };
        match response.error_for_status() {
            Ok(response) => ProbeOutcome::Response(response.status().as_u16()),
            Err(e) => classify_error(&e),
        }
    }
}

fn classify_error(err: &reqwest::Error) -> ProbeOutcome {
    if let Some(status) = err.status() {
        return ProbeOutcome::HttpError {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        };
    }
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_redirect() {
        return ProbeOutcome::Transport(error_chain(err));
    }
    ProbeOutcome::Other(error_chain(err))
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let start = Instant::now();
        let outcome = self.attempt(url).await;
        let result = ProbeResult::from_outcome(outcome, start.elapsed());
        debug!(
            url,
            status = %result.status,
            response_time_ms = result.response_time_ms,
            "Probe finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[tokio::test]
    async fn test_malformed_url_is_down_without_code() {
        let prober = HttpProber::new(Duration::from_secs(1), "API-Monitor/1.0").unwrap();
        let result = prober.probe("not a url").await;

        assert_eq!(result.status, Status::Down);
        assert!(result.status_code.is_none());
        assert!(result.error_message.is_some());
        assert!(result.response_time_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_failure() {
        let prober = HttpProber::new(Duration::from_secs(2), "API-Monitor/1.0").unwrap();
        let result = prober.probe("http://127.0.0.1:1/").await;

        assert_eq!(result.status, Status::Down);
        assert!(result.status_code.is_none());
        assert!(result
            .error_message
            .as_deref()
            .is_some_and(|m| m.starts_with("URL Error:")));
    }
}
