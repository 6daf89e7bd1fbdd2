use crate::config::ClientConfig;
use std::time::Duration;

/// Outcome of the startup health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    Unreachable,
}

/// Checks that the inference service answers its `/health` endpoint
/// before the session accepts submissions.
pub struct ConnectivityProbe {
    http: reqwest::Client,
    health_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl ConnectivityProbe {
    pub fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            health_url: config.health_url(),
            attempts: config.probe_attempts,
            retry_delay: config.probe_retry_delay,
        }
    }

    /// Probe the service, retrying up to the configured attempt count with
    /// a fixed delay in between. Progress text ("attempt k/3") is pushed to
    /// `on_status` before each try. An unreachable service is a reported
    /// outcome, not an error: this never fails.
    pub async fn probe(&self, mut on_status: impl FnMut(&str)) -> Connectivity {
        for attempt in 1..=self.attempts {
            on_status(&format!(
                "Connecting to inference service (attempt {attempt}/{})...",
                self.attempts
            ));
            match self.check().await {
                Ok(()) => {
                    log::info!("inference service reachable at {}", self.health_url);
                    return Connectivity::Connected;
                }
                Err(reason) => {
                    log::warn!(
                        "health check attempt {attempt}/{} failed: {reason}",
                        self.attempts
                    );
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        log::error!(
            "inference service unreachable at {} after {} attempts; \
             is the server running and CORS configured?",
            self.health_url,
            self.attempts
        );
        Connectivity::Unreachable
    }

    /// One attempt: 2xx and a body that parses as JSON. The body's content
    /// is not otherwise inspected.
    async fn check(&self) -> Result<(), String> {
        let response = self
            .http
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| format!("body is not JSON: {e}"))?;
        Ok(())
    }
}
