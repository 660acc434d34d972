use std::future::Future;
use std::time::Duration;

use crate::AgentError;

/// Backoff schedule for transport failures talking to a model server
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Run `request` until it succeeds, fails permanently or attempts run out.
    ///
    /// Only transport errors are retried; an HTTP error status or a malformed
    /// body is returned immediately.
    pub async fn run<T, F, Fut>(&self, target: &str, mut request: F) -> Result<T, AgentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AgentError>>,
    {
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match request().await {
                Err(AgentError::Transport(e)) if attempt < self.max_attempts => {
                    tracing::warn!(
                        target_url = target,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Agent request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    delay = Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier)
                        .min(self.max_delay);
                }
                result => return result,
            }
        }
    }
}
