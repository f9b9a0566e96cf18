//! Shared HTTP plumbing for the model and MCP clients

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::warn;

use crate::config::NetworkConfig;
use crate::error::{Result, WizardError};

pub const USER_AGENT: &str = concat!("bizflow/", env!("CARGO_PKG_VERSION"));

/// Build a blocking client with the configured timeout
pub fn build_client(network: &NetworkConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(network.timeout())
        .build()?)
}

/// Turn a non-success response into an API error
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        return Err(WizardError::api(status.as_u16(), message));
    }
    Ok(response)
}

/// Bounded retry with exponential backoff for transient failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt + 1`, saturating instead of overflowing
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(Duration::MAX)
    }

    /// Run `op`, retrying while it fails with a transient error
    pub fn run<T>(&self, what: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            match op() {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    let delay = self.delay(attempt);
                    attempt += 1;
                    warn!(%e, attempt, ?delay, "{what} failed, retrying");
                    thread::sleep(delay);
                }
                other => return other,
            }
        }
    }
}

impl From<&NetworkConfig> for RetryPolicy {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            retries: network.retries,
            backoff: network.backoff(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_transient_errors_are_retried_until_success() {
        let mut calls = 0;
        let result = policy(2).run("lookup", || {
            calls += 1;
            if calls < 3 {
                Err(WizardError::api(503, "busy"))
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_retries_are_bounded() {
        let mut calls = 0;
        let result: Result<()> = policy(2).run("lookup", || {
            calls += 1;
            Err(WizardError::api(500, "down"))
        });

        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_permanent_errors_fail_fast() {
        let mut calls = 0;
        let result: Result<()> = policy(5).run("lookup", || {
            calls += 1;
            Err(WizardError::api(401, "unauthorized"))
        });

        assert!(matches!(result, Err(WizardError::Api { status: 401, .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_delay_doubles_and_saturates() {
        let policy = RetryPolicy {
            retries: 3,
            backoff: Duration::from_millis(500),
        };
        assert_eq!(policy.delay(0), Duration::from_millis(500));
        assert_eq!(policy.delay(2), Duration::from_millis(2000));

        let huge = RetryPolicy {
            retries: u32::MAX,
            backoff: Duration::from_millis(u64::MAX),
        };
        assert_eq!(huge.delay(40), Duration::MAX);
    }

    #[test]
    fn test_policy_from_network_config() {
        let network = NetworkConfig {
            timeout_secs: 1,
            retries: 4,
            backoff_ms: 250,
        };
        let policy = RetryPolicy::from(&network);
        assert_eq!(policy.retries, 4);
        assert_eq!(policy.backoff, Duration::from_millis(250));
        assert_eq!(RetryPolicy::none().retries, 0);
    }
}
