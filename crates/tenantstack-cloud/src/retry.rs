//! Bounded retry-poll for eventually consistent reads

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// How often and how long to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Certificate validation records usually appear within a few seconds
    pub const CERTIFICATE_VALIDATION: RetryPolicy = RetryPolicy {
        max_attempts: 5,
        delay: Duration::from_secs(4),
    };

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::CERTIFICATE_VALIDATION
    }
}

/// Outcome of one polling attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<T> {
    Ready(T),
    /// The resource exists but is not populated yet
    Pending,
}

/// Invokes `attempt` until it is ready or `policy.max_attempts` runs out.
///
/// Only [`Availability::Pending`] is retried; any error aborts immediately.
/// The delay is slept between attempts, never after the last one.
pub async fn poll_until_available<T, F, Fut>(
    policy: &RetryPolicy,
    action: &str,
    resource: &str,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Availability<T>>>,
{
    for n in 1..=policy.max_attempts {
        match attempt().await? {
            Availability::Ready(value) => return Ok(value),
            Availability::Pending => {
                info!(
                    resource = %resource,
                    attempt = n,
                    max_attempts = policy.max_attempts,
                    "not available yet"
                );
                if n < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    warn!(resource = %resource, attempts = policy.max_attempts, "gave up waiting");
    Err(CloudError::RetryExhausted {
        action: action.to_string(),
        resource: resource.to_string(),
        attempts: policy.max_attempts,
    })
}
