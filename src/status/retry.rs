// src/status/retry.rs
use std::future::Future;
use std::time::Duration;

use log::{ debug, warn };

use crate::models::endpoint::Endpoint;
use crate::models::status::ServerStatus;
use crate::status::error::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(1000),
        }
    }
}

/// Calls `check` until it reports the server online or the attempts run
/// out. Errors are logged and folded into an offline status here; the last
/// status obtained is returned either way.
pub async fn check_with_retry<F, Fut>(
    policy: RetryPolicy,
    endpoint: &Endpoint,
    mut check: F,
) -> ServerStatus
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ServerStatus, CheckError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last = ServerStatus::offline(endpoint.default_max_players);

    for attempt in 1..=attempts {
        last = match check().await {
            Ok(status) if status.is_online() => return status,
            Ok(status) => {
                debug!("{} reported offline (attempt {}/{})", endpoint.id, attempt, attempts);
                status
            }
            Err(e) => {
                warn!("Status check for {} failed (attempt {}/{}): {}", endpoint.id, attempt, attempts, e);
                ServerStatus::offline(endpoint.default_max_players)
            }
        };

        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    last
}
