// src/status/check.rs
use async_trait::async_trait;
use log::warn;

use crate::models::endpoint::Endpoint;
use crate::models::status::ServerStatus;
use crate::status::client::StatusClient;
use crate::status::fallback::{ simulate, FallbackPolicy };
use crate::status::retry::{ check_with_retry, RetryPolicy };

/// A complete, infallible status check for one endpoint. This is where
/// `Result<ServerStatus, CheckError>` collapses into a plain status.
#[async_trait]
pub trait StatusCheck: Send + Sync {
    async fn check(&self, endpoint: &Endpoint) -> ServerStatus;
}

/// Fetch with timeout, normalize, environment fallback and retry, composed
/// in that order from the inside out.
pub struct LiveCheck {
    client: StatusClient,
    retry: RetryPolicy,
    fallback: FallbackPolicy,
}

impl LiveCheck {
    pub fn new(client: StatusClient, retry: RetryPolicy, fallback: FallbackPolicy) -> Self {
        Self { client, retry, fallback }
    }
}

#[async_trait]
impl StatusCheck for LiveCheck {
    async fn check(&self, endpoint: &Endpoint) -> ServerStatus {
        if self.fallback.simulate_only {
            warn!("Simulate-only mode, showing simulated data for {} without a network check", endpoint.id);
            return simulate(endpoint, &mut rand::thread_rng());
        }

        let client = &self.client;
        let fallback = self.fallback;
        check_with_retry(self.retry, endpoint, move || async move {
            let result = client.fetch_status(endpoint).await;
            fallback.recover(endpoint, result)
        }).await
    }
}
