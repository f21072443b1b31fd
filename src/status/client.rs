// src/status/client.rs
use std::future::Future;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::models::endpoint::{ split_address, Endpoint, Route };
use crate::models::status::ServerStatus;
use crate::status::error::CheckError;
use crate::status::normalize::normalize;

/// Runs `fut` with a hard deadline. On expiry the future is dropped, which
/// tears down whatever request it was driving.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, CheckError>
where
    F: Future<Output = Result<T, CheckError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(CheckError::Timeout { after: deadline }),
    }
}

/// Thin client for the public server status API (`GET /3/<host>:<port>`).
#[derive(Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl StatusClient {
    pub fn new(api_base: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn status_url(&self, address: &str) -> String {
        let (host, port) = split_address(address);
        format!("{}/3/{}:{}", self.api_base, host, port)
    }

    /// One GET with the configured deadline. Yields the parsed body or
    /// exactly one `CheckError`.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, CheckError> {
        with_deadline(self.timeout, async {
            debug!("GET {}", url);
            let response = self.http
                .get(url)
                .header(reqwest::header::CACHE_CONTROL, "no-store")
                .send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(CheckError::HttpStatus { code: status.as_u16() });
            }

            let bytes = response.bytes().await?;
            Ok::<Value, CheckError>(serde_json::from_slice(&bytes)?)
        }).await
    }

    pub async fn fetch_raw(&self, endpoint: &Endpoint, route: Route) -> Result<Value, CheckError> {
        self.fetch_json(&self.status_url(endpoint.address_for(route))).await
    }

    /// Fetch and normalize, without retry or fallback.
    pub async fn fetch_status(&self, endpoint: &Endpoint) -> Result<ServerStatus, CheckError> {
        let raw = self.fetch_raw(endpoint, Route::Domain).await?;
        normalize(&raw, endpoint)
    }
}
