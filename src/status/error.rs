// src/status/error.rs
use std::time::Duration;

use thiserror::Error;

/// Ways a single status check can fail. None of these escape the retry
/// layer; they end up as an offline or simulated status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("status request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("status API answered with HTTP {code}")]
    HttpStatus { code: u16 },

    #[error("malformed status response: {0}")]
    MalformedResponse(String),
}

impl CheckError {
    /// Failures that say more about our ability to reach the status API
    /// than about the game server. An aborted request counts as one.
    pub fn is_transport_shaped(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}

/// Deadlines are enforced around the request, not by reqwest, so a reqwest
/// error never carries a timeout worth reporting as `Timeout`.
impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(code) = e.status() {
            return CheckError::HttpStatus { code: code.as_u16() };
        }
        if e.is_decode() {
            return CheckError::MalformedResponse(e.to_string());
        }
        CheckError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(e: serde_json::Error) -> Self {
        CheckError::MalformedResponse(e.to_string())
    }
}
