// src/status/fallback.rs
use log::warn;
use rand::Rng;

use crate::models::endpoint::Endpoint;
use crate::models::status::ServerStatus;
use crate::status::error::CheckError;

pub const SIMULATED_VERSION: &str = "1.19.2";
pub const SIMULATED_MOTD: &str = "Welcome to the community server!\nShowing simulated data.";

/// When to substitute simulated data for a real check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// The process cannot reach the status API at all. Never touch the network.
    pub simulate_only: bool,
    /// Replace transport-shaped failures with simulated data instead of
    /// reporting the endpoint offline.
    pub on_transport_error: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            simulate_only: false,
            on_transport_error: true,
        }
    }
}

impl FallbackPolicy {
    pub fn disabled() -> Self {
        Self {
            simulate_only: false,
            on_transport_error: false,
        }
    }

    /// Applies trigger (b) to a finished check. Everything that is not a
    /// transport-shaped error passes through untouched, so a genuine offline
    /// answer is never masked.
    pub fn recover(
        &self,
        endpoint: &Endpoint,
        result: Result<ServerStatus, CheckError>,
    ) -> Result<ServerStatus, CheckError> {
        match result {
            Err(e) if self.on_transport_error && e.is_transport_shaped() => {
                warn!("Status API unreachable for {} ({}), showing simulated data", endpoint.id, e);
                Ok(simulate(endpoint, &mut rand::thread_rng()))
            }
            other => other,
        }
    }
}

/// Plausible online status for an endpoint. Players in 0..20, ping in 20..120.
pub fn simulate<R: Rng>(endpoint: &Endpoint, rng: &mut R) -> ServerStatus {
    ServerStatus::online(
        rng.gen_range(0..20),
        endpoint.default_max_players,
        Some(SIMULATED_VERSION.to_string()),
        Some(rng.gen_range(20..120)),
        Some(SIMULATED_MOTD.to_string()),
    ).simulated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::StatusOrigin;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn endpoint() -> Endpoint {
        Endpoint::new("lab", "vip.hb.frp.one:25575", "Lab", 50)
    }

    #[test]
    fn simulated_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let status = simulate(&endpoint(), &mut rng);
            assert!(status.is_online());
            assert!(status.players() < 20);
            let ping = status.ping_ms().unwrap();
            assert!((20..120).contains(&ping));
            assert_eq!(status.max_players(), 50);
            assert_eq!(status.version(), Some(SIMULATED_VERSION));
            assert_eq!(status.origin(), StatusOrigin::Simulated);
        }
    }

    #[test]
    fn transport_error_becomes_simulated() {
        let policy = FallbackPolicy::default();
        let status = policy
            .recover(&endpoint(), Err(CheckError::Transport("connection refused".into())))
            .unwrap();
        // Known accuracy gap: the real server may well be down here.
        assert!(status.is_online());
        assert_eq!(status.origin(), StatusOrigin::Simulated);
    }

    #[test]
    fn http_error_is_not_recovered() {
        let policy = FallbackPolicy::default();
        let result = policy.recover(&endpoint(), Err(CheckError::HttpStatus { code: 500 }));
        assert_eq!(result, Err(CheckError::HttpStatus { code: 500 }));
    }

    #[test]
    fn genuine_offline_passes_through() {
        let policy = FallbackPolicy::default();
        let result = policy.recover(&endpoint(), Ok(ServerStatus::offline(50)));
        assert_eq!(result, Ok(ServerStatus::offline(50)));
    }

    #[test]
    fn disabled_policy_keeps_errors() {
        let policy = FallbackPolicy::disabled();
        let result = policy.recover(&endpoint(), Err(CheckError::Transport("reset".into())));
        assert!(result.is_err());
    }
}
