// src/models/cycle.rs
use serde::Serialize;
use uuid::Uuid;

use crate::models::status::ServerStatus;

/// Result slot for one endpoint within a cycle. `Failed` only appears when
/// the check task itself died; ordinary check errors are already folded
/// into an offline status by then.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointOutcome {
    Checked(ServerStatus),
    Failed,
}

impl EndpointOutcome {
    pub fn status(&self) -> Option<&ServerStatus> {
        match self {
            Self::Checked(status) => Some(status),
            Self::Failed => None,
        }
    }

    fn online_status(&self) -> Option<&ServerStatus> {
        self.status().filter(|s| s.is_online())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PollSummary {
    pub online_count: usize,
    pub total_players: u64,
    pub total_capacity: u64,
    pub uptime_percent: u32,
    pub total_endpoints: usize,
}

impl PollSummary {
    /// Offline and failed endpoints contribute nothing except to the
    /// endpoint total.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a EndpointOutcome>,
    {
        let mut summary = PollSummary::default();
        for outcome in outcomes {
            summary.total_endpoints += 1;
            if let Some(status) = outcome.online_status() {
                summary.online_count += 1;
                summary.total_players += status.players() as u64;
                summary.total_capacity += status.max_players() as u64;
            }
        }
        if summary.total_endpoints > 0 {
            let ratio = summary.online_count as f64 / summary.total_endpoints as f64;
            summary.uptime_percent = (ratio * 100.0).round() as u32;
        }
        summary
    }
}

/// One complete round over every endpoint, in configuration order.
#[derive(Debug, Clone)]
pub struct PollCycle {
    pub id: Uuid,
    pub results: Vec<(String, EndpointOutcome)>,
    pub summary: PollSummary,
}

impl PollCycle {
    pub fn new(id: Uuid, results: Vec<(String, EndpointOutcome)>) -> Self {
        let summary = PollSummary::from_outcomes(results.iter().map(|(_, outcome)| outcome));
        Self { id, results, summary }
    }

    pub fn outcome(&self, endpoint_id: &str) -> Option<&EndpointOutcome> {
        self.results
            .iter()
            .find(|(id, _)| id == endpoint_id)
            .map(|(_, outcome)| outcome)
    }
}
