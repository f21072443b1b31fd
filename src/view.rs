// src/view.rs
use serde::Serialize;

use crate::models::cycle::PollSummary;
use crate::models::status::{ ServerStatus, StatusOrigin };

const CHECKING: &str = "checking...";
const UNAVAILABLE: &str = "unavailable";
const UNKNOWN: &str = "unknown";
const UNREACHABLE_MOTD: &str = "server cannot be reached";
const LOADING_PROGRESS: f64 = 30.0;

/// Where poll results get projected. Implementations must treat an
/// unknown endpoint id as a no-op.
pub trait ViewSink: Send + Sync {
    fn render_loading(&self, endpoint_id: &str);
    fn render_endpoint(&self, endpoint_id: &str, status: &ServerStatus);
    fn render_summary(&self, summary: &PollSummary);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Loading,
    Online,
    Offline,
}

/// Text projection of one endpoint card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointView {
    pub id: String,
    pub display_name: String,
    pub indicator: Indicator,
    pub players: String,
    pub version: String,
    pub ping: String,
    pub motd: String,
    pub progress_percent: f64,
    pub simulated: bool,
}

impl EndpointView {
    /// Initial card before the first result, same as a loading card.
    pub fn pending(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            indicator: Indicator::Loading,
            players: CHECKING.to_string(),
            version: CHECKING.to_string(),
            ping: CHECKING.to_string(),
            motd: String::new(),
            progress_percent: LOADING_PROGRESS,
            simulated: false,
        }
    }

    pub fn set_loading(&mut self) {
        self.indicator = Indicator::Loading;
        self.players = CHECKING.to_string();
        self.version = CHECKING.to_string();
        self.ping = CHECKING.to_string();
        self.progress_percent = LOADING_PROGRESS;
    }

    pub fn apply(&mut self, status: &ServerStatus) {
        self.simulated = status.origin() == StatusOrigin::Simulated;
        self.players = format!("{}/{}", status.players(), status.max_players());
        self.progress_percent = status.capacity_percent();

        if status.is_online() {
            self.indicator = Indicator::Online;
            self.version = status.version().unwrap_or(UNKNOWN).to_string();
            self.ping = match status.ping_ms() {
                Some(ms) => format!("{}ms", ms),
                None => UNKNOWN.to_string(),
            };
            self.motd = status.motd().unwrap_or(UNKNOWN).to_string();
        } else {
            self.indicator = Indicator::Offline;
            self.version = UNAVAILABLE.to_string();
            self.ping = UNAVAILABLE.to_string();
            self.motd = UNREACHABLE_MOTD.to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryView {
    pub uptime: String,
    pub total_players: u64,
    pub total_servers: usize,
}

impl From<&PollSummary> for SummaryView {
    fn from(summary: &PollSummary) -> Self {
        Self {
            uptime: format!("{}%", summary.uptime_percent),
            total_players: summary.total_players,
            total_servers: summary.total_endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_card() {
        let mut view = EndpointView::pending("lab", "Lab");
        view.apply(&ServerStatus::online(5, 20, Some("1.19.2".into()), Some(33), None));

        assert_eq!(view.indicator, Indicator::Online);
        assert_eq!(view.players, "5/20");
        assert_eq!(view.version, "1.19.2");
        assert_eq!(view.ping, "33ms");
        assert_eq!(view.motd, "unknown");
        assert_eq!(view.progress_percent, 25.0);
        assert!(!view.simulated);
    }

    #[test]
    fn offline_card() {
        let mut view = EndpointView::pending("lab", "Lab");
        view.apply(&ServerStatus::offline(50));

        assert_eq!(view.indicator, Indicator::Offline);
        assert_eq!(view.players, "0/50");
        assert_eq!(view.version, "unavailable");
        assert_eq!(view.ping, "unavailable");
        assert_eq!(view.motd, "server cannot be reached");
        assert_eq!(view.progress_percent, 0.0);
    }

    #[test]
    fn unknown_ping_and_loading_reset() {
        let mut view = EndpointView::pending("bj", "Beijing");
        view.apply(&ServerStatus::online(1, 10, None, None, Some("hi".into())));
        assert_eq!(view.ping, "unknown");
        assert_eq!(view.version, "unknown");

        view.set_loading();
        assert_eq!(view.indicator, Indicator::Loading);
        assert_eq!(view.players, "checking...");
        assert_eq!(view.progress_percent, 30.0);
    }

    #[test]
    fn summary_view_text() {
        let summary = PollSummary {
            online_count: 1,
            total_players: 9,
            total_capacity: 50,
            uptime_percent: 50,
            total_endpoints: 2,
        };
        let view = SummaryView::from(&summary);
        assert_eq!(view.uptime, "50%");
        assert_eq!(view.total_players, 9);
        assert_eq!(view.total_servers, 2);
    }
}
