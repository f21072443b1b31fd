// src/models/status.rs
use serde::Serialize;

/// Where a status came from. Simulated statuses are produced by the
/// environment fallback and carry no information about the real server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusOrigin {
    Live,
    Simulated,
}

/// Normalized outcome of one status check.
///
/// Fields are private so the only way to build one is through the
/// constructors, which keep `players == 0` whenever the server is offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    online: bool,
    players: u32,
    max_players: u32,
    version: Option<String>,
    ping_ms: Option<u32>,
    motd: Option<String>,
    origin: StatusOrigin,
}

impl ServerStatus {
    pub fn online(
        players: u32,
        max_players: u32,
        version: Option<String>,
        ping_ms: Option<u32>,
        motd: Option<String>,
    ) -> Self {
        Self {
            online: true,
            players,
            max_players,
            version,
            ping_ms,
            motd,
            origin: StatusOrigin::Live,
        }
    }

    pub fn offline(max_players: u32) -> Self {
        Self {
            online: false,
            players: 0,
            max_players,
            version: None,
            ping_ms: None,
            motd: None,
            origin: StatusOrigin::Live,
        }
    }

    pub fn simulated(mut self) -> Self {
        self.origin = StatusOrigin::Simulated;
        self
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn players(&self) -> u32 {
        self.players
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn ping_ms(&self) -> Option<u32> {
        self.ping_ms
    }

    pub fn motd(&self) -> Option<&str> {
        self.motd.as_deref()
    }

    pub fn origin(&self) -> StatusOrigin {
        self.origin
    }

    /// Fill ratio of the server, clamped to [0, 100].
    pub fn capacity_percent(&self) -> f64 {
        if !self.online || self.max_players == 0 {
            return 0.0;
        }
        (self.players as f64 / self.max_players as f64 * 100.0).clamp(0.0, 100.0)
    }
}
