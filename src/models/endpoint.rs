// src/models/endpoint.rs
use serde::{ Deserialize, Serialize };

pub const DEFAULT_GAME_PORT: u16 = 25565;

/// A configured game server node. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub address: String,
    pub display_name: String,
    pub default_max_players: u32,
    /// Tunnel address the same node is reachable through, if any.
    #[serde(default)]
    pub relay_address: Option<String>,
}

/// Which address of an endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Domain,
    Relay,
}

impl Endpoint {
    pub fn new(id: &str, address: &str, display_name: &str, default_max_players: u32) -> Self {
        Self {
            id: id.to_string(),
            address: address.to_string(),
            display_name: display_name.to_string(),
            default_max_players,
            relay_address: None,
        }
    }

    pub fn with_relay(mut self, relay_address: &str) -> Self {
        self.relay_address = Some(relay_address.to_string());
        self
    }

    pub fn address_for(&self, route: Route) -> &str {
        match route {
            Route::Domain => &self.address,
            Route::Relay => self.relay_address.as_deref().unwrap_or(&self.address),
        }
    }
}

/// Splits `host[:port]`, defaulting the port. An unparseable port is kept
/// as the default rather than rejected.
pub fn split_address(address: &str) -> (&str, u16) {
    match address.rsplit_once(':') {
        Some((host, port)) => (host, port.trim().parse().unwrap_or(DEFAULT_GAME_PORT)),
        None => (address, DEFAULT_GAME_PORT),
    }
}
