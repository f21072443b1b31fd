// src/utils.rs
use actix_web::{ HttpRequest, HttpResponse, ResponseError };
use log::{ debug, warn };
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to extract client IP")]
    MissingPeerIP,
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Unknown server: {0}")]
    UnknownEndpoint(String),
    #[error("Status API request failed: {0}")]
    UpstreamFailed(String),
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::RateLimitExceeded => HttpResponse::TooManyRequests().body(self.to_string()),
            Self::UnknownEndpoint(_) => HttpResponse::NotFound().body(self.to_string()),
            Self::UpstreamFailed(_) => HttpResponse::BadGateway().body(self.to_string()),
            Self::MissingPeerIP => HttpResponse::BadRequest().body(self.to_string()),
        }
    }
}

/// Reverse proxies whose X-Forwarded-For header is believed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedProxies(Vec<IpAddr>);

impl TrustedProxies {
    pub fn new(proxies: Vec<IpAddr>) -> Self {
        Self(proxies)
    }

    /// Comma separated list of IPs. Entries that do not parse are dropped
    /// with a warning.
    pub fn parse(raw: &str) -> Self {
        let proxies = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match s.parse::<IpAddr>() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    warn!("Ignoring invalid trusted proxy address: {}", s);
                    None
                }
            })
            .collect();
        Self(proxies)
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(ip)
    }
}

/// Client IP used as the throttle key. The socket peer is the key unless it
/// is a trusted proxy, in which case the first X-Forwarded-For entry wins.
pub fn extract_client_ip(req: &HttpRequest, trusted: &TrustedProxies) -> Result<IpAddr, RequestError> {
    let peer = match req.peer_addr() {
        Some(addr) => addr.ip(),
        None => return Err(RequestError::MissingPeerIP),
    };

    if !trusted.contains(&peer) {
        return Ok(peer);
    }

    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(ip_str) = forwarded_for.to_str() {
            if let Some(first_ip) = ip_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    debug!("Using X-Forwarded-For client IP {} from proxy {}", ip, peer);
                    return Ok(ip);
                }
            }
        }
    }

    Ok(peer)
}
