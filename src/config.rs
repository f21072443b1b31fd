use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use governor::Quota;
use log::warn;

use crate::models::endpoint::Endpoint;
use crate::status::fallback::FallbackPolicy;
use crate::status::retry::RetryPolicy;
use crate::utils::TrustedProxies;

#[derive(Clone)]
pub struct Config {
    // HTTP surface
    pub bind_address: String,
    pub port: u16,

    // Status API
    pub status_api_base: String,
    pub check_timeout_ms: u64,
    pub check_max_attempts: u32,
    pub check_retry_delay_ms: u64,
    pub poll_interval_secs: u64,

    // Fallback triggers
    pub simulate_only: bool,
    pub fallback_on_transport_error: bool,

    // Manual refresh / raw viewer throttle
    pub refresh_period_secs: u64,
    pub refresh_burst_limit: u32,
    pub trusted_proxies: TrustedProxies,

    pub endpoints: Vec<Endpoint>,
    pub viewer_nodes: Vec<Endpoint>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            status_api_base: "https://api.mcsrvstat.us".to_string(),
            check_timeout_ms: 10_000,
            check_max_attempts: 2,
            check_retry_delay_ms: 1000,
            poll_interval_secs: 300, // 5 minutes
            simulate_only: false,
            fallback_on_transport_error: true,
            refresh_period_secs: 2,
            refresh_burst_limit: 1,
            trusted_proxies: TrustedProxies::default(),
            endpoints: default_endpoints(),
            viewer_nodes: default_viewer_nodes(),
        }
    }
}

pub fn default_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("lab", "vip.hb.frp.one:25575", "Shiyan node", 50),
        Endpoint::new("bj", "vip.bj-2.frp.one:35565", "Beijing node", 100),
    ]
}

/// Nodes offered by the raw viewer, each reachable by domain or through
/// its FRP tunnel.
pub fn default_viewer_nodes() -> Vec<Endpoint> {
    vec![
        Endpoint::new("hbmain", "hb.acmcdev.top:33322", "Hubei main", 50)
            .with_relay("hb.frp.one:33323"),
        Endpoint::new("nmgmain", "hn.acmcdev.top:19887", "Inner Mongolia main", 50)
            .with_relay("nmg.frp.one:19887"),
        Endpoint::new("whmain", "wh.acmcdev.top:25568", "Wuhan main", 50)
            .with_relay("cn-hb-wh-2.lcf.im:25568"),
        Endpoint::new("hbsky", "hb.acmcdev.top:24282", "Hubei skyblock", 50)
            .with_relay("hb.frp.one:24282"),
        Endpoint::new("whsky", "wh.acmcdev.top:25569", "Wuhan skyblock", 50)
            .with_relay("cn-hb-wh-2.lcf.im:25569"),
        Endpoint::new("hbl", "hb.acmcdev.top:33323", "Hubei latest", 50)
            .with_relay("hb.frp.one:33323"),
        Endpoint::new("whl", "wh.acmcdev.top:25570", "Wuhan latest", 50)
            .with_relay("cn-hb-wh-2.lcf.im:25570"),
    ]
}

fn var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: var_or("PORT", defaults.port),

            status_api_base: env::var("STATUS_API_BASE").unwrap_or(defaults.status_api_base),
            check_timeout_ms: var_or("CHECK_TIMEOUT_MS", defaults.check_timeout_ms),
            check_max_attempts: var_or("CHECK_MAX_ATTEMPTS", defaults.check_max_attempts),
            check_retry_delay_ms: var_or("CHECK_RETRY_DELAY_MS", defaults.check_retry_delay_ms),
            poll_interval_secs: var_or("POLL_INTERVAL_SECS", defaults.poll_interval_secs),

            simulate_only: var_or("SIMULATE_ONLY", defaults.simulate_only),
            fallback_on_transport_error: var_or(
                "FALLBACK_ON_TRANSPORT_ERROR",
                defaults.fallback_on_transport_error
            ),

            refresh_period_secs: var_or("REFRESH_PERIOD_SECS", defaults.refresh_period_secs),
            refresh_burst_limit: var_or("REFRESH_BURST_LIMIT", defaults.refresh_burst_limit),
            trusted_proxies: match env::var("TRUSTED_PROXIES") {
                Ok(raw) => TrustedProxies::parse(&raw),
                Err(_) => defaults.trusted_proxies,
            },

            endpoints: match env::var("STATUS_ENDPOINTS") {
                Ok(raw) => parse_endpoints("STATUS_ENDPOINTS", &raw).unwrap_or(defaults.endpoints),
                Err(_) => defaults.endpoints,
            },
            viewer_nodes: match env::var("VIEWER_NODES") {
                Ok(raw) => parse_endpoints("VIEWER_NODES", &raw).unwrap_or(defaults.viewer_nodes),
                Err(_) => defaults.viewer_nodes,
            },
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.check_max_attempts.max(1),
            delay: Duration::from_millis(self.check_retry_delay_ms),
        }
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            simulate_only: self.simulate_only,
            on_transport_error: self.fallback_on_transport_error,
        }
    }

    pub fn refresh_quota(&self) -> Quota {
        let period = Duration::from_secs(self.refresh_period_secs.max(1));
        let burst = NonZeroU32::new(self.refresh_burst_limit).unwrap_or(NonZeroU32::MIN);
        match Quota::with_period(period) {
            Some(quota) => quota.allow_burst(burst),
            None => Quota::per_second(burst),
        }
    }
}

/// Endpoint lists are JSON arrays of endpoint objects. A bad or empty value
/// is ignored in favour of the defaults.
fn parse_endpoints(key: &str, raw: &str) -> Option<Vec<Endpoint>> {
    match serde_json::from_str::<Vec<Endpoint>>(raw) {
        Ok(endpoints) if !endpoints.is_empty() => Some(endpoints),
        Ok(_) => {
            warn!("{} is empty, using defaults", key);
            None
        }
        Err(e) => {
            warn!("Invalid {} ({}), using defaults", key, e);
            None
        }
    }
}
