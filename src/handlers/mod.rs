pub mod raw;
pub mod status;

use actix_web::web;
use governor::{ RateLimiter, clock::DefaultClock };
use governor::state::keyed::DefaultKeyedStateStore;
use std::net::IpAddr;

use crate::status::check::LiveCheck;
use crate::status::poller::StatusPoller;
use crate::storage::memory::StatusBoard;

pub type Poller = StatusPoller<LiveCheck, StatusBoard>;

/// Per-client throttle shared by the manual refresh and the raw viewer.
pub type RefreshLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(status::get_status))
        .route("/status/refresh", web::post().to(status::refresh))
        .route("/status/raw/{id}", web::get().to(raw::raw_status));
}
