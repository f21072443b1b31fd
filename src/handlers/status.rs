// src/handlers/status.rs
use actix_web::{ web, HttpRequest, HttpResponse };
use log::{ debug, error };
use serde_json::json;

use crate::handlers::{ Poller, RefreshLimiter };
use crate::storage::memory::StatusBoard;
use crate::utils::{ extract_client_ip, RequestError, TrustedProxies };

pub async fn get_status(board: web::Data<StatusBoard>) -> HttpResponse {
    HttpResponse::Ok().json(board.snapshot())
}

/// Manual refresh button. Starts a poll cycle unless one is already
/// running; the board shows the result once it lands.
pub async fn refresh(
    req: HttpRequest,
    poller: web::Data<Poller>,
    rate_limiter: web::Data<RefreshLimiter>,
    trusted: web::Data<TrustedProxies>
) -> Result<HttpResponse, RequestError> {
    let client_ip = extract_client_ip(&req, &trusted)?;

    if rate_limiter.check_key(&client_ip).is_err() {
        error!("Rate limit exceeded for refresh for ip: {}", client_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let started = poller.into_inner().request_refresh();
    debug!("Refresh from {}: started={}", client_ip, started);

    Ok(HttpResponse::Accepted().json(json!({ "started": started })))
}
