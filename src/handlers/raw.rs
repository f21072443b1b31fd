// src/handlers/raw.rs
use actix_web::{ web, HttpRequest, HttpResponse };
use log::{ debug, error };
use serde::Deserialize;

use crate::handlers::{ Poller, RefreshLimiter };
use crate::models::endpoint::{ Endpoint, Route };
use crate::status::client::StatusClient;
use crate::utils::{ extract_client_ip, RequestError, TrustedProxies };
use crate::viewer::mask::mask_payload;
use crate::viewer::render::render_json;

/// Nodes selectable in the raw viewer, on top of the polled endpoints.
pub struct ViewerNodes(pub Vec<Endpoint>);

impl ViewerNodes {
    fn find<'a>(&'a self, id: &str, polled: &'a [Endpoint]) -> Option<&'a Endpoint> {
        self.0.iter().chain(polled).find(|e| e.id == id)
    }
}

#[derive(Deserialize)]
pub struct RawQuery {
    #[serde(default)]
    via: Route,
}

/// Raw payload viewer for one node: fetched on demand, never retried or
/// simulated, redacted before rendering.
pub async fn raw_status(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<RawQuery>,
    poller: web::Data<Poller>,
    nodes: web::Data<ViewerNodes>,
    client: web::Data<StatusClient>,
    rate_limiter: web::Data<RefreshLimiter>,
    trusted: web::Data<TrustedProxies>
) -> Result<HttpResponse, RequestError> {
    let client_ip = extract_client_ip(&req, &trusted)?;

    if rate_limiter.check_key(&client_ip).is_err() {
        error!("Rate limit exceeded for raw viewer for ip: {}", client_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let id = path.into_inner();
    let endpoint = match nodes.find(&id, poller.endpoints()) {
        Some(endpoint) => endpoint,
        None => return Err(RequestError::UnknownEndpoint(id)),
    };

    let raw = match client.fetch_raw(endpoint, query.via).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Raw status fetch for {} failed: {}", endpoint.id, e);
            return Err(RequestError::UpstreamFailed(e.to_string()));
        }
    };

    debug!("Rendering raw status for {} via {:?}", endpoint.id, query.via);
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_json(&mask_payload(&raw))))
}
