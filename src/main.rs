// src/main.rs
use std::sync::Arc;

use actix_web::{ web, App, HttpServer };
use env_logger::Env;
use governor::RateLimiter;
use log::{ info, warn };

use statusboard::config::Config;
use statusboard::handlers::{ self, Poller, RefreshLimiter };
use statusboard::handlers::raw::ViewerNodes;
use statusboard::status::check::LiveCheck;
use statusboard::status::client::StatusClient;
use statusboard::storage::memory::StatusBoard;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger only once at the start
    env_logger::init_from_env(Env::default().default_filter_or("debug"));

    dotenv::dotenv().ok();
    let config = Config::from_env();

    if config.simulate_only {
        warn!("SIMULATE_ONLY is set, every status shown will be simulated");
    }

    let client = StatusClient::new(&config.status_api_base, config.check_timeout());
    let board = Arc::new(StatusBoard::new(&config.endpoints));
    let check = Arc::new(LiveCheck::new(
        client.clone(),
        config.retry_policy(),
        config.fallback_policy()
    ));
    let poller: Arc<Poller> = Arc::new(
        Poller::new(config.endpoints.clone(), check, Arc::clone(&board))
    );

    info!(
        "Polling {} endpoints every {}s via {}",
        config.endpoints.len(),
        config.poll_interval().as_secs(),
        config.status_api_base
    );
    Arc::clone(&poller).spawn_schedule(config.poll_interval());

    let board = web::Data::from(board);
    let poller = web::Data::from(poller);
    let nodes = web::Data::new(ViewerNodes(config.viewer_nodes.clone()));
    let client = web::Data::new(client);
    let rate_limiter: web::Data<RefreshLimiter> =
        web::Data::new(RateLimiter::keyed(config.refresh_quota()));
    let trusted = web::Data::new(config.trusted_proxies.clone());
    let scheduled = poller.clone();

    let bind = config.bind();
    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(board.clone())
            .app_data(poller.clone())
            .app_data(nodes.clone())
            .app_data(client.clone())
            .app_data(rate_limiter.clone())
            .app_data(trusted.clone())
            .configure(handlers::routes)
    })
        .bind(&bind)?
        .run().await?;

    scheduled.state().stop_schedule();
    info!("Server stopped, poll schedule cancelled");
    Ok(())
}
