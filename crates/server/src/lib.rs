//! RFQ matcher HTTP server
//!
//! Actix-web REST API over the startup catalog index

pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use rfqmatch_common::{AppConfig, Result, RfqMatchError};
use rfqmatch_matcher::RfqMatcher;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Register routes and extractor configuration
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(routes::rfq::json_config())
        .service(routes::rfq::rfq_search)
        .service(routes::system::health)
        .service(routes::system::catalog_stats);
}

/// Serve until shutdown
///
/// The matcher must already hold a fully built index.
pub async fn start_server(config: AppConfig, matcher: Arc<RfqMatcher>) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(Arc::new(AppState::new(matcher)));

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind_addr)
    .map_err(|e| RfqMatchError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
