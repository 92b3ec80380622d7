use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod radio_client;

use config::{LinkPolicy, ProtocolSurface};
use radio_client::StationSearch;

#[derive(Clone)]
pub struct AppState {
    pub station_search: Arc<dyn StationSearch>,
    pub link_policy: Arc<LinkPolicy>,
    pub protocol: ProtocolSurface,
}

impl AppState {
    pub fn new(
        station_search: Arc<dyn StationSearch>,
        link_policy: LinkPolicy,
        protocol: ProtocolSurface,
    ) -> Self {
        Self {
            station_search,
            link_policy: Arc::new(link_policy),
            protocol,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::health))
        .route("/health", get(http::handlers::health))
        .route("/mcp.json", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
