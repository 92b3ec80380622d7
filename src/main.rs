use std::sync::Arc;

use radio_search_mcp::{
    build_app, config::Config, logging, radio_client::RadioApiClient, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let client = RadioApiClient::new(config.upstream_base_url.clone(), config.upstream_timeout)?;

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(
        Arc::new(client),
        config.link_policy.clone(),
        config.protocol,
    );
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        upstream = %config.upstream_base_url,
        link_policy = ?config.link_policy,
        legacy_methods = config.protocol.legacy_method_names,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
