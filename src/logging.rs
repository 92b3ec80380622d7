use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Paths hit by load balancers and uptime checks; summarized at `debug` only.
const PROBE_PATHS: [&str; 2] = ["/", "/health"];

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration_ms = started_at.elapsed().as_millis();

    if response.status().is_server_error() {
        warn!(method = %method, path = %path, status, duration_ms, "request failed");
    } else if PROBE_PATHS.contains(&path.as_str()) {
        debug!(method = %method, path = %path, status, duration_ms, "probe summary");
    } else {
        info!(method = %method, path = %path, status, duration_ms, "request summary");
    }

    response
}
