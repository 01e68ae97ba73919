//! Request logging middleware, grounded on the teacher's
//! `server::logging::log_requests` verbatim (method/path/status/duration
//! fields under a per-module `LOG_TARGET`).

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

const LOG_TARGET: &str = "server::http";

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = uri.path().to_string();
    let query = uri.query().unwrap_or("").to_string();

    if query.is_empty() {
        tracing::info!(target: LOG_TARGET, %method, %path, "incoming request");
    } else {
        tracing::info!(target: LOG_TARGET, %method, %path, %query, "incoming request");
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        target: LOG_TARGET,
        %method,
        %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "request completed"
    );

    response
}
