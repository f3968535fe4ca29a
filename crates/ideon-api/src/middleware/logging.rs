use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Per-request access log, written after the handler finishes.
///
/// Server errors get their own level so they stand out at the default filter.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(%method, path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else {
        tracing::info!(%method, path, status = status.as_u16(), elapsed_ms, "Request handled");
    }

    response
}
