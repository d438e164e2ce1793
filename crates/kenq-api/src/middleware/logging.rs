//! Request logging middleware

use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

/// Requests slower than this are logged as warnings
pub const SLOW_REQUEST: Duration = Duration::from_millis(100);

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!("Request: {} {}", method, path);

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    if duration > SLOW_REQUEST {
        tracing::warn!("Slow request: {} {} took {:?}", method, path, duration);
    }

    tracing::info!(
        "Response: {} {} - {} in {}ms",
        method,
        path,
        response.status(),
        duration.as_millis()
    );

    response
}
