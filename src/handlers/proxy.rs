use crate::types::error::ProxyError;
use axum::{extract::Request, response::IntoResponse};

/// Fallback for every path without a dedicated handler
///
/// Forwarding arbitrary requests to Immich is not supported; answer 501 so
/// nothing reaches the upstream without an explicit route.
pub async fn proxy_passthrough(request: Request) -> impl IntoResponse {
    tracing::info!("Proxying request: {} {}", request.method(), request.uri().path());
    ProxyError::NotImplemented
}
