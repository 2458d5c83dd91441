use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Failure of a single call to the upstream Immich API
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a usable response (connect, timeout, body read)
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status
    #[error("immich api error on endpoint {endpoint}: {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    /// The response body did not have the expected shape
    #[error("decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned to proxy clients
#[derive(Debug)]
pub enum ProxyError {
    BadRequest(String),
    AlbumKeyNotFound(String),
    Upstream(UpstreamError),
    NotImplemented,
}

/// JSON error response format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    code: String,
    message: String,
    request_id: String,
}

impl ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::AlbumKeyNotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ProxyError::BadRequest(_) => "BadRequest",
            ProxyError::AlbumKeyNotFound(_) => "AlbumKeyNotFound",
            ProxyError::Upstream(_) => "UpstreamError",
            ProxyError::NotImplemented => "NotImplemented",
        }
    }

    fn message(&self) -> String {
        match self {
            ProxyError::BadRequest(msg) => msg.clone(),
            ProxyError::AlbumKeyNotFound(album_id) => {
                format!("No API key found for album {}", album_id)
            }
            // Upstream details (endpoint, body) stay in the logs
            ProxyError::Upstream(UpstreamError::Status { status, .. }) => {
                format!("Upstream request failed with status {}", status.as_u16())
            }
            ProxyError::Upstream(_) => "Upstream request failed".to_string(),
            ProxyError::NotImplemented => "Proxy not implemented yet".to_string(),
        }
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        ProxyError::Upstream(err)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        if let ProxyError::Upstream(err) = &self {
            tracing::error!("Upstream request failed: {}", err);
        }

        let error_response = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.message(),
            request_id: uuid::Uuid::new_v4().to_string(),
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}
