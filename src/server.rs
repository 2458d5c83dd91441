use crate::{app_state::AppState, handlers};
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router with all routes and middleware
///
/// This function is used by both main.rs and integration tests to ensure
/// the same server configuration is used in both production and tests.
pub fn create_app(app_state: AppState, cors: Option<CorsLayer>) -> Router {
    use handlers::{
        get_album, get_asset, get_asset_original, get_asset_thumbnail, get_shared_link,
        proxy_passthrough,
    };

    let router = Router::new()
        // Album operations, authenticated with the owning API key
        .route("/api/albums/{id}", get(get_album))
        // Share-key operations, forwarded with the caller's key only
        .route("/api/shared-links/me", get(get_shared_link))
        .route("/api/assets/{id}", get(get_asset))
        .route("/api/assets/{id}/thumbnail", get(get_asset_thumbnail))
        .route("/api/assets/{id}/original", get(get_asset_original))
        // Everything else
        .fallback(proxy_passthrough)
        .with_state(app_state);

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}
