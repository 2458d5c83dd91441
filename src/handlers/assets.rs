use super::params::{ShareKeyQuery, ThumbnailQuery};
use crate::{
    app_state::AppState,
    types::{AssetInfo, error::ProxyError},
    upstream::AssetFile,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

fn file_response(file: AssetFile) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, file.content_type)],
        file.data,
    )
        .into_response()
}

/// GET /api/assets/{id}?key= - Asset metadata
pub async fn get_asset(
    Path(asset_id): Path<String>,
    Query(params): Query<ShareKeyQuery>,
    State(app_state): State<AppState>,
) -> Result<Json<AssetInfo>, ProxyError> {
    let share_key = params.require()?;
    tracing::info!("GET asset: id={}", asset_id);

    let asset = app_state.immich.get_asset_info(&asset_id, &share_key).await?;
    Ok(Json(asset))
}

/// GET /api/assets/{id}/thumbnail?key=&size=preview|thumbnail
pub async fn get_asset_thumbnail(
    Path(asset_id): Path<String>,
    Query(params): Query<ThumbnailQuery>,
    State(app_state): State<AppState>,
) -> Result<Response, ProxyError> {
    let (share_key, size) = params.require()?;
    tracing::info!("GET asset thumbnail: id={}, size={}", asset_id, size);

    let file = app_state
        .immich
        .get_asset_thumbnail(&asset_id, &size, &share_key)
        .await?;
    Ok(file_response(file))
}

/// GET /api/assets/{id}/original?key=
pub async fn get_asset_original(
    Path(asset_id): Path<String>,
    Query(params): Query<ShareKeyQuery>,
    State(app_state): State<AppState>,
) -> Result<Response, ProxyError> {
    let share_key = params.require()?;
    tracing::info!("GET asset original: id={}", asset_id);

    let file = app_state
        .immich
        .get_asset_original(&asset_id, &share_key)
        .await?;
    Ok(file_response(file))
}
