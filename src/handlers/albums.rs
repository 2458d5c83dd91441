use crate::{
    app_state::AppState,
    types::{AlbumInfo, error::ProxyError},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumQuery {
    without_assets: Option<bool>,
}

/// GET /api/albums/{id} - Album details, authenticated with the owning API key
pub async fn get_album(
    Path(album_id): Path<String>,
    Query(params): Query<AlbumQuery>,
    State(app_state): State<AppState>,
) -> Result<Json<AlbumInfo>, ProxyError> {
    tracing::info!("GET album: id={}", album_id);

    let album = app_state
        .immich
        .get_album_info(&album_id, params.without_assets.unwrap_or(false))
        .await?;

    tracing::debug!("Album {} returned with {} assets", album_id, album.assets.len());
    Ok(Json(album))
}
