use super::params::ShareKeyQuery;
use crate::{
    app_state::AppState,
    types::{SharedLinkInfo, error::ProxyError},
};
use axum::{
    Json,
    extract::{Query, State},
};

/// GET /api/shared-links/me?key= - Shared link behind a share key
pub async fn get_shared_link(
    Query(params): Query<ShareKeyQuery>,
    State(app_state): State<AppState>,
) -> Result<Json<SharedLinkInfo>, ProxyError> {
    let share_key = params.require()?;
    tracing::info!("GET shared link");

    let link = app_state.immich.get_shared_link_info(&share_key).await?;
    Ok(Json(link))
}
