use crate::album_keys::AlbumKeys;
use crate::types::{AlbumInfo, AssetInfo, Credential, ProxyError, SharedLinkInfo, UpstreamError};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Header carrying the Immich API key
pub const API_KEY_HEADER: &str = "x-api-key";

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// `{base_url}/api{endpoint}`
pub fn api_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/api{}", base_url.trim_end_matches('/'), endpoint)
}

/// Check an album or asset id before it becomes an upstream path segment
///
/// Immich ids are UUIDs; anything outside `[A-Za-z0-9_-]` (path separators,
/// `?`, `#`, percent escapes, dot segments) is rejected so a caller cannot
/// steer the request to another upstream endpoint.
pub fn resource_id(id: &str) -> Result<&str, ProxyError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(ProxyError::BadRequest(format!("Invalid id {:?}", id)))
    }
}

/// Pass 2xx responses through; turn anything else into [`UpstreamError::Status`]
pub async fn error_for_status(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

/// Binary asset fetched from Immich
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub content_type: String,
    pub data: Bytes,
}

/// Client for the Immich resources exposed through the proxy
///
/// Album requests are authenticated with the API key that owns the album;
/// shared-link and asset requests carry only the caller's share key.
#[derive(Clone)]
pub struct ImmichClient {
    http: reqwest::Client,
    base_url: String,
    album_keys: Arc<AlbumKeys>,
}

impl ImmichClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        album_keys: Arc<AlbumKeys>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            album_keys,
        }
    }

    async fn send(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        api_key: Option<&Credential>,
    ) -> Result<(String, reqwest::Response), UpstreamError> {
        let url = api_url(&self.base_url, endpoint);
        let mut request = self.http.get(&url).query(query);
        if let Some(key) = api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: url.clone(),
                source,
            })?;
        let response = error_for_status(&url, response).await?;
        Ok((url, response))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        api_key: Option<&Credential>,
    ) -> Result<T, UpstreamError> {
        let (url, response) = self.send(endpoint, query, api_key).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: url.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
            endpoint: url,
            source,
        })
    }

    /// Album details, authenticated with the key that owns the album
    ///
    /// Fails with [`ProxyError::AlbumKeyNotFound`] rather than sending an
    /// unauthenticated request when no key is known for the album.
    pub async fn get_album_info(
        &self,
        album_id: &str,
        without_assets: bool,
    ) -> Result<AlbumInfo, ProxyError> {
        let album_id = resource_id(album_id)?;
        let api_key = self
            .album_keys
            .get_album_key(album_id)
            .await
            .ok_or_else(|| ProxyError::AlbumKeyNotFound(album_id.to_string()))?;

        let without_assets = if without_assets { "true" } else { "false" };
        let album = self
            .get_json(
                &format!("/albums/{}", album_id),
                &[("withoutAssets", without_assets)],
                Some(&api_key),
            )
            .await?;
        Ok(album)
    }

    pub async fn get_shared_link_info(
        &self,
        share_key: &str,
    ) -> Result<SharedLinkInfo, UpstreamError> {
        self.get_json("/shared-links/me", &[("key", share_key)], None)
            .await
    }

    pub async fn get_asset_info(
        &self,
        asset_id: &str,
        share_key: &str,
    ) -> Result<AssetInfo, ProxyError> {
        let asset_id = resource_id(asset_id)?;
        let asset = self
            .get_json(&format!("/assets/{}", asset_id), &[("key", share_key)], None)
            .await?;
        Ok(asset)
    }

    pub async fn get_asset_thumbnail(
        &self,
        asset_id: &str,
        size: &str,
        share_key: &str,
    ) -> Result<AssetFile, ProxyError> {
        let asset_id = resource_id(asset_id)?;
        let file = self
            .get_asset_file(
                &format!("/assets/{}/thumbnail", asset_id),
                &[("size", size), ("key", share_key)],
            )
            .await?;
        Ok(file)
    }

    pub async fn get_asset_original(
        &self,
        asset_id: &str,
        share_key: &str,
    ) -> Result<AssetFile, ProxyError> {
        let asset_id = resource_id(asset_id)?;
        let file = self
            .get_asset_file(&format!("/assets/{}/original", asset_id), &[("key", share_key)])
            .await?;
        Ok(file)
    }

    async fn get_asset_file(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<AssetFile, UpstreamError> {
        let (url, response) = self.send(endpoint, query, None).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: url,
                source,
            })?;

        Ok(AssetFile { content_type, data })
    }
}
