use super::backend::CatalogClient;
use crate::types::{AlbumSummary, Credential, UpstreamError};
use crate::upstream::{API_KEY_HEADER, api_url, error_for_status};

/// Catalog client backed by the Immich HTTP API (`GET /api/albums`)
#[derive(Clone, Default)]
pub struct ImmichCatalogClient {
    http: reqwest::Client,
}

impl ImmichCatalogClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl CatalogClient for ImmichCatalogClient {
    async fn list_owned_albums(
        &self,
        base_url: &str,
        credential: &Credential,
    ) -> Result<Vec<String>, UpstreamError> {
        let endpoint = api_url(base_url, "/albums");
        tracing::debug!("Listing albums at {} with API key {}", endpoint, credential);

        let response = self
            .http
            .get(&endpoint)
            .header(API_KEY_HEADER, credential.as_str())
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let response = error_for_status(&endpoint, response).await?;

        // Read first, then decode, so a broken body and a malformed one stay distinct
        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let albums: Vec<AlbumSummary> =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
                endpoint: endpoint.clone(),
                source,
            })?;

        Ok(albums.into_iter().map(|album| album.id).collect())
    }
}
