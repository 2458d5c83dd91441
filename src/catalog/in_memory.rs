use super::backend::CatalogClient;
use crate::types::{Credential, UpstreamError};
use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory album catalog for testing/development
///
/// Keys with no registered albums answer 401, like Immich does for unknown
/// API keys. Every call is counted per key so callers can assert which keys
/// were probed.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

#[derive(Default)]
struct CatalogState {
    albums: HashMap<Credential, Vec<String>>,
    failures: HashMap<Credential, StatusCode>,
    calls: HashMap<Credential, usize>,
    latency: Option<Duration>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the album listing returned for `credential`
    pub async fn set_albums<I, S>(&self, credential: &Credential, albums: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write().await;
        state.failures.remove(credential);
        state
            .albums
            .insert(credential.clone(), albums.into_iter().map(Into::into).collect());
    }

    /// Make every listing for `credential` fail with `status`
    pub async fn fail_with_status(&self, credential: &Credential, status: StatusCode) {
        self.state
            .write()
            .await
            .failures
            .insert(credential.clone(), status);
    }

    /// Delay every listing call, to keep calls in flight during tests
    pub async fn set_latency(&self, latency: Duration) {
        self.state.write().await.latency = Some(latency);
    }

    pub async fn calls(&self, credential: &Credential) -> usize {
        self.state
            .read()
            .await
            .calls
            .get(credential)
            .copied()
            .unwrap_or(0)
    }

    pub async fn total_calls(&self) -> usize {
        self.state.read().await.calls.values().sum()
    }
}

#[async_trait::async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn list_owned_albums(
        &self,
        base_url: &str,
        credential: &Credential,
    ) -> Result<Vec<String>, UpstreamError> {
        let latency = {
            let mut state = self.state.write().await;
            *state.calls.entry(credential.clone()).or_insert(0) += 1;
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let endpoint = format!("{}/api/albums", base_url);
        let state = self.state.read().await;

        if let Some(status) = state.failures.get(credential) {
            return Err(UpstreamError::Status {
                endpoint,
                status: *status,
                body: "simulated failure".to_string(),
            });
        }

        state
            .albums
            .get(credential)
            .cloned()
            .ok_or_else(|| UpstreamError::Status {
                endpoint,
                status: StatusCode::UNAUTHORIZED,
                body: r#"{"message":"Invalid API key"}"#.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_registered_albums() {
        let catalog = InMemoryCatalog::new();
        let key = Credential::from("key-a");
        catalog.set_albums(&key, ["a1", "a2"]).await;

        let albums = catalog.list_owned_albums("http://immich", &key).await.unwrap();
        assert_eq!(albums, vec!["a1".to_string(), "a2".to_string()]);
        assert_eq!(catalog.calls(&key).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_key_is_unauthorized() {
        let catalog = InMemoryCatalog::new();
        let result = catalog
            .list_owned_albums("http://immich", &Credential::from("nope"))
            .await;

        assert!(matches!(
            result,
            Err(UpstreamError::Status { status, .. }) if status == StatusCode::UNAUTHORIZED
        ));
    }

    #[tokio::test]
    async fn test_failure_overrides_albums_and_is_counted() {
        let catalog = InMemoryCatalog::new();
        let key = Credential::from("key-a");
        catalog.set_albums(&key, ["a1"]).await;
        catalog
            .fail_with_status(&key, StatusCode::SERVICE_UNAVAILABLE)
            .await;

        assert!(catalog.list_owned_albums("http://immich", &key).await.is_err());
        assert!(catalog.list_owned_albums("http://immich", &key).await.is_err());
        assert_eq!(catalog.total_calls().await, 2);
    }
}
