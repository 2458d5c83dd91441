use super::AlbumKeys;
use crate::types::Credential;

impl AlbumKeys {
    /// Key to use for `album_id`
    ///
    /// With sync enabled only the cache is consulted: a miss means the key is
    /// unknown until the next refresh. With sync disabled a miss falls back to
    /// [`AlbumKeys::resolve_without_sync`].
    pub async fn get_album_key(&self, album_id: &str) -> Option<Credential> {
        if let Some(key) = self.get(album_id) {
            tracing::debug!("Using cached album key for {}: {}", album_id, key);
            return Some(key);
        }

        if self.sync_enabled {
            tracing::debug!("Album key for {} not cached and sync is enabled", album_id);
            return None;
        }

        tracing::debug!("Album key for {} not cached, probing API keys", album_id);
        let key = self.resolve_without_sync(album_id).await;
        if key.is_none() {
            tracing::warn!("No API key found for album {}", album_id);
        }
        key
    }

    /// Probe every API key in configured order until one lists `album_id`
    ///
    /// The first match is cached and returned; remaining keys are not probed.
    /// Listing failures are logged and skipped.
    pub async fn resolve_without_sync(&self, album_id: &str) -> Option<Credential> {
        for credential in &self.credentials {
            tracing::debug!("Fetching album {} with API key {}", album_id, credential);
            let albums = match self
                .catalog
                .list_owned_albums(&self.base_url, credential)
                .await
            {
                Ok(albums) => albums,
                Err(e) => {
                    tracing::error!("Failed to fetch albums for API key {}: {}", credential, e);
                    continue;
                }
            };

            if albums.iter().any(|id| id == album_id) {
                self.set(album_id, credential.clone());
                return Some(credential.clone());
            }
        }

        None
    }
}
