mod cache;
mod lifecycle;
mod refresher;
mod resolver;

pub use cache::CredentialCache;
pub use refresher::RefreshReport;

use crate::catalog::CatalogClient;
use crate::types::Credential;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize};

/// Resolves which configured API key owns an album
///
/// Constructed once at startup and shared (behind an `Arc`) by the request
/// handlers and the background refresher.
pub struct AlbumKeys {
    credentials: Vec<Credential>,
    sync_enabled: bool,
    base_url: String,
    cache: CredentialCache,
    catalog: Arc<dyn CatalogClient>,
    refreshing: AtomicBool,
    cycles_in_flight: AtomicUsize,
}

impl AlbumKeys {
    /// Create a resolver over `credentials`, probed in the given order
    ///
    /// # Arguments
    /// * `credentials` - Configured API keys
    /// * `sync_enabled` - Whether a background refresh keeps the cache current
    /// * `base_url` - Immich base URL used for on-demand probes
    /// * `catalog` - Client used to list the albums owned by a key
    pub fn new(
        credentials: Vec<Credential>,
        sync_enabled: bool,
        base_url: impl Into<String>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        let base_url = base_url.into();
        tracing::info!(
            "Initializing album keys with {} API keys (sync_enabled: {}, base_url: {})",
            credentials.len(),
            sync_enabled,
            base_url
        );

        Self {
            credentials,
            sync_enabled,
            base_url,
            cache: CredentialCache::new(),
            catalog,
            refreshing: AtomicBool::new(false),
            cycles_in_flight: AtomicUsize::new(0),
        }
    }

    /// Cached key for `album_id`, without touching the network
    pub fn get(&self, album_id: &str) -> Option<Credential> {
        self.cache.get(album_id)
    }

    /// Record `credential` as the owner of `album_id`; empty removes the entry
    pub fn set(&self, album_id: &str, credential: Credential) {
        self.cache.set(album_id, credential);
    }

    pub fn cached_albums(&self) -> usize {
        self.cache.len()
    }
}
