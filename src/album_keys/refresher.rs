use super::AlbumKeys;
use futures::future::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};

/// Outcome of one refresh cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// API keys whose listing succeeded
    pub succeeded: usize,
    /// API keys whose listing failed and were skipped this cycle
    pub failed: usize,
    /// Album ids merged into the cache
    pub albums: usize,
}

impl AlbumKeys {
    /// List the albums of every API key concurrently and merge them into the cache
    ///
    /// Each key's albums are merged as soon as its listing returns. A failed
    /// listing is logged and skipped; it never stops the other keys. Returns
    /// once every listing has completed.
    pub async fn refresh_all(&self, base_url: &str) -> RefreshReport {
        tracing::debug!(
            "Fetching all albums from {} with {} API keys",
            base_url,
            self.credentials.len()
        );

        let mut listings = self
            .credentials
            .iter()
            .map(|credential| {
                let catalog = &self.catalog;
                async move {
                    let result = catalog.list_owned_albums(base_url, credential).await;
                    (credential, result)
                }
                .boxed()
            })
            .collect::<FuturesUnordered<_>>();

        let mut report = RefreshReport::default();
        while let Some((credential, result)) = listings.next().await {
            match result {
                Ok(albums) => {
                    tracing::debug!("API key {} owns {} albums", credential, albums.len());
                    for album_id in &albums {
                        self.cache.set(album_id, credential.clone());
                    }
                    report.succeeded += 1;
                    report.albums += albums.len();
                }
                Err(e) => {
                    tracing::error!("Failed to fetch albums for API key {}: {}", credential, e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Albums refresh finished: {} keys ok, {} failed, {} albums",
            report.succeeded,
            report.failed,
            report.albums
        );
        report
    }
}
