use super::FakeImmich;
use immich_share_proxy::{
    AlbumKeys, AppState, Credential, ImmichCatalogClient, ImmichClient, create_app,
};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

/// Test server handle that automatically shuts down on drop
///
/// This starts the proxy on a random port in front of a [`FakeImmich`]. The
/// proxy uses the actual production code via create_app().
pub struct TestServer {
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    refresh_shutdown: watch::Sender<bool>,
    #[allow(dead_code)] // Keep handle alive to prevent task abort
    handle: JoinHandle<()>,
    pub client: reqwest::Client,
    pub base_url: String,
    pub album_keys: Arc<AlbumKeys>,
    pub immich: FakeImmich,
}

impl TestServer {
    /// Start a proxy over `api_keys`; with `sync_enabled` the cache is warmed
    /// before this returns
    pub async fn start(immich: FakeImmich, api_keys: &[&str], sync_enabled: bool) -> Self {
        Self::start_with_cors(immich, api_keys, sync_enabled, None).await
    }

    pub async fn start_with_cors(
        immich: FakeImmich,
        api_keys: &[&str],
        sync_enabled: bool,
        cors: Option<CorsLayer>,
    ) -> Self {
        let http = reqwest::Client::new();
        let credentials = api_keys.iter().map(|k| Credential::from(*k)).collect();

        let album_keys = Arc::new(AlbumKeys::new(
            credentials,
            sync_enabled,
            immich.base_url.clone(),
            Arc::new(ImmichCatalogClient::new(http.clone())),
        ));

        let (refresh_shutdown, refresh_rx) = watch::channel(false);
        album_keys
            .start_refreshing(
                refresh_rx,
                std::time::Duration::from_secs(3600),
                &immich.base_url,
            )
            .await;

        let client = ImmichClient::new(http, immich.base_url.clone(), Arc::clone(&album_keys));

        // Use the ACTUAL production create_app function
        let app = create_app(AppState::new(client), cors);

        // Bind to a random available port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        TestServer {
            shutdown_tx: Some(shutdown_tx),
            refresh_shutdown,
            handle,
            client: reqwest::Client::new(),
            base_url: format!("http://{}", addr),
            album_keys,
            immich,
        }
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path_and_query))
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Signal shutdown (ignore errors if already shut down)
        let _ = self.refresh_shutdown.send(true);
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
