use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Request seen by the fake upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Default)]
struct FakeState {
    albums: HashMap<String, Vec<String>>,
    failing_keys: HashSet<String>,
    garbage_keys: HashSet<String>,
    share_keys: HashSet<String>,
    requests: Vec<RecordedRequest>,
}

/// Minimal Immich API on a random local port
///
/// `GET /api/albums` answers per `x-api-key`; album details are only served
/// to the key that owns the album, like the real server.
#[derive(Clone)]
pub struct FakeImmich {
    state: Arc<Mutex<FakeState>>,
    pub base_url: String,
    pub addr: SocketAddr,
    #[allow(dead_code)] // Keep handle alive to prevent task abort
    handle: Arc<JoinHandle<()>>,
}

impl FakeImmich {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(FakeState::default()));

        let app = Router::new()
            .route("/api/albums", get(list_albums))
            .route("/api/albums/{id}", get(get_album))
            .route("/api/shared-links/me", get(get_shared_link))
            .route("/api/assets/{id}", get(get_asset))
            .route("/api/assets/{id}/thumbnail", get(get_thumbnail))
            .route("/api/assets/{id}/original", get(get_original))
            .layer(axum::middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeImmich {
            state,
            base_url: format!("http://{}", addr),
            addr,
            handle: Arc::new(handle),
        }
    }

    pub fn with_albums(&self, api_key: &str, albums: &[&str]) -> &Self {
        self.state.lock().unwrap().albums.insert(
            api_key.to_string(),
            albums.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    /// Album listings for `api_key` answer 500
    pub fn failing(&self, api_key: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .failing_keys
            .insert(api_key.to_string());
        self
    }

    /// Album listings for `api_key` answer 200 with a body that is not JSON
    pub fn garbage(&self, api_key: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .garbage_keys
            .insert(api_key.to_string());
        self
    }

    pub fn with_share_key(&self, share_key: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .share_keys
            .insert(share_key.to_string());
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn listing_calls(&self, api_key: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path == "/api/albums" && r.api_key.as_deref() == Some(api_key))
            .count()
    }
}

type SharedState = Arc<Mutex<FakeState>>;

async fn record(
    State(state): State<SharedState>,
    request: Request,
    next: axum::middleware::Next,
) -> Response {
    let recorded = RecordedRequest {
        path: request.uri().path().to_string(),
        query: request.uri().query().map(String::from),
        api_key: api_key(request.headers()),
    };
    state.lock().unwrap().requests.push(recorded);
    next.run(request).await
}

fn api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid API key", "statusCode": 401 })),
    )
        .into_response()
}

async fn list_albums(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(key) = api_key(&headers) else {
        return unauthorized();
    };
    let state = state.lock().unwrap();

    if state.failing_keys.contains(&key) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if state.garbage_keys.contains(&key) {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }

    match state.albums.get(&key) {
        Some(albums) => {
            let body: Vec<_> = albums
                .iter()
                .map(|id| json!({ "id": id, "albumName": format!("Album {}", id) }))
                .collect();
            Json(body).into_response()
        }
        None => unauthorized(),
    }
}

async fn get_album(
    Path(id): Path<String>,
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Response {
    let Some(key) = api_key(&headers) else {
        return unauthorized();
    };
    let owns = state
        .lock()
        .unwrap()
        .albums
        .get(&key)
        .is_some_and(|albums| albums.contains(&id));
    if !owns {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Not found or no album.read access" })))
            .into_response();
    }

    Json(json!({
        "id": id,
        "albumName": format!("Album {}", id),
        "ownerId": "owner-1",
        "owner": { "email": "owner@example.org" },
        "assetCount": 1,
        "assets": [{ "id": "asset-1", "type": "IMAGE", "originalFileName": "IMG_0001.jpg" }]
    }))
    .into_response()
}

async fn get_shared_link(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<SharedState>,
) -> Response {
    let valid = params
        .get("key")
        .is_some_and(|k| state.lock().unwrap().share_keys.contains(k));
    if !valid {
        return unauthorized();
    }
    let key = params["key"].clone();

    Json(json!({
        "id": "link-1",
        "key": key,
        "allowDownload": true,
        "password": "should-not-leak",
        "album": { "id": "album-1", "albumName": "Shared" }
    }))
    .into_response()
}

async fn get_asset(Path(id): Path<String>) -> Response {
    Json(json!({
        "id": id,
        "type": "IMAGE",
        "originalFileName": "IMG_0001.jpg",
        "originalPath": "/usr/src/app/upload/secret/IMG_0001.jpg",
        "exifInfo": { "make": "Canon", "city": "Lisbon" }
    }))
    .into_response()
}

async fn get_thumbnail(Path(id): Path<String>) -> Response {
    (
        [(header::CONTENT_TYPE, "image/webp")],
        format!("thumbnail-bytes-{}", id),
    )
        .into_response()
}

async fn get_original(Path(id): Path<String>) -> Response {
    (
        [(header::CONTENT_TYPE, "image/jpeg")],
        format!("original-bytes-{}", id),
    )
        .into_response()
}
