//! Fake upstream lifecycle management
//!
//! Each test gets its own server; it shuts down when the handle is dropped.

use super::constants::*;
use super::fixtures;
use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use insight_hub::catalog::CatalogClient;
use insight_hub::config::{
    AppConfig, EnvConfig, FileConfig, ENV_LASTFM_API_KEY, ENV_LLM_API_KEY, ENV_LLM_BASE_URL,
    ENV_SPOTIFY_CLIENT_ID, ENV_SPOTIFY_CLIENT_SECRET,
};
use insight_hub::hub::Hub;
use insight_hub::llm::OpenAIProvider;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Failure modes the fake can be started with.
#[derive(Debug, Clone, Default)]
pub struct UpstreamOptions {
    /// Status returned by the chat endpoint instead of a completion
    pub chat_status: Option<u16>,
    /// Status returned by every catalog endpoint (the token endpoint still works)
    pub catalog_status: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct RecordedChat {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct Recorded {
    token_requests: usize,
    catalog_paths: Vec<String>,
    lastfm_requests: Vec<HashMap<String, String>>,
    chat_requests: Vec<RecordedChat>,
}

struct UpstreamState {
    options: UpstreamOptions,
    recorded: Mutex<Recorded>,
}

type Shared = Arc<UpstreamState>;

pub struct FakeUpstream {
    /// Base URL of the server (e.g., "http://127.0.0.1:12345")
    pub base_url: String,
    pub port: u16,

    state: Shared,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeUpstream {
    pub async fn spawn() -> Self {
        Self::spawn_with(UpstreamOptions::default()).await
    }

    /// # Panics
    ///
    /// Panics if the port cannot be bound or the server never becomes ready.
    pub async fn spawn_with(options: UpstreamOptions) -> Self {
        let state: Shared = Arc::new(UpstreamState {
            options,
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/api/token", post(token))
            .route("/v1/artists/{id}", get(artist))
            .route("/v1/artists/{id}/top-tracks", get(top_tracks))
            .route("/v1/artists/{id}/related-artists", get(related_artists))
            .route("/v1/artists/{id}/albums", get(albums))
            .route("/v1/tracks/{id}", get(track))
            .route("/v1/audio-features", get(audio_features_batch))
            .route("/v1/audio-features/{id}", get(audio_features))
            .route("/v1/audio-analysis/{id}", get(audio_analysis))
            .route("/2.0/", get(lastfm))
            .route("/llm/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            state,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Fake upstream did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }
            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await
                }
            }
        }
    }

    pub fn spotify_api_base(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.base_url)
    }

    pub fn lastfm_api_base(&self) -> String {
        format!("{}/2.0/", self.base_url)
    }

    pub fn llm_base_url(&self) -> String {
        format!("{}/llm", self.base_url)
    }

    /// Configuration resolved the same way the binary does it, aimed here.
    pub fn app_config(&self) -> AppConfig {
        let llm_base_url = self.llm_base_url();
        let env = EnvConfig::from_lookup(|name| {
            let value = match name {
                ENV_SPOTIFY_CLIENT_ID => TEST_CLIENT_ID.to_string(),
                ENV_SPOTIFY_CLIENT_SECRET => TEST_CLIENT_SECRET.to_string(),
                ENV_LASTFM_API_KEY => TEST_LASTFM_KEY.to_string(),
                ENV_LLM_API_KEY => TEST_LLM_KEY.to_string(),
                ENV_LLM_BASE_URL => llm_base_url.clone(),
                _ => return None,
            };
            Some(value)
        })
        .expect("Failed to read test environment");

        let file = FileConfig {
            market: Some("NG".to_string()),
            llm_model: Some(TEST_LLM_MODEL.to_string()),
            request_timeout_sec: Some(5),
            spotify_api_base: Some(self.spotify_api_base()),
            spotify_token_url: Some(self.token_url()),
            lastfm_api_base: Some(self.lastfm_api_base()),
            ..Default::default()
        };

        AppConfig::resolve(env, Some(file)).expect("Failed to resolve test config")
    }

    pub fn catalog(&self) -> CatalogClient {
        CatalogClient::new(self.app_config().catalog_settings())
            .expect("Failed to build catalog client")
    }

    pub fn hub(&self) -> Hub {
        let config = self.app_config();
        let catalog =
            CatalogClient::new(config.catalog_settings()).expect("Failed to build catalog client");
        let llm = Arc::new(OpenAIProvider::new(
            config.env.llm_base_url.clone(),
            config.llm_model.clone(),
            config.env.llm_api_key.clone(),
        ));
        Hub::new(catalog, llm, config.hub_settings())
    }

    pub fn token_requests(&self) -> usize {
        self.state.recorded.lock().unwrap().token_requests
    }

    pub fn catalog_paths(&self) -> Vec<String> {
        self.state.recorded.lock().unwrap().catalog_paths.clone()
    }

    pub fn lastfm_requests(&self) -> Vec<HashMap<String, String>> {
        self.state.recorded.lock().unwrap().lastfm_requests.clone()
    }

    pub fn chat_requests(&self) -> Vec<RecordedChat> {
        self.state.recorded.lock().unwrap().chat_requests.clone()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"error": {"status": status.as_u16(), "message": message}})),
    )
        .into_response()
}

async fn token(State(state): State<Shared>, headers: HeaderMap, body: String) -> Response {
    state.recorded.lock().unwrap().token_requests += 1;

    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized || !body.contains("grant_type=client_credentials") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_client"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .into_response()
}

/// Record the request, enforce the bearer token and serve `payload` or 404.
fn catalog_reply(
    state: &UpstreamState,
    headers: &HeaderMap,
    path: String,
    payload: Option<Value>,
) -> Response {
    state.recorded.lock().unwrap().catalog_paths.push(path);

    if let Some(status) = state.options.catalog_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error_body(status, "Forced failure");
    }

    let expected = format!("Bearer {}", TEST_ACCESS_TOKEN);
    let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if bearer != Some(expected.as_str()) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid access token");
    }

    match payload {
        Some(value) => Json(value).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

async fn artist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let payload = fixtures::artist_json(&id);
    catalog_reply(&state, &headers, format!("/artists/{}", id), payload)
}

async fn top_tracks(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let market = query.get("market").cloned().unwrap_or_default();
    let payload = fixtures::top_tracks_json(&id);
    catalog_reply(
        &state,
        &headers,
        format!("/artists/{}/top-tracks?market={}", id, market),
        payload,
    )
}

async fn related_artists(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let payload = fixtures::related_artists_json(&id);
    catalog_reply(
        &state,
        &headers,
        format!("/artists/{}/related-artists", id),
        payload,
    )
}

async fn albums(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let path = format!(
        "/artists/{}/albums?include_groups={}&limit={}",
        id,
        query.get("include_groups").cloned().unwrap_or_default(),
        query.get("limit").cloned().unwrap_or_default()
    );
    catalog_reply(&state, &headers, path, fixtures::albums_json(&id))
}

async fn track(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let payload = fixtures::track_json(&id);
    catalog_reply(&state, &headers, format!("/tracks/{}", id), payload)
}

async fn audio_features(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let payload = fixtures::audio_features_json(&id);
    catalog_reply(&state, &headers, format!("/audio-features/{}", id), payload)
}

async fn audio_features_batch(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let ids = query.get("ids").cloned().unwrap_or_default();
    let features: Vec<Value> = ids
        .split(',')
        .map(|id| fixtures::audio_features_json(id).unwrap_or(Value::Null))
        .collect();
    catalog_reply(
        &state,
        &headers,
        format!("/audio-features?ids={}", ids),
        Some(json!({ "audio_features": features })),
    )
}

async fn audio_analysis(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let payload = fixtures::audio_analysis_json(&id);
    catalog_reply(&state, &headers, format!("/audio-analysis/{}", id), payload)
}

async fn lastfm(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state
        .recorded
        .lock()
        .unwrap()
        .lastfm_requests
        .push(query.clone());

    // Last.fm reports errors in-band with a 200 status
    if query.get("api_key").map(String::as_str) != Some(TEST_LASTFM_KEY) {
        return Json(json!({"error": 10, "message": "Invalid API key"})).into_response();
    }
    if query.get("method").map(String::as_str) != Some("artist.getinfo") {
        return Json(json!({"error": 3, "message": "Invalid Method"})).into_response();
    }

    let name = query.get("artist").cloned().unwrap_or_default();
    Json(fixtures::lastfm_artist_json(&name)).into_response()
}

async fn chat_completions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let model = body["model"].as_str().unwrap_or_default().to_string();

    state
        .recorded
        .lock()
        .unwrap()
        .chat_requests
        .push(RecordedChat {
            authorization,
            body,
        });

    if let Some(status) = state.options.chat_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (
            status,
            Json(json!({"error": {"message": "Forced failure", "type": "server_error"}})),
        )
            .into_response();
    }

    Json(fixtures::chat_completion_json(&model)).into_response()
}
