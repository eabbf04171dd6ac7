//! HTTP transport — game routes, data-pipeline routes, and /health.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use hangman::Difficulty;

use crate::pipeline::{ApiClient, DataPipeline};
use crate::session::{GameRegistry, DEFAULT_SESSION};
use crate::types::{
    parse_body, parse_lenient, time_update_json, GuessRequest, GuessResponse, ServerError,
    ServerResult, StartGameRequest, StartGameResponse, UpdateTimeRequest,
};

/// Header that selects the game session.
pub const SESSION_HEADER: &str = "x-session-id";

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared server state passed to all handlers via axum State.
pub struct AppState {
    pub registry: Mutex<GameRegistry>,
    pub api_url: String,
    pub output_dir: PathBuf,
}

impl AppState {
    pub fn new(registry: GameRegistry, api_url: &str, output_dir: PathBuf) -> Self {
        Self {
            registry: Mutex::new(registry),
            api_url: api_url.to_string(),
            output_dir,
        }
    }
}

/// HTTP server for the browser client.
pub struct HttpTransport {
    state: Arc<AppState>,
}

impl HttpTransport {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> ServerResult<()> {
        let app = router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Io)?;

        tracing::info!("HTTP transport listening on http://{addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        Ok(())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

/// Build the router with every route.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/start_game", post(handle_start_game))
        .route("/guess", post(handle_guess))
        .route("/update_time", post(handle_update_time))
        .route("/state", get(handle_state))
        .route("/api/data/pipeline", get(handle_pipeline))
        .route("/api/data/status", get(handle_data_status))
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state)
}

/// Session id from the request header, or the shared default session.
fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let sessions = state.registry.lock().await.count();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
    }))
}

async fn handle_start_game(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<StartGameResponse> {
    let session = session_id(&headers);
    let req: StartGameRequest = parse_lenient(&body);
    let difficulty = Difficulty::parse_or_default(req.difficulty.as_deref());

    let info = state.registry.lock().await.start(&session, difficulty);
    Json(StartGameResponse::new(&session, info))
}

async fn handle_guess(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<GuessResponse>> {
    let session = session_id(&headers);
    let req: GuessRequest = parse_lenient(&body);
    let letter = req.letter.unwrap_or_default();

    let outcome = state.registry.lock().await.guess(&session, &letter)?;
    Ok(Json(GuessResponse::from(outcome)))
}

async fn handle_update_time(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<Value>> {
    let session = session_id(&headers);
    let req: UpdateTimeRequest = parse_body(&body)?;

    let update = state
        .registry
        .lock()
        .await
        .update_time(&session, req.time_left.unwrap_or(0))?;
    Ok(Json(time_update_json(&update)))
}

async fn handle_state(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ServerResult<Json<Value>> {
    let session = session_id(&headers);
    let view = state.registry.lock().await.view(&session)?;
    Ok(Json(json!(view)))
}

async fn handle_pipeline(State(state): State<Arc<AppState>>) -> ServerResult<Json<Value>> {
    let pipeline = DataPipeline::new(ApiClient::new(&state.api_url), &state.output_dir)
        .inspect_err(|e| tracing::error!("Error running pipeline: {e}"))?;
    let report = pipeline.run().await;
    Ok(Json(json!({ "status": "success", "results": report })))
}

async fn handle_data_status() -> Json<Value> {
    Json(json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_not_found() -> ServerError {
    ServerError::NotFound
}
