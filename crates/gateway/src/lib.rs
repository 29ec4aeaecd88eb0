//! HTTP gateway for ragloop.
//!
//! One real endpoint: `/api/stream`, reachable by GET (query parameters)
//! and POST (JSON body), answering with an SSE stream of answer chunks.
//! Plus `/health` for monitoring.
//!
//! The gateway opens the stream only after the session is resolved;
//! session creation is the one failure a client sees as an HTTP status.
//! Everything after the first frame arrives in-band, terminal error chunk
//! included.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use ragloop_agent::{StreamChunk, TurnRequest, TurnService};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: Arc<TurnService>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/stream", get(stream_get_handler).post(stream_post_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(host: &str, port: u16, service: Arc<TurnService>) -> std::io::Result<()> {
    let addr = format!("{host}:{port}");
    let app = build_router(Arc::new(GatewayState { service }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn stream_get_handler(
    State(state): State<SharedState>,
    Query(request): Query<TurnRequest>,
) -> Response {
    open_stream(state, request).await
}

async fn stream_post_handler(
    State(state): State<SharedState>,
    Json(request): Json<TurnRequest>,
) -> Response {
    open_stream(state, request).await
}

async fn open_stream(state: SharedState, request: TurnRequest) -> Response {
    if request.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "query must not be empty".into(),
            }),
        )
            .into_response();
    }

    match state.service.submit(request).await {
        Ok((session_id, rx)) => {
            info!(session = %session_id, "Stream opened");
            let stream = ReceiverStream::new(rx)
                .map(|chunk| Ok::<SseEvent, Infallible>(sse_event(&chunk)));
            let sse = Sse::new(stream).keep_alive(KeepAlive::default());
            ([(header::CACHE_CONTROL, "no-cache")], sse).into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to open stream");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn sse_event(chunk: &StreamChunk) -> SseEvent {
    match serde_json::to_string(chunk) {
        Ok(json) => SseEvent::default().data(json),
        // StreamChunk is three plain fields; this arm is unreachable in
        // practice but the client still needs a terminal frame.
        Err(_) => SseEvent::default().data(format!(
            r#"{{"content":"","session_id":"{}","done":true}}"#,
            chunk.session_id
        )),
    }
}
