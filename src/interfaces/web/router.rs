use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method},
    response::sse::{Event, Sse},
    routing::{get, post},
};
use std::convert::Infallible;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers::{content, schedule};

fn build_localhost_cors(api_port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", api_port),
        format!("http://localhost:{}", api_port),
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

pub fn build_api_router(state: AppState) -> Router {
    let cors = build_localhost_cors(state.api_port);
    Router::new()
        .route("/generate-content", post(content::generate_content_endpoint))
        .route("/content/{request_id}", get(content::get_content_endpoint))
        .route(
            "/schedule-content/{request_id}",
            post(schedule::schedule_content_endpoint),
        )
        .route("/health", get(health_endpoint))
        .route("/logs", get(sse_logs_endpoint))
        .layer(cors)
        .with_state(state)
}

async fn health_endpoint() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn sse_logs_endpoint(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.log_tx.subscribe();
    let stream = BroadcastStream::new(receiver).map(|msg| {
        match msg {
            Ok(log) => Ok(Event::default().data(log)), // SSE properly encodes this
            Err(_) => Ok(Event::default().data("Log stream lagged")),
        }
    });

    Sse::new(stream)
}
