use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;
use url::Url;
use uuid::Uuid;

use super::super::AppState;
use crate::core::error::ApiError;
use crate::core::pipeline::events::{PipelineEvent, ScrapeArticleEvent, topics};
use crate::core::store::slots;

#[derive(serde::Deserialize)]
pub struct GenerateContentRequest {
    url: String,
}

pub async fn generate_content_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<GenerateContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = Url::parse(payload.url.trim())
        .map_err(|_| ApiError::BadRequest("Valid URL is required".to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ApiError::BadRequest(
            "URL must use http or https".to_string(),
        ));
    }

    let request_id = Uuid::new_v4().to_string();
    info!("[api] content generation requested for {} ({})", url, request_id);

    state.bus.publish(
        topics::SCRAPE_ARTICLE,
        PipelineEvent::ScrapeArticle(ScrapeArticleEvent {
            request_id: request_id.clone(),
            url: url.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }),
    )?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "Content generation started",
            "requestId": request_id,
            "url": url.to_string(),
            "status": "processing"
        })),
    ))
}

pub async fn get_content_endpoint(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.store.get(&request_id, slots::CONTENT).await? {
        Some(submission) => Ok(Json(submission)),
        None => Err(ApiError::NotFound(
            "Content not found. Please generate content first.".to_string(),
        )),
    }
}
