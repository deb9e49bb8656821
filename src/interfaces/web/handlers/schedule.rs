use anyhow::Context;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::super::AppState;
use crate::core::error::ApiError;
use crate::core::pipeline::events::{
    PipelineEvent, ReviewDecision, SchedulePostsEvent, SchedulingPreferences, StoredSubmission,
    topics,
};
use crate::core::store::slots;

fn default_true() -> bool {
    true
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleContentRequest {
    approve: bool,
    #[serde(default = "default_true")]
    schedule_twitter: bool,
    #[serde(default = "default_true")]
    schedule_linkedin: bool,
    #[serde(default)]
    twitter_schedule_time: Option<String>,
    #[serde(default)]
    linkedin_schedule_time: Option<String>,
}

pub async fn schedule_content_endpoint(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ScheduleContentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stored = state
        .store
        .get(&request_id, slots::CONTENT)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Content not found. Please generate content first.".to_string())
        })?;

    // A review decision is final: a declined request cannot be resurrected
    // and an approved one cannot be scheduled twice.
    if state.store.get(&request_id, slots::REVIEW).await?.is_some() {
        return Err(ApiError::Conflict(
            "This request was already reviewed".to_string(),
        ));
    }

    for raw in [
        payload.twitter_schedule_time.as_deref(),
        payload.linkedin_schedule_time.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        DateTime::parse_from_rfc3339(raw).map_err(|_| {
            ApiError::BadRequest(format!("Schedule times must be ISO-8601, got '{raw}'"))
        })?;
    }

    let decision = ReviewDecision {
        approved: payload.approve,
        decided_at: Utc::now().to_rfc3339(),
    };
    state
        .store
        .set(
            &request_id,
            slots::REVIEW,
            &serde_json::to_value(&decision).context("failed to encode review decision")?,
        )
        .await?;

    if !payload.approve {
        info!("[api] user declined to schedule content for request {}", request_id);
        return Ok(Json(serde_json::json!({
            "message": "Content scheduling declined",
            "requestId": request_id,
            "scheduled": { "twitter": false, "linkedin": false }
        })));
    }

    info!("[api] user approved scheduling for request {}", request_id);

    let submission: StoredSubmission =
        serde_json::from_value(stored).context("stored submission is corrupt")?;

    let preferences = SchedulingPreferences {
        schedule_twitter: payload.schedule_twitter,
        schedule_linkedin: payload.schedule_linkedin,
        twitter_schedule_time: payload.twitter_schedule_time,
        linkedin_schedule_time: payload.linkedin_schedule_time,
    };

    state.bus.publish(
        topics::SCHEDULE_POSTS,
        PipelineEvent::SchedulePosts(SchedulePostsEvent {
            request_id: submission.request_id.clone(),
            url: submission.url,
            title: submission.title,
            strategy: submission.strategy,
            content: submission.content,
            metadata: submission.metadata,
            scheduling_preferences: preferences.clone(),
        }),
    )?;

    Ok(Json(serde_json::json!({
        "message": "Content scheduling initiated",
        "requestId": request_id,
        "scheduled": {
            "twitter": preferences.schedule_twitter,
            "linkedin": preferences.schedule_linkedin
        }
    })))
}
