use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::{PipelineStage, StageOutcome};
use crate::core::pipeline::events::{
    ContentCompleteEvent, PipelineEvent, PlatformOutcome, topics,
};
use crate::core::publisher::DraftPublisher;

/// Tweets of a thread are joined into one draft; the publishing service
/// splits on blank lines.
const TWEET_SEPARATOR: &str = "\n\n\n\n";

const TWITTER_DEFAULT_OFFSET_HOURS: i64 = 1;
const LINKEDIN_DEFAULT_OFFSET_HOURS: i64 = 2;

pub struct ScheduleStage {
    publisher: Arc<dyn DraftPublisher>,
}

impl ScheduleStage {
    pub fn new(publisher: Arc<dyn DraftPublisher>) -> Self {
        Self { publisher }
    }

    /// Schedule one platform's draft. Failures are captured in the outcome
    /// instead of propagated, so one platform's outage never blocks the other.
    async fn schedule_platform(
        &self,
        platform: &str,
        content: &str,
        explicit_time: Option<&str>,
        default_time: DateTime<Utc>,
    ) -> PlatformOutcome {
        let schedule_date = match explicit_time {
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(t) => t.with_timezone(&Utc),
                Err(e) => {
                    warn!(
                        "[schedule] {} schedule time '{}' is not valid ISO-8601: {}",
                        platform, raw, e
                    );
                    return PlatformOutcome {
                        requested: true,
                        scheduled: false,
                        schedule_date: None,
                        error: Some(format!("invalid schedule time: {e}")),
                    };
                }
            },
            None => default_time,
        };

        match self.publisher.schedule_draft(content, schedule_date).await {
            Ok(receipt) => {
                info!(
                    "[schedule] {} draft {} scheduled for {}",
                    platform,
                    receipt.id.unwrap_or_default(),
                    schedule_date.to_rfc3339()
                );
                PlatformOutcome {
                    requested: true,
                    scheduled: true,
                    schedule_date: Some(schedule_date.to_rfc3339()),
                    error: None,
                }
            }
            Err(e) => {
                warn!("[schedule] {} draft failed: {:#}", platform, e);
                PlatformOutcome {
                    requested: true,
                    scheduled: false,
                    schedule_date: None,
                    error: Some(format!("{e:#}")),
                }
            }
        }
    }
}

#[async_trait]
impl PipelineStage for ScheduleStage {
    fn name(&self) -> &'static str {
        "schedule"
    }

    fn topic(&self) -> &'static str {
        topics::SCHEDULE_POSTS
    }

    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome> {
        let PipelineEvent::SchedulePosts(input) = event else {
            bail!("schedule stage received an unexpected event type");
        };

        info!("[schedule] scheduling social media posts for: {}", input.title);

        let prefs = input.scheduling_preferences.clone();
        let now = Utc::now();

        let twitter = if prefs.schedule_twitter {
            let texts: Vec<&str> = input
                .content
                .twitter
                .tweets
                .iter()
                .map(|t| t.text.as_str())
                .collect();
            self.schedule_platform(
                "twitter",
                &texts.join(TWEET_SEPARATOR),
                prefs.twitter_schedule_time.as_deref(),
                now + Duration::hours(TWITTER_DEFAULT_OFFSET_HOURS),
            )
            .await
        } else {
            info!("[schedule] twitter scheduling skipped by user");
            PlatformOutcome::skipped()
        };

        let linkedin = if prefs.schedule_linkedin {
            self.schedule_platform(
                "linkedin",
                &input.content.linkedin.post,
                prefs.linkedin_schedule_time.as_deref(),
                now + Duration::hours(LINKEDIN_DEFAULT_OFFSET_HOURS),
            )
            .await
        } else {
            info!("[schedule] linkedin scheduling skipped by user");
            PlatformOutcome::skipped()
        };

        Ok(StageOutcome::Emit {
            topic: topics::CONTENT_COMPLETE,
            event: PipelineEvent::ContentComplete(ContentCompleteEvent {
                request_id: input.request_id,
                url: input.url,
                title: input.title,
                scheduled_at: Utc::now().to_rfc3339(),
                scheduling_preferences: prefs,
                twitter,
                linkedin,
            }),
        })
    }
}
