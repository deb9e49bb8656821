//! Typed events carried on the pipeline bus, and the topic names that route
//! them. Wire shapes are camelCase and match the stored submission format.

use serde::{Deserialize, Serialize};

/// Topic names, one per edge of the stage graph. Each topic has a single
/// subscriber; `content-stored` is a flow marker with no consumer.
pub mod topics {
    pub const SCRAPE_ARTICLE: &str = "scrape-article";
    pub const ANALYZE_CONTENT: &str = "analyze-content";
    pub const GENERATE_CONTENT: &str = "generate-content";
    pub const CONTENT_READY: &str = "content-ready";
    pub const CONTENT_STORED: &str = "content-stored";
    pub const SCHEDULE_POSTS: &str = "schedule-posts";
    pub const CONTENT_COMPLETE: &str = "content-complete";
}

#[derive(Debug, Clone)]
pub enum PipelineEvent {
    ScrapeArticle(ScrapeArticleEvent),
    AnalyzeContent(AnalyzeContentEvent),
    GenerateContent(GenerateContentEvent),
    ContentReady(ContentReadyEvent),
    ContentStored(ContentStoredEvent),
    SchedulePosts(SchedulePostsEvent),
    ContentComplete(ContentCompleteEvent),
}

impl PipelineEvent {
    /// The request this event belongs to; every event carries one.
    pub fn request_id(&self) -> &str {
        match self {
            PipelineEvent::ScrapeArticle(e) => &e.request_id,
            PipelineEvent::AnalyzeContent(e) => &e.request_id,
            PipelineEvent::GenerateContent(e) => &e.request_id,
            PipelineEvent::ContentReady(e) => &e.request_id,
            PipelineEvent::ContentStored(e) => &e.request_id,
            PipelineEvent::SchedulePosts(e) => &e.request_id,
            PipelineEvent::ContentComplete(e) => &e.request_id,
        }
    }
}

/// Kicks off the chain for one submitted URL. `timestamp` is the submission
/// time in epoch milliseconds and is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeArticleEvent {
    pub request_id: String,
    pub url: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeContentEvent {
    pub request_id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TweetFormat {
    Single,
    Thread,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub main_themes: Vec<String>,
    pub target_audience: String,
    pub complexity_level: ComplexityLevel,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterStrategy {
    pub hook: String,
    pub angle: String,
    pub hashtags: Vec<String>,
    pub format: TweetFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinStrategy {
    pub angle: String,
    pub value_proposition: String,
    pub call_to_action: String,
    pub hashtags: Vec<String>,
}

/// The structured plan guiding content generation, produced once per request
/// by the strategy model and passed through unchanged by later stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStrategy {
    pub analysis: Analysis,
    pub twitter_strategy: TwitterStrategy,
    pub linkedin_strategy: LinkedinStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentEvent {
    pub request_id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub strategy: ContentStrategy,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub text: String,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterContent {
    pub tweets: Vec<Tweet>,
    pub total_tweets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinContent {
    pub post: String,
    pub character_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub twitter: TwitterContent,
    pub linkedin: LinkedinContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    pub generated_at: String,
    /// Milliseconds between submission and generation finishing.
    pub processing_time: i64,
    pub target_audience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReadyEvent {
    pub request_id: String,
    pub url: String,
    pub title: String,
    pub strategy: ContentStrategy,
    pub content: GeneratedContent,
    pub metadata: ContentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStoredEvent {
    pub request_id: String,
    pub title: String,
    pub url: String,
    pub stored_at: String,
}

/// The durable record handed from the generation pipeline to the approval
/// boundary. Written exactly once per request by the review stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub request_id: String,
    pub url: String,
    pub title: String,
    pub strategy: ContentStrategy,
    pub content: GeneratedContent,
    pub metadata: ContentMetadata,
}

/// The recorded human decision for a request. A request is reviewed at most
/// once; later approval attempts are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    pub approved: bool,
    pub decided_at: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingPreferences {
    #[serde(default = "default_true")]
    pub schedule_twitter: bool,
    #[serde(default = "default_true")]
    pub schedule_linkedin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_schedule_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_schedule_time: Option<String>,
}

impl Default for SchedulingPreferences {
    fn default() -> Self {
        Self {
            schedule_twitter: true,
            schedule_linkedin: true,
            twitter_schedule_time: None,
            linkedin_schedule_time: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePostsEvent {
    pub request_id: String,
    pub url: String,
    pub title: String,
    pub strategy: ContentStrategy,
    pub content: GeneratedContent,
    pub metadata: ContentMetadata,
    pub scheduling_preferences: SchedulingPreferences,
}

/// Outcome of one platform's scheduling attempt. Platforms are fault-isolated:
/// one platform's failure never blocks the other's attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOutcome {
    pub requested: bool,
    pub scheduled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlatformOutcome {
    pub fn skipped() -> Self {
        Self {
            requested: false,
            scheduled: false,
            schedule_date: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCompleteEvent {
    pub request_id: String,
    pub url: String,
    pub title: String,
    pub scheduled_at: String,
    pub scheduling_preferences: SchedulingPreferences,
    pub twitter: PlatformOutcome,
    pub linkedin: PlatformOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_submission_uses_camel_case_keys() {
        let submission: StoredSubmission = serde_json::from_value(json!({
            "requestId": "req-1",
            "url": "https://example.com/article",
            "title": "Example",
            "strategy": {
                "analysis": {
                    "mainThemes": ["a"],
                    "targetAudience": "engineers",
                    "complexityLevel": "intermediate",
                    "keyInsights": ["b"]
                },
                "twitterStrategy": {
                    "hook": "h",
                    "angle": "a",
                    "hashtags": ["#x"],
                    "format": "thread"
                },
                "linkedinStrategy": {
                    "angle": "a",
                    "valueProposition": "v",
                    "callToAction": "c",
                    "hashtags": ["#y"]
                }
            },
            "content": {
                "twitter": { "tweets": [{ "text": "t", "order": 1 }], "totalTweets": 1 },
                "linkedin": { "post": "p", "characterCount": 1 }
            },
            "metadata": {
                "generatedAt": "2026-01-01T00:00:00Z",
                "processingTime": 1200,
                "targetAudience": "engineers"
            }
        }))
        .unwrap();

        assert_eq!(submission.strategy.twitter_strategy.format, TweetFormat::Thread);
        assert_eq!(
            submission.strategy.analysis.complexity_level,
            ComplexityLevel::Intermediate
        );

        let round_tripped = serde_json::to_value(&submission).unwrap();
        assert_eq!(round_tripped["requestId"], "req-1");
        assert_eq!(round_tripped["strategy"]["twitterStrategy"]["format"], "thread");
        assert_eq!(round_tripped["content"]["twitter"]["totalTweets"], 1);
    }

    #[test]
    fn scheduling_preferences_default_both_platforms_on() {
        let prefs: SchedulingPreferences = serde_json::from_value(json!({})).unwrap();
        assert!(prefs.schedule_twitter);
        assert!(prefs.schedule_linkedin);
        assert_eq!(prefs.twitter_schedule_time, None);
        assert_eq!(prefs, SchedulingPreferences::default());
    }
}
