use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::fakes::{FakePublisher, FakeScraper, RecordingStage, RoutedModel};
use crate::core::pipeline::events::{
    PipelineEvent, ScrapeArticleEvent, SchedulingPreferences, StoredSubmission, TweetFormat,
    topics,
};
use crate::core::pipeline::stages::{
    AnalyzeStage, GenerateStage, ReviewStage, ScheduleStage, ScrapeStage,
};
use crate::core::pipeline::{PipelineOrchestrator, build};
use crate::core::store::{StateStore, slots};

const ARTICLE_URL: &str = "https://example.com/article";

fn scrape_event(request_id: &str) -> PipelineEvent {
    PipelineEvent::ScrapeArticle(ScrapeArticleEvent {
        request_id: request_id.to_string(),
        url: ARTICLE_URL.to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

async fn wait_for_submission(store: &StateStore, request_id: &str) -> Option<serde_json::Value> {
    for _ in 0..200 {
        if let Ok(Some(value)) = store.get(request_id, slots::CONTENT).await {
            return Some(value);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test]
async fn a_submitted_url_runs_the_full_generation_chain() {
    let store = StateStore::open_in_memory().unwrap();
    let scraper = FakeScraper::returning(Some("Example"), "article body about pipelines");
    let model = RoutedModel::with_samples();
    let publisher = FakePublisher::succeeding();

    let orchestrator = build(
        scraper.clone(),
        model.clone(),
        publisher.clone(),
        store.clone(),
    );
    let bus = orchestrator.bus();
    orchestrator.spawn();

    bus.publish(topics::SCRAPE_ARTICLE, scrape_event("req-1"))
        .unwrap();

    let stored = wait_for_submission(&store, "req-1")
        .await
        .expect("submission stored");
    let submission: StoredSubmission = serde_json::from_value(stored).unwrap();

    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
    // One strategy call plus two generation calls.
    assert_eq!(model.calls.load(Ordering::SeqCst), 3);

    assert_eq!(submission.request_id, "req-1");
    assert_eq!(submission.url, ARTICLE_URL);
    assert_eq!(submission.title, "Example");
    assert_eq!(submission.strategy.twitter_strategy.format, TweetFormat::Thread);
    assert_eq!(submission.content.twitter.tweets.len(), 3);
    assert_eq!(submission.content.twitter.total_tweets, 3);
    assert!(!submission.content.linkedin.post.is_empty());
    assert_eq!(submission.metadata.target_audience, "backend engineers");
    assert!(submission.metadata.processing_time >= 0);

    // Nothing is scheduled until a human approves.
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn a_missing_scraped_title_falls_back_to_a_default() {
    let store = StateStore::open_in_memory().unwrap();
    let scraper = FakeScraper::returning(None, "body");
    let orchestrator = build(
        scraper,
        RoutedModel::with_samples(),
        FakePublisher::succeeding(),
        store.clone(),
    );
    let bus = orchestrator.bus();
    orchestrator.spawn();

    bus.publish(topics::SCRAPE_ARTICLE, scrape_event("req-1"))
        .unwrap();

    let stored = wait_for_submission(&store, "req-1")
        .await
        .expect("submission stored");
    assert_eq!(stored["title"], "Untitled Article");
}

#[tokio::test]
async fn a_scrape_failure_stops_the_chain_before_the_model() {
    let store = StateStore::open_in_memory().unwrap();
    let scraper = FakeScraper::failing();
    let model = RoutedModel::with_samples();
    let orchestrator = build(
        scraper.clone(),
        model.clone(),
        FakePublisher::succeeding(),
        store.clone(),
    );
    let bus = orchestrator.bus();
    orchestrator.spawn();

    bus.publish(topics::SCRAPE_ARTICLE, scrape_event("req-1"))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.get("req-1", slots::CONTENT).await.unwrap(), None);
}

#[tokio::test]
async fn malformed_strategy_json_aborts_before_generation() {
    let store = StateStore::open_in_memory().unwrap();
    let model = RoutedModel::with_strategy("this is not json");
    let orchestrator = build(
        FakeScraper::returning(Some("Example"), "body"),
        model.clone(),
        FakePublisher::succeeding(),
        store.clone(),
    );
    let bus = orchestrator.bus();
    orchestrator.spawn();

    bus.publish(topics::SCRAPE_ARTICLE, scrape_event("req-1"))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Only the strategy call happened; no generation, nothing stored.
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.get("req-1", slots::CONTENT).await.unwrap(), None);
}

#[tokio::test]
async fn approval_schedules_both_platforms_and_reaches_the_terminal_event() {
    let store = StateStore::open_in_memory().unwrap();
    let scraper = FakeScraper::returning(Some("Example"), "article body");
    let model = RoutedModel::with_samples();
    let publisher = FakePublisher::succeeding();

    let mut orchestrator = PipelineOrchestrator::new();
    orchestrator.subscribe(Arc::new(ScrapeStage::new(scraper)));
    orchestrator.subscribe(Arc::new(AnalyzeStage::new(model.clone())));
    orchestrator.subscribe(Arc::new(GenerateStage::new(model)));
    orchestrator.subscribe(Arc::new(ReviewStage::new(store.clone())));
    orchestrator.subscribe(Arc::new(ScheduleStage::new(publisher.clone())));
    let (recorder, mut complete_rx) = RecordingStage::new(topics::CONTENT_COMPLETE);
    orchestrator.subscribe(recorder);
    let bus = orchestrator.bus();
    orchestrator.spawn();

    bus.publish(topics::SCRAPE_ARTICLE, scrape_event("req-1"))
        .unwrap();
    let stored = wait_for_submission(&store, "req-1")
        .await
        .expect("submission stored");
    let submission: StoredSubmission = serde_json::from_value(stored.clone()).unwrap();

    // The bundle read back by the approval boundary is exactly what the
    // review stage wrote.
    assert_eq!(serde_json::to_value(&submission).unwrap(), stored);

    let before = chrono::Utc::now();
    bus.publish(
        topics::SCHEDULE_POSTS,
        PipelineEvent::SchedulePosts(crate::core::pipeline::events::SchedulePostsEvent {
            request_id: submission.request_id.clone(),
            url: submission.url,
            title: submission.title,
            strategy: submission.strategy,
            content: submission.content,
            metadata: submission.metadata,
            scheduling_preferences: SchedulingPreferences::default(),
        }),
    )
    .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(2), complete_rx.recv())
        .await
        .expect("terminal event")
        .expect("channel open");
    let PipelineEvent::ContentComplete(done) = event else {
        panic!("expected a content-complete event");
    };

    assert!(done.twitter.scheduled);
    assert!(done.linkedin.scheduled);
    assert!(chrono::DateTime::parse_from_rfc3339(&done.scheduled_at).is_ok());

    let drafts = publisher.drafts.lock().unwrap();
    assert_eq!(drafts.len(), 2);

    // The three tweets are joined into a single draft.
    let (twitter_content, twitter_time) = &drafts[0];
    assert_eq!(twitter_content.matches("\n\n\n\n").count(), 2);
    assert!(twitter_content.starts_with("1/"));

    // Default times: twitter now+1h, linkedin now+2h (small tolerance).
    let (_, linkedin_time) = &drafts[1];
    let hour = chrono::Duration::hours(1);
    let tolerance = chrono::Duration::seconds(60);
    assert!((*twitter_time - (before + hour)).abs() < tolerance);
    assert!((*linkedin_time - (before + hour * 2)).abs() < tolerance);
}
