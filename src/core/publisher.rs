use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DRAFTS_URL: &str = "https://api.typefully.com/v1/drafts/";

/// Confirmation returned by the publishing service for a scheduled draft.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftReceipt {
    #[serde(default)]
    pub id: Option<i64>,
}

/// External service that holds scheduled-but-unpublished posts.
#[async_trait]
pub trait DraftPublisher: Send + Sync {
    async fn schedule_draft(
        &self,
        content: &str,
        schedule_date: DateTime<Utc>,
    ) -> Result<DraftReceipt>;
}

#[derive(Serialize)]
struct DraftRequest<'a> {
    content: &'a str,
    schedule_date: String,
    auto_retweet_enabled: bool,
}

pub struct TypefullyPublisher {
    api_key: String,
    client: Client,
}

impl TypefullyPublisher {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DraftPublisher for TypefullyPublisher {
    async fn schedule_draft(
        &self,
        content: &str,
        schedule_date: DateTime<Utc>,
    ) -> Result<DraftReceipt> {
        let req = DraftRequest {
            content,
            schedule_date: schedule_date.to_rfc3339(),
            auto_retweet_enabled: false,
        };
        let res = self
            .client
            .post(DRAFTS_URL)
            .header("X-API-KEY", format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "Typefully API Error: {}",
                res.text().await.unwrap_or_default()
            ));
        }
        Ok(res.json().await?)
    }
}
