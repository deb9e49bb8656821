//! Durable request-scoped key-value state backing the approval hand-off.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Logical slots within a request's namespace.
pub mod slots {
    /// The full stored submission written by the review stage.
    pub const CONTENT: &str = "content-data";
    /// The human approval decision; present once the request was reviewed.
    pub const REVIEW: &str = "review";
}

#[derive(Clone)]
pub struct StateStore {
    db: Arc<Mutex<Connection>>,
}

impl StateStore {
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let db = Connection::open(db_path)?;
        Self::init_schema(&db)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS request_state (
                namespace TEXT NOT NULL,
                slot TEXT NOT NULL,
                value TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (namespace, slot)
            )",
            [],
        )?;
        Ok(())
    }

    /// Durably write `value` under `(namespace, slot)`, replacing any prior
    /// value. The write is acknowledged by SQLite before this returns.
    pub async fn set(&self, namespace: &str, slot: &str, value: &serde_json::Value) -> Result<()> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT OR REPLACE INTO request_state (namespace, slot, value) VALUES (?1, ?2, ?3)",
            params![namespace, slot, value.to_string()],
        )?;
        Ok(())
    }

    /// Read the value under `(namespace, slot)`; `None` if never written.
    pub async fn get(&self, namespace: &str, slot: &str) -> Result<Option<serde_json::Value>> {
        let db = self.db.lock().await;
        let raw: Option<String> = db
            .query_row(
                "SELECT value FROM request_state WHERE namespace = ?1 AND slot = ?2",
                params![namespace, slot],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get_round_trips_the_value() {
        let store = StateStore::open_in_memory().unwrap();
        let value = json!({ "title": "Example", "tweets": [1, 2, 3] });
        store.set("req-1", slots::CONTENT, &value).await.unwrap();

        let read = store.get("req-1", slots::CONTENT).await.unwrap();
        assert_eq!(read, Some(value));
    }

    #[tokio::test]
    async fn get_without_prior_set_returns_none() {
        let store = StateStore::open_in_memory().unwrap();
        let read = store.get("never-submitted", slots::CONTENT).await.unwrap();
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn set_overwrites_the_previous_value() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .set("req-1", slots::CONTENT, &json!({ "v": 1 }))
            .await
            .unwrap();
        store
            .set("req-1", slots::CONTENT, &json!({ "v": 2 }))
            .await
            .unwrap();

        let read = store.get("req-1", slots::CONTENT).await.unwrap();
        assert_eq!(read, Some(json!({ "v": 2 })));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .set("req-1", slots::CONTENT, &json!("one"))
            .await
            .unwrap();
        store
            .set("req-2", slots::CONTENT, &json!("two"))
            .await
            .unwrap();

        assert_eq!(
            store.get("req-1", slots::CONTENT).await.unwrap(),
            Some(json!("one"))
        );
        assert_eq!(
            store.get("req-2", slots::CONTENT).await.unwrap(),
            Some(json!("two"))
        );
        assert_eq!(store.get("req-1", slots::REVIEW).await.unwrap(), None);
    }

    #[tokio::test]
    async fn open_creates_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("state.db");
        let store = StateStore::open(&db_path).await.unwrap();
        store.set("req-1", slots::CONTENT, &json!(1)).await.unwrap();
        assert!(db_path.exists());
    }
}
