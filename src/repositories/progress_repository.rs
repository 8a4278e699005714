use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{ProgressRecord, Topic},
};

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn create(&self, record: ProgressRecord) -> AppResult<ProgressRecord>;
    /// Most recent records that carry non-empty feedback.
    async fn list_recent_feedback(&self, limit: i64) -> AppResult<Vec<ProgressRecord>>;
    /// Raw sentiment column, optionally restricted to one topic.
    async fn sentiment_scores(&self, topic: Option<&Topic>) -> AppResult<Vec<f64>>;
}

pub struct MongoProgressRepository {
    collection: Collection<ProgressRecord>,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("node_progress");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for node_progress collection");

        let user_topic_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "topic": 1 })
            .options(IndexOptions::builder().name("user_topic".to_string()).build())
            .build();

        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder().name("created_at".to_string()).build())
            .build();

        self.collection.create_index(user_topic_index).await?;
        self.collection.create_index(created_index).await?;

        log::info!("Successfully created indexes for node_progress collection");
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn create(&self, record: ProgressRecord) -> AppResult<ProgressRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn list_recent_feedback(&self, limit: i64) -> AppResult<Vec<ProgressRecord>> {
        let records = self
            .collection
            .find(doc! { "feedback_text": { "$nin": ["", null] } })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn sentiment_scores(&self, topic: Option<&Topic>) -> AppResult<Vec<f64>> {
        let filter = match topic {
            Some(topic) => doc! { "topic": topic.as_str() },
            None => doc! {},
        };

        let rows: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(filter)
            .projection(doc! { "sentiment_score": 1, "_id": 0 })
            .await?
            .try_collect()
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get_f64("sentiment_score").ok())
            .collect())
    }
}
