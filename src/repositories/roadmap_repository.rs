use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{StoredRoadmap, Topic},
};

#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    /// Any stored roadmap for the topic, preferring the generated cache row.
    async fn find_by_topic(&self, topic: &Topic) -> AppResult<Option<StoredRoadmap>>;
    async fn find_by_user_and_topic(
        &self,
        user_id: &str,
        topic: &Topic,
    ) -> AppResult<Option<StoredRoadmap>>;
    /// Insert-or-replace keyed by `(user_id, topic)`.
    async fn upsert(&self, roadmap: StoredRoadmap) -> AppResult<StoredRoadmap>;
    async fn delete_by_user_and_topic(&self, user_id: &str, topic: &Topic) -> AppResult<bool>;
    async fn delete_by_topic(&self, topic: &Topic) -> AppResult<u64>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<StoredRoadmap>>;
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<StoredRoadmap>>;
    async fn count(&self) -> AppResult<u64>;
}

pub struct MongoRoadmapRepository {
    collection: Collection<StoredRoadmap>,
}

impl MongoRoadmapRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("user_roadmaps");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for user_roadmaps collection");

        let user_topic_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "topic": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_topic_unique".to_string())
                    .build(),
            )
            .build();

        let topic_index = IndexModel::builder()
            .keys(doc! { "topic": 1 })
            .options(IndexOptions::builder().name("topic".to_string()).build())
            .build();

        self.collection.create_index(user_topic_index).await?;
        self.collection.create_index(topic_index).await?;

        log::info!("Successfully created indexes for user_roadmaps collection");
        Ok(())
    }
}

#[async_trait]
impl RoadmapRepository for MongoRoadmapRepository {
    async fn find_by_topic(&self, topic: &Topic) -> AppResult<Option<StoredRoadmap>> {
        // null user_id sorts first, so the generated row wins when present
        let roadmap = self
            .collection
            .find_one(doc! { "topic": topic.as_str() })
            .sort(doc! { "user_id": 1 })
            .await?;
        Ok(roadmap)
    }

    async fn find_by_user_and_topic(
        &self,
        user_id: &str,
        topic: &Topic,
    ) -> AppResult<Option<StoredRoadmap>> {
        let roadmap = self
            .collection
            .find_one(doc! { "user_id": user_id, "topic": topic.as_str() })
            .await?;
        Ok(roadmap)
    }

    async fn upsert(&self, roadmap: StoredRoadmap) -> AppResult<StoredRoadmap> {
        let filter = doc! {
            "user_id": roadmap.user_id.clone(),
            "topic": roadmap.topic.as_str(),
        };
        self.collection
            .replace_one(filter, &roadmap)
            .upsert(true)
            .await?;
        Ok(roadmap)
    }

    async fn delete_by_user_and_topic(&self, user_id: &str, topic: &Topic) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "user_id": user_id, "topic": topic.as_str() })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_by_topic(&self, topic: &Topic) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "topic": topic.as_str() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<StoredRoadmap>> {
        let roadmaps = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(roadmaps)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<StoredRoadmap>> {
        let roadmaps = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(roadmaps)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
