use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{SavedResource, Topic},
};

#[async_trait]
pub trait SavedResourceRepository: Send + Sync {
    async fn create(&self, resource: SavedResource) -> AppResult<SavedResource>;
    async fn delete_by_id(&self, id: &str) -> AppResult<bool>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SavedResource>>;
    async fn list_by_topics(&self, topics: &[Topic]) -> AppResult<Vec<SavedResource>>;
    async fn list_by_users(&self, user_ids: &[String]) -> AppResult<Vec<SavedResource>>;
}

pub struct MongoSavedResourceRepository {
    collection: Collection<SavedResource>,
}

impl MongoSavedResourceRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("saved_resources");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for saved_resources collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        let topic_index = IndexModel::builder()
            .keys(doc! { "roadmap_topic": 1 })
            .options(
                IndexOptions::builder()
                    .name("roadmap_topic".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_index).await?;
        self.collection.create_index(topic_index).await?;

        log::info!("Successfully created indexes for saved_resources collection");
        Ok(())
    }
}

#[async_trait]
impl SavedResourceRepository for MongoSavedResourceRepository {
    async fn create(&self, resource: SavedResource) -> AppResult<SavedResource> {
        self.collection.insert_one(&resource).await?;
        Ok(resource)
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SavedResource>> {
        let resources = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(resources)
    }

    async fn list_by_topics(&self, topics: &[Topic]) -> AppResult<Vec<SavedResource>> {
        let topics: Vec<&str> = topics.iter().map(Topic::as_str).collect();
        let resources = self
            .collection
            .find(doc! { "roadmap_topic": { "$in": topics } })
            .await?
            .try_collect()
            .await?;
        Ok(resources)
    }

    async fn list_by_users(&self, user_ids: &[String]) -> AppResult<Vec<SavedResource>> {
        let resources = self
            .collection
            .find(doc! { "user_id": { "$in": user_ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(resources)
    }
}
