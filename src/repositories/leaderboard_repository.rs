use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::LeaderboardEntry,
};

pub const DEFAULT_FULL_NAME: &str = "Anonymous Learner";

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Adds `delta` to the user's stored total, creating the entry when absent.
    /// A provided `full_name` replaces the stored display name.
    async fn add_score(
        &self,
        user_id: &str,
        full_name: Option<&str>,
        delta: i64,
    ) -> AppResult<LeaderboardEntry>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<LeaderboardEntry>>;
    async fn top(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>>;
    async fn count(&self) -> AppResult<u64>;
}

pub struct MongoLeaderboardRepository {
    collection: Collection<LeaderboardEntry>,
}

impl MongoLeaderboardRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("leaderboard");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for leaderboard collection");

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            )
            .build();

        let score_index = IndexModel::builder()
            .keys(doc! { "score": -1 })
            .options(IndexOptions::builder().name("score_desc".to_string()).build())
            .build();

        self.collection.create_index(user_index).await?;
        self.collection.create_index(score_index).await?;

        log::info!("Successfully created indexes for leaderboard collection");
        Ok(())
    }
}

#[async_trait]
impl LeaderboardRepository for MongoLeaderboardRepository {
    async fn add_score(
        &self,
        user_id: &str,
        full_name: Option<&str>,
        delta: i64,
    ) -> AppResult<LeaderboardEntry> {
        let now = Utc::now().to_rfc3339();
        let update = match full_name {
            Some(name) => doc! {
                "$inc": { "score": delta },
                "$set": { "full_name": name, "updated_at": now },
            },
            None => doc! {
                "$inc": { "score": delta },
                "$set": { "updated_at": now },
                "$setOnInsert": { "full_name": DEFAULT_FULL_NAME },
            },
        };

        self.collection
            .update_one(doc! { "user_id": user_id }, update)
            .upsert(true)
            .await?;

        self.find_by_user(user_id).await?.ok_or_else(|| {
            AppError::DatabaseError(format!("leaderboard entry for '{}' vanished", user_id))
        })
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<LeaderboardEntry>> {
        let entry = self
            .collection
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(entry)
    }

    async fn top(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let entries = self
            .collection
            .find(doc! {})
            .sort(doc! { "score": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(entries)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
