//! Process-local repositories used with `STORAGE_BACKEND=memory` and in tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{LeaderboardEntry, ProgressRecord, SavedResource, StoredRoadmap, Topic},
    repositories::{
        leaderboard_repository::DEFAULT_FULL_NAME, LeaderboardRepository, ProgressRepository,
        RoadmapRepository, SavedResourceRepository,
    },
};

#[derive(Default)]
pub struct InMemoryRoadmapRepository {
    roadmaps: Arc<RwLock<HashMap<(Option<String>, Topic), StoredRoadmap>>>,
}

impl InMemoryRoadmapRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoadmapRepository for InMemoryRoadmapRepository {
    async fn find_by_topic(&self, topic: &Topic) -> AppResult<Option<StoredRoadmap>> {
        let roadmaps = self.roadmaps.read().await;
        if let Some(generated) = roadmaps.get(&(None, topic.clone())) {
            return Ok(Some(generated.clone()));
        }
        Ok(roadmaps.values().find(|r| &r.topic == topic).cloned())
    }

    async fn find_by_user_and_topic(
        &self,
        user_id: &str,
        topic: &Topic,
    ) -> AppResult<Option<StoredRoadmap>> {
        let roadmaps = self.roadmaps.read().await;
        Ok(roadmaps
            .get(&(Some(user_id.to_string()), topic.clone()))
            .cloned())
    }

    async fn upsert(&self, roadmap: StoredRoadmap) -> AppResult<StoredRoadmap> {
        let mut roadmaps = self.roadmaps.write().await;
        roadmaps.insert(
            (roadmap.user_id.clone(), roadmap.topic.clone()),
            roadmap.clone(),
        );
        Ok(roadmap)
    }

    async fn delete_by_user_and_topic(&self, user_id: &str, topic: &Topic) -> AppResult<bool> {
        let mut roadmaps = self.roadmaps.write().await;
        Ok(roadmaps
            .remove(&(Some(user_id.to_string()), topic.clone()))
            .is_some())
    }

    async fn delete_by_topic(&self, topic: &Topic) -> AppResult<u64> {
        let mut roadmaps = self.roadmaps.write().await;
        let before = roadmaps.len();
        roadmaps.retain(|(_, t), _| t != topic);
        Ok((before - roadmaps.len()) as u64)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<StoredRoadmap>> {
        let roadmaps = self.roadmaps.read().await;
        let mut items: Vec<_> = roadmaps
            .values()
            .filter(|r| r.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<StoredRoadmap>> {
        let roadmaps = self.roadmaps.read().await;
        let mut items: Vec<_> = roadmaps.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.roadmaps.read().await.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemorySavedResourceRepository {
    resources: Arc<RwLock<Vec<SavedResource>>>,
}

impl InMemorySavedResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedResourceRepository for InMemorySavedResourceRepository {
    async fn create(&self, resource: SavedResource) -> AppResult<SavedResource> {
        let mut resources = self.resources.write().await;
        if resources.iter().any(|r| r.id == resource.id) {
            return Err(AppError::DatabaseError(format!(
                "Saved resource with id '{}' already exists",
                resource.id
            )));
        }
        resources.push(resource.clone());
        Ok(resource)
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let mut resources = self.resources.write().await;
        let before = resources.len();
        resources.retain(|r| r.id != id);
        Ok(resources.len() < before)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SavedResource>> {
        let resources = self.resources.read().await;
        let mut items: Vec<_> = resources
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_by_topics(&self, topics: &[Topic]) -> AppResult<Vec<SavedResource>> {
        let resources = self.resources.read().await;
        Ok(resources
            .iter()
            .filter(|r| topics.contains(&r.roadmap_topic))
            .cloned()
            .collect())
    }

    async fn list_by_users(&self, user_ids: &[String]) -> AppResult<Vec<SavedResource>> {
        let resources = self.resources.read().await;
        Ok(resources
            .iter()
            .filter(|r| user_ids.contains(&r.user_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryProgressRepository {
    records: Arc<RwLock<Vec<ProgressRecord>>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn create(&self, record: ProgressRecord) -> AppResult<ProgressRecord> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_recent_feedback(&self, limit: i64) -> AppResult<Vec<ProgressRecord>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .iter()
            .filter(|r| !r.feedback_text.trim().is_empty())
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn sentiment_scores(&self, topic: Option<&Topic>) -> AppResult<Vec<f64>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| topic.map_or(true, |t| &r.topic == t))
            .map(|r| r.sentiment_score)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryLeaderboardRepository {
    entries: Arc<RwLock<HashMap<String, LeaderboardEntry>>>,
}

impl InMemoryLeaderboardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryLeaderboardRepository {
    async fn add_score(
        &self,
        user_id: &str,
        full_name: Option<&str>,
        delta: i64,
    ) -> AppResult<LeaderboardEntry> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(user_id.to_string())
            .or_insert_with(|| LeaderboardEntry {
                user_id: user_id.to_string(),
                full_name: DEFAULT_FULL_NAME.to_string(),
                score: 0,
                updated_at: None,
            });

        entry.score += delta;
        if let Some(name) = full_name {
            entry.full_name = name.to_string();
        }
        entry.updated_at = Some(Utc::now());

        Ok(entry.clone())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<LeaderboardEntry>> {
        Ok(self.entries.read().await.get(user_id).cloned())
    }

    async fn top(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let entries = self.entries.read().await;
        let mut items: Vec<_> = entries.values().cloned().collect();
        items.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.user_id.cmp(&b.user_id)));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.entries.read().await.len() as u64)
    }
}
