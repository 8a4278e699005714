use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ProgressRecord, SavedResource, StoredRoadmap, Topic},
        dto::{
            request::{SaveResourceRequest, SaveRoadmapRequest, SyncGuestDataRequest},
            response::{Recommendation, SyncSummary},
        },
    },
    repositories::{
        LeaderboardRepository, ProgressRepository, RoadmapRepository, SavedResourceRepository,
    },
    services::sentiment,
};

pub const MAX_RECOMMENDATIONS: usize = 6;

/// Shown to learners who have not saved anything yet.
const STARTER_RESOURCES: &[(&str, &str, &str, &str)] = &[
    (
        "freeCodeCamp Curriculum",
        "https://www.freecodecamp.org/learn/",
        "article",
        "Programming",
    ),
    (
        "MDN Learn Web Development",
        "https://developer.mozilla.org/en-US/docs/Learn",
        "article",
        "Web Development",
    ),
    (
        "CS50: Introduction to Computer Science",
        "https://cs50.harvard.edu/x/",
        "article",
        "Computer Science",
    ),
    (
        "The Rust Programming Language",
        "https://doc.rust-lang.org/book/",
        "article",
        "Rust",
    ),
    (
        "Khan Academy Computing",
        "https://www.khanacademy.org/computing",
        "video",
        "Computer Science",
    ),
    (
        "GeeksforGeeks Data Structures",
        "https://www.geeksforgeeks.org/data-structures/",
        "article",
        "Data Structures",
    ),
];

/// A learner's saved roadmaps and bookmarks, plus the recommendations and
/// guest-migration flows built on them.
pub struct LibraryService {
    roadmaps: Arc<dyn RoadmapRepository>,
    resources: Arc<dyn SavedResourceRepository>,
    progress: Arc<dyn ProgressRepository>,
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl LibraryService {
    pub fn new(
        roadmaps: Arc<dyn RoadmapRepository>,
        resources: Arc<dyn SavedResourceRepository>,
        progress: Arc<dyn ProgressRepository>,
        leaderboard: Arc<dyn LeaderboardRepository>,
    ) -> Self {
        Self {
            roadmaps,
            resources,
            progress,
            leaderboard,
        }
    }

    /// Saving the same topic twice replaces the user's earlier copy.
    pub async fn save_roadmap(&self, request: SaveRoadmapRequest) -> AppResult<StoredRoadmap> {
        request.validate()?;
        let topic = Topic::normalize(&request.topic);
        if topic.is_empty() {
            return Err(AppError::ValidationError("topic is required".to_string()));
        }

        let stored = StoredRoadmap::new(Some(request.user_id), topic, request.graph_data);
        self.roadmaps.upsert(stored).await
    }

    pub async fn save_resource(&self, request: SaveResourceRequest) -> AppResult<SavedResource> {
        request.validate()?;
        let resource = SavedResource::new(
            &request.user_id,
            Topic::normalize(&request.roadmap_topic),
            &request.node_label,
            &request.resource_type,
            &request.title,
            &request.url,
            request.thumbnail.as_deref(),
        );
        self.resources.create(resource).await
    }

    pub async fn delete_roadmap(&self, user_id: &str, topic: &str) -> AppResult<()> {
        let topic = Topic::normalize(topic);
        if !self.roadmaps.delete_by_user_and_topic(user_id, &topic).await? {
            return Err(AppError::NotFound(format!(
                "No saved roadmap for '{}'",
                topic
            )));
        }
        Ok(())
    }

    pub async fn delete_resource(&self, id: &str) -> AppResult<()> {
        if !self.resources.delete_by_id(id).await? {
            return Err(AppError::NotFound(format!("Saved resource '{}' not found", id)));
        }
        Ok(())
    }

    pub async fn list_roadmaps(&self, user_id: &str) -> AppResult<Vec<StoredRoadmap>> {
        self.roadmaps.list_by_user(user_id).await
    }

    pub async fn list_saved_resources(&self, user_id: &str) -> AppResult<Vec<SavedResource>> {
        self.resources.list_by_user(user_id).await
    }

    /// Resources saved by peers who share at least one roadmap topic with the
    /// caller, most co-saved first, never one the caller already has.
    pub async fn recommendations(&self, user_id: &str) -> AppResult<Vec<Recommendation>> {
        let mine = self.resources.list_by_user(user_id).await?;
        if mine.is_empty() {
            return Ok(starter_recommendations());
        }

        let my_urls: HashSet<&str> = mine.iter().map(|r| r.url.as_str()).collect();
        let mut topics: Vec<Topic> = Vec::new();
        for resource in &mine {
            if !topics.contains(&resource.roadmap_topic) {
                topics.push(resource.roadmap_topic.clone());
            }
        }

        let mut peers: Vec<String> = Vec::new();
        for resource in self.resources.list_by_topics(&topics).await? {
            if resource.user_id != user_id && !peers.contains(&resource.user_id) {
                peers.push(resource.user_id);
            }
        }
        if peers.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.resources.list_by_users(&peers).await?;
        Ok(rank_candidates(candidates, &my_urls))
    }

    /// Moves data collected in a guest session onto the signed-in account.
    pub async fn sync_guest_data(&self, request: SyncGuestDataRequest) -> AppResult<SyncSummary> {
        request.validate()?;
        let user_id = request.user_id;
        let guest = request.guest_data;
        let mut summary = SyncSummary::default();

        if let Some(roadmap) = guest.roadmap {
            let topic = Topic::normalize(&roadmap.topic);
            if !topic.is_empty() && !roadmap.graph_data.is_null() {
                self.roadmaps
                    .upsert(StoredRoadmap::new(Some(user_id.clone()), topic, roadmap.graph_data))
                    .await?;
                summary.roadmaps += 1;
            }
        }

        for item in guest.progress {
            let record = ProgressRecord::new(
                &user_id,
                Topic::normalize(&item.topic),
                &item.node_label,
                item.score.max(0),
                &item.feedback,
                sentiment::polarity(&item.feedback),
            );
            self.progress.create(record).await?;
            self.leaderboard
                .add_score(&user_id, None, item.score.max(0))
                .await?;
            summary.progress += 1;
        }

        let mut saved_urls: HashSet<String> = self
            .resources
            .list_by_user(&user_id)
            .await?
            .into_iter()
            .map(|r| r.url)
            .collect();
        for item in guest.resources {
            if item.url.trim().is_empty() || !saved_urls.insert(item.url.clone()) {
                continue;
            }
            let resource = SavedResource::new(
                &user_id,
                Topic::normalize(&item.roadmap_topic),
                &item.node_label,
                &item.resource_type,
                &item.title,
                &item.url,
                item.thumbnail.as_deref(),
            );
            self.resources.create(resource).await?;
            summary.resources += 1;
        }

        log::info!(
            "synced guest data for '{}': {} roadmap(s), {} progress record(s), {} resource(s)",
            user_id,
            summary.roadmaps,
            summary.progress,
            summary.resources
        );
        summary.message = "Guest data synced".to_string();
        Ok(summary)
    }
}

fn rank_candidates(candidates: Vec<SavedResource>, exclude: &HashSet<&str>) -> Vec<Recommendation> {
    let mut by_url: HashMap<String, Recommendation> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for resource in candidates {
        if exclude.contains(resource.url.as_str()) {
            continue;
        }
        match by_url.get_mut(&resource.url) {
            Some(existing) => existing.popularity += 1,
            None => {
                order.push(resource.url.clone());
                by_url.insert(
                    resource.url.clone(),
                    Recommendation {
                        title: resource.title,
                        url: resource.url,
                        resource_type: resource.resource_type,
                        thumbnail: resource.thumbnail,
                        roadmap_topic: resource.roadmap_topic.into_inner(),
                        popularity: 1,
                    },
                );
            }
        }
    }

    let mut ranked: Vec<Recommendation> = order
        .into_iter()
        .filter_map(|url| by_url.remove(&url))
        .collect();
    // Stable sort keeps first-seen order among ties.
    ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    ranked.truncate(MAX_RECOMMENDATIONS);
    ranked
}

fn starter_recommendations() -> Vec<Recommendation> {
    STARTER_RESOURCES
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(title, url, kind, topic)| Recommendation {
            title: title.to_string(),
            url: url.to_string(),
            resource_type: kind.to_string(),
            thumbnail: String::new(),
            roadmap_topic: topic.to_string(),
            popularity: 0,
        })
        .collect()
}
