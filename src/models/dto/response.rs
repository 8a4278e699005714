use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{ProgressRecord, StoredRoadmap, Topic};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AdminStats {
    pub users: u64,
    pub roadmaps: u64,
    /// Mean feedback sentiment mapped onto 0..=100.
    pub satisfaction: u8,
}

/// Listing row for saved and generated roadmaps; omits the graph itself.
#[derive(Debug, Serialize)]
pub struct RoadmapSummary {
    pub id: String,
    pub user_id: Option<String>,
    pub topic: Topic,
    pub created_at: DateTime<Utc>,
}

impl From<StoredRoadmap> for RoadmapSummary {
    fn from(roadmap: StoredRoadmap) -> Self {
        Self {
            id: roadmap.id,
            user_id: roadmap.user_id,
            topic: roadmap.topic,
            created_at: roadmap.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackEntry {
    pub user_id: String,
    pub topic: Topic,
    pub node_label: String,
    pub feedback_text: String,
    pub sentiment_score: f64,
    pub created_at: DateTime<Utc>,
}

impl From<ProgressRecord> for FeedbackEntry {
    fn from(record: ProgressRecord) -> Self {
        Self {
            user_id: record.user_id,
            topic: record.topic,
            node_label: record.node_label,
            feedback_text: record.feedback_text,
            sentiment_score: record.sentiment_score,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct SyncSummary {
    pub message: String,
    pub roadmaps: usize,
    pub progress: usize,
    pub resources: usize,
}

/// A resource other learners on the same topics saved.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub url: String,
    pub resource_type: String,
    pub thumbnail: String,
    pub roadmap_topic: String,
    /// Number of peers who saved this URL; 0 for the starter list.
    pub popularity: usize,
}
