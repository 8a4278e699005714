use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Topic;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: String,
    pub user_id: String,
    pub topic: Topic,
    pub node_label: String,
    pub quiz_score: i64,
    pub feedback_text: String,
    /// Polarity in [-1, 1], computed once when the record is written.
    pub sentiment_score: f64,
    pub created_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(
        user_id: &str,
        topic: Topic,
        node_label: &str,
        quiz_score: i64,
        feedback_text: &str,
        sentiment_score: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            topic,
            node_label: node_label.to_string(),
            quiz_score,
            feedback_text: feedback_text.to_string(),
            sentiment_score: sentiment_score.clamp(-1.0, 1.0),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub full_name: String,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
