use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadmapQuery {
    #[serde(default)]
    pub topic: String,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizQuery {
    #[serde(default)]
    pub main_topic: String,
    #[serde(default)]
    pub sub_topic: String,
    pub num: Option<usize>,
    /// Comma-separated list of previously studied topics.
    pub history: Option<String>,
}

impl QuizQuery {
    pub fn prior_topics(&self) -> Vec<String> {
        self.history
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcesQuery {
    #[serde(default)]
    pub topic: String,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteRoadmapQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "topic is required"))]
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteResourceQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminTopicQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "topic is required"))]
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveRoadmapRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "topic is required"))]
    pub topic: String,
    #[serde(default)]
    pub graph_data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveResourceRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[serde(default)]
    pub roadmap_topic: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    #[validate(url(message = "url must be an absolute URL"))]
    pub url: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitProgressRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "score must not be negative"))]
    pub score: i64,
    #[serde(default)]
    pub feedback: String,
    pub username: Option<String>,
}

/// Progress captured while the learner was not signed in. `user_id` is filled
/// in from the sync request.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestProgress {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestRoadmap {
    #[serde(default)]
    pub topic: String,
    #[serde(default, alias = "graph")]
    pub graph_data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestResource {
    #[serde(default)]
    pub roadmap_topic: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestData {
    pub roadmap: Option<GuestRoadmap>,
    #[serde(default)]
    pub progress: Vec<GuestProgress>,
    #[serde(default)]
    pub resources: Vec<GuestResource>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SyncGuestDataRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[serde(default)]
    pub guest_data: GuestData,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatNodeRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
