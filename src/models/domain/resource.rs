use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Topic;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Video,
    Article,
    Pdf,
    SearchFallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Resource {
    pub fn new(kind: ResourceKind, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            kind,
            thumbnail: None,
            channel: None,
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        if !snippet.is_empty() {
            self.snippet = Some(snippet);
        }
        self
    }
}

/// Aggregated answer of `GET /api/resources`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceBundle {
    pub videos: Vec<Resource>,
    pub articles: Vec<Resource>,
    pub pdfs: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
}

/// A resource a user bookmarked under one of their roadmap nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResource {
    pub id: String,
    pub user_id: String,
    pub roadmap_topic: Topic,
    pub node_label: String,
    pub resource_type: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
}

impl SavedResource {
    pub fn new(
        user_id: &str,
        roadmap_topic: Topic,
        node_label: &str,
        resource_type: &str,
        title: &str,
        url: &str,
        thumbnail: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            roadmap_topic,
            node_label: node_label.to_string(),
            resource_type: resource_type.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            thumbnail: thumbnail.unwrap_or_default().to_string(),
            created_at: Utc::now(),
        }
    }
}
