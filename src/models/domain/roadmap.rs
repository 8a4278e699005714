use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Topic;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapMode {
    #[default]
    Standard,
    Crash,
}

impl RoadmapMode {
    /// Unknown or missing values fall back to standard mode.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "crash" => RoadmapMode::Crash,
            _ => RoadmapMode::Standard,
        }
    }

    pub fn target_steps(&self) -> usize {
        match self {
            RoadmapMode::Standard => 7,
            RoadmapMode::Crash => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapStep {
    #[serde(deserialize_with = "string_or_number")]
    #[schemars(with = "String")]
    pub id: String,
    pub label: String,
}

/// Shape the model is asked to produce and the client stores as `graph_data`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapGraph {
    pub nodes: Vec<RoadmapStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Roadmap {
    pub topic: Topic,
    #[serde(rename = "nodes")]
    pub steps: Vec<RoadmapStep>,
}

impl Roadmap {
    pub fn new(topic: Topic, steps: Vec<RoadmapStep>) -> Self {
        Self { topic, steps }
    }

    /// One-node roadmap used whenever generation fails.
    pub fn fallback(topic: &Topic) -> Self {
        Self {
            topic: topic.clone(),
            steps: vec![RoadmapStep {
                id: "1".to_string(),
                label: format!("{} Basics", topic),
            }],
        }
    }

    pub fn from_graph(topic: Topic, graph: RoadmapGraph) -> Self {
        Self {
            topic,
            steps: graph.nodes,
        }
    }

    pub fn to_graph(&self) -> RoadmapGraph {
        RoadmapGraph {
            nodes: self.steps.clone(),
        }
    }
}

/// A persisted roadmap row. `user_id == None` marks the generated cache entry
/// for the topic; user rows are saved copies owned by that user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRoadmap {
    pub id: String,
    pub user_id: Option<String>,
    pub topic: Topic,
    pub graph_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StoredRoadmap {
    pub fn new(user_id: Option<String>, topic: Topic, graph_data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            topic,
            graph_data,
            created_at: Utc::now(),
        }
    }

    pub fn generated(roadmap: &Roadmap) -> Self {
        let graph = serde_json::to_value(roadmap.to_graph()).unwrap_or_default();
        Self::new(None, roadmap.topic.clone(), graph)
    }

    /// Reads the stored graph back as a roadmap; `None` when the stored shape
    /// has no usable `nodes` list.
    pub fn to_roadmap(&self) -> Option<Roadmap> {
        let graph: RoadmapGraph = serde_json::from_value(self.graph_data.clone()).ok()?;
        if graph.nodes.is_empty() {
            return None;
        }
        Some(Roadmap::from_graph(self.topic.clone(), graph))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_parse_defaults_to_standard() {
        assert_eq!(RoadmapMode::parse(None), RoadmapMode::Standard);
        assert_eq!(RoadmapMode::parse(Some("weird")), RoadmapMode::Standard);
        assert_eq!(RoadmapMode::parse(Some(" Crash ")), RoadmapMode::Crash);
        assert_eq!(RoadmapMode::Crash.target_steps(), 4);
        assert_eq!(RoadmapMode::Standard.target_steps(), 7);
    }

    #[test]
    fn fallback_has_single_basics_step() {
        let roadmap = Roadmap::fallback(&Topic::normalize("quantum computing"));
        assert_eq!(roadmap.steps.len(), 1);
        assert_eq!(roadmap.steps[0].label, "Quantum Computing Basics");
    }

    #[test]
    fn roadmap_serializes_steps_as_nodes() {
        let roadmap = Roadmap::fallback(&Topic::normalize("sql"));
        let value = serde_json::to_value(&roadmap).unwrap();
        assert_eq!(value["topic"], "Sql");
        assert_eq!(value["nodes"][0]["label"], "Sql Basics");
    }

    #[test]
    fn numeric_step_ids_are_accepted() {
        let graph: RoadmapGraph =
            serde_json::from_value(json!({"nodes": [{"id": 1, "label": "Intro"}]})).unwrap();
        assert_eq!(graph.nodes[0].id, "1");
    }

    #[test]
    fn stored_roadmap_without_nodes_is_unusable() {
        let stored = StoredRoadmap::new(None, Topic::normalize("x"), json!({"edges": []}));
        assert!(stored.to_roadmap().is_none());

        let stored = StoredRoadmap::new(
            Some("u1".into()),
            Topic::normalize("x"),
            json!({"nodes": [{"id": "1", "label": "A"}], "layout": "vertical"}),
        );
        assert_eq!(stored.to_roadmap().unwrap().steps[0].label, "A");
    }
}
