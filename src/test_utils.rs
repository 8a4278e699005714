use serde_json::json;

use crate::models::domain::{ProgressRecord, StoredRoadmap, Topic};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// A stored roadmap with one step per label.
    pub fn stored_roadmap(owner: Option<&str>, topic: &str, labels: &[&str]) -> StoredRoadmap {
        let nodes: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| json!({"id": (i + 1).to_string(), "label": label}))
            .collect();
        StoredRoadmap::new(
            owner.map(str::to_string),
            Topic::normalize(topic),
            json!({ "nodes": nodes }),
        )
    }

    /// A progress record on node "Intro" with the given feedback and score.
    pub fn progress(user_id: &str, topic: &str, feedback: &str, sentiment: f64) -> ProgressRecord {
        ProgressRecord::new(user_id, Topic::normalize(topic), "Intro", 5, feedback, sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_stored_roadmap() {
        let stored = stored_roadmap(Some("u1"), "rust", &["Syntax", "Ownership"]);
        assert_eq!(stored.user_id.as_deref(), Some("u1"));

        let roadmap = stored.to_roadmap().unwrap();
        assert_eq!(roadmap.steps.len(), 2);
        assert_eq!(roadmap.steps[1].id, "2");
    }

    #[test]
    fn test_fixtures_progress() {
        let record = progress("u1", "sql", "clear", 0.4);
        assert_eq!(record.topic.as_str(), "Sql");
        assert_eq!(record.feedback_text, "clear");
    }
}
