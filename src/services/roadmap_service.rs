use std::sync::Arc;

use crate::{
    constants::prompts::{roadmap_prompt, CURRICULUM_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::domain::{Roadmap, RoadmapGraph, RoadmapMode, StoredRoadmap, Topic},
    repositories::RoadmapRepository,
    services::{
        extractor::{extract, Shape},
        model_service::{CompletionClient, CompletionRequest},
    },
};

const ROADMAP_TEMPERATURE: f32 = 0.2;

pub struct RoadmapService {
    repository: Arc<dyn RoadmapRepository>,
    completion: Arc<dyn CompletionClient>,
}

impl RoadmapService {
    pub fn new(repository: Arc<dyn RoadmapRepository>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            repository,
            completion,
        }
    }

    /// Always yields a roadmap. Standard mode is served from the store when a
    /// row exists for the topic; a failed generation degrades to a single
    /// "<Topic> Basics" step.
    pub async fn get_roadmap(&self, topic: &Topic, mode: RoadmapMode) -> Roadmap {
        if mode == RoadmapMode::Standard {
            if let Some(cached) = self.cached(topic).await {
                log::debug!("roadmap cache hit for '{}'", topic);
                return cached;
            }
        }

        let roadmap = match self.generate(topic, mode).await {
            Ok(roadmap) => roadmap,
            Err(e) => {
                log::warn!("roadmap generation for '{}' failed: {}", topic, e);
                return Roadmap::fallback(topic);
            }
        };

        if mode == RoadmapMode::Standard {
            if let Err(e) = self.repository.upsert(StoredRoadmap::generated(&roadmap)).await {
                log::warn!("could not cache roadmap for '{}': {}", topic, e);
            }
        }

        roadmap
    }

    async fn cached(&self, topic: &Topic) -> Option<Roadmap> {
        match self.repository.find_by_topic(topic).await {
            Ok(stored) => stored.and_then(|s| s.to_roadmap()),
            Err(e) => {
                log::warn!("roadmap lookup for '{}' failed, regenerating: {}", topic, e);
                None
            }
        }
    }

    async fn generate(&self, topic: &Topic, mode: RoadmapMode) -> AppResult<Roadmap> {
        let request = CompletionRequest::new(
            CURRICULUM_SYSTEM_PROMPT,
            roadmap_prompt(topic, mode),
            ROADMAP_TEMPERATURE,
        )
        .json_object();

        let reply = self.completion.complete(request).await?;
        let value = extract(&reply, Shape::Object)
            .map_err(|e| AppError::Upstream(format!("unreadable roadmap reply: {}", e)))?;
        let graph: RoadmapGraph = serde_json::from_value(value)?;

        if graph.nodes.is_empty() {
            return Err(AppError::Upstream("roadmap reply had no steps".to_string()));
        }
        if graph.nodes.len() != mode.target_steps() {
            log::debug!(
                "roadmap for '{}' has {} steps, asked for {}",
                topic,
                graph.nodes.len(),
                mode.target_steps()
            );
        }

        Ok(Roadmap::from_graph(topic.clone(), graph))
    }
}
