use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    db::Database,
    errors::AppResult,
    repositories::{
        InMemoryLeaderboardRepository, InMemoryProgressRepository, InMemoryRoadmapRepository,
        InMemorySavedResourceRepository, LeaderboardRepository, MongoLeaderboardRepository,
        MongoProgressRepository, MongoRoadmapRepository, MongoSavedResourceRepository,
        ProgressRepository, RoadmapRepository, SavedResourceRepository,
    },
    services::{
        AdminService, CompletionClient, DuckDuckGoClient, LibraryService, OpenAiCompletionClient,
        ProgressService, QuizService, ResourceService, RoadmapService, TopicService, TutorService,
        VideoSearchClient, WebSearchClient, YouTubeClient,
    },
};

/// Storage handles shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub roadmaps: Arc<dyn RoadmapRepository>,
    pub saved_resources: Arc<dyn SavedResourceRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub leaderboard: Arc<dyn LeaderboardRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            roadmaps: Arc::new(InMemoryRoadmapRepository::new()),
            saved_resources: Arc::new(InMemorySavedResourceRepository::new()),
            progress: Arc::new(InMemoryProgressRepository::new()),
            leaderboard: Arc::new(InMemoryLeaderboardRepository::new()),
        }
    }

    pub async fn mongo(db: &Database) -> AppResult<Self> {
        let roadmaps = Arc::new(MongoRoadmapRepository::new(db));
        roadmaps.ensure_indexes().await?;
        let saved_resources = Arc::new(MongoSavedResourceRepository::new(db));
        saved_resources.ensure_indexes().await?;
        let progress = Arc::new(MongoProgressRepository::new(db));
        progress.ensure_indexes().await?;
        let leaderboard = Arc::new(MongoLeaderboardRepository::new(db));
        leaderboard.ensure_indexes().await?;

        Ok(Self {
            roadmaps,
            saved_resources,
            progress,
            leaderboard,
        })
    }
}

/// Outbound clients for the model provider, the video platform and the
/// search page.
#[derive(Clone)]
pub struct Collaborators {
    pub completion: Arc<dyn CompletionClient>,
    pub videos: Arc<dyn VideoSearchClient>,
    pub search: Arc<dyn WebSearchClient>,
}

impl Collaborators {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self {
            completion: Arc::new(OpenAiCompletionClient::new(config)),
            videos: Arc::new(YouTubeClient::new(config)?),
            search: Arc::new(DuckDuckGoClient::new(config)?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub topic_service: Arc<TopicService>,
    pub roadmap_service: Arc<RoadmapService>,
    pub quiz_service: Arc<QuizService>,
    pub resource_service: Arc<ResourceService>,
    pub progress_service: Arc<ProgressService>,
    pub library_service: Arc<LibraryService>,
    pub tutor_service: Arc<TutorService>,
    pub admin_service: Arc<AdminService>,
    pub config: Arc<Config>,
    /// `None` when running on the in-memory backend.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let collaborators = Collaborators::from_config(&config)?;

        let (repositories, db) = match config.storage_backend {
            StorageBackend::Mongo => {
                let db = Database::connect(&config).await?;
                (Repositories::mongo(&db).await?, Some(db))
            }
            StorageBackend::Memory => {
                log::warn!("using in-memory storage; data is lost on restart");
                (Repositories::in_memory(), None)
            }
        };

        Ok(Self::from_parts(config, repositories, collaborators, db))
    }

    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        collaborators: Collaborators,
        db: Option<Database>,
    ) -> Self {
        let Repositories {
            roadmaps,
            saved_resources,
            progress,
            leaderboard,
        } = repositories;
        let Collaborators {
            completion,
            videos,
            search,
        } = collaborators;

        Self {
            topic_service: Arc::new(TopicService::new(completion.clone())),
            roadmap_service: Arc::new(RoadmapService::new(roadmaps.clone(), completion.clone())),
            quiz_service: Arc::new(QuizService::new(completion.clone())),
            resource_service: Arc::new(ResourceService::new(videos, search, progress.clone())),
            progress_service: Arc::new(ProgressService::new(progress.clone(), leaderboard.clone())),
            library_service: Arc::new(LibraryService::new(
                roadmaps.clone(),
                saved_resources,
                progress.clone(),
                leaderboard.clone(),
            )),
            tutor_service: Arc::new(TutorService::new(completion)),
            admin_service: Arc::new(AdminService::new(&config, roadmaps, progress, leaderboard)),
            config: Arc::new(config),
            db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn memory_backend_starts_without_database() {
        let state = AppState::new(Config::test_config()).await.unwrap();
        assert!(state.db.is_none());
        assert!(state.progress_service.leaderboard().await.unwrap().is_empty());
    }
}
