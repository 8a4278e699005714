pub mod leaderboard_repository;
pub mod memory;
pub mod progress_repository;
pub mod roadmap_repository;
pub mod saved_resource_repository;

pub use leaderboard_repository::{LeaderboardRepository, MongoLeaderboardRepository};
pub use memory::{
    InMemoryLeaderboardRepository, InMemoryProgressRepository, InMemoryRoadmapRepository,
    InMemorySavedResourceRepository,
};
pub use progress_repository::{MongoProgressRepository, ProgressRepository};
pub use roadmap_repository::{MongoRoadmapRepository, RoadmapRepository};
pub use saved_resource_repository::{MongoSavedResourceRepository, SavedResourceRepository};
