pub mod progress;
pub mod quiz_question;
pub mod resource;
pub mod roadmap;
pub mod topic;
pub use progress::{LeaderboardEntry, ProgressRecord};
pub use quiz_question::QuizQuestion;
pub use resource::{Resource, ResourceBundle, ResourceKind, SavedResource};
pub use roadmap::{Roadmap, RoadmapGraph, RoadmapMode, RoadmapStep, StoredRoadmap};
pub use topic::Topic;
