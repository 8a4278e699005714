pub mod admin_service;
pub mod extractor;
pub mod library_service;
pub mod model_service;
pub mod progress_service;
pub mod quiz_service;
pub mod resource_service;
pub mod roadmap_service;
pub mod search_client;
pub mod sentiment;
pub mod topic_service;
pub mod tutor_service;
pub mod youtube_client;

pub use admin_service::AdminService;
pub use library_service::LibraryService;
pub use model_service::{CompletionClient, OpenAiCompletionClient};
pub use progress_service::ProgressService;
pub use quiz_service::QuizService;
pub use resource_service::ResourceService;
pub use roadmap_service::RoadmapService;
pub use search_client::{DuckDuckGoClient, WebSearchClient};
pub use topic_service::TopicService;
pub use tutor_service::TutorService;
pub use youtube_client::{VideoSearchClient, YouTubeClient};
