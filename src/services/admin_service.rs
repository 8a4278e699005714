use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{LeaderboardEntry, Topic},
        dto::response::{AdminStats, FeedbackEntry, RoadmapSummary},
    },
    repositories::{LeaderboardRepository, ProgressRepository, RoadmapRepository},
    services::sentiment,
};

const RECENT_LIMIT: i64 = 50;
const USER_LIMIT: i64 = 100;

pub struct AdminService {
    admin_email: String,
    admin_password: SecretString,
    roadmaps: Arc<dyn RoadmapRepository>,
    progress: Arc<dyn ProgressRepository>,
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl AdminService {
    pub fn new(
        config: &Config,
        roadmaps: Arc<dyn RoadmapRepository>,
        progress: Arc<dyn ProgressRepository>,
        leaderboard: Arc<dyn LeaderboardRepository>,
    ) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
            roadmaps,
            progress,
            leaderboard,
        }
    }

    /// Checks the single configured admin credential. The email match is
    /// case-insensitive.
    pub fn login(&self, email: &str, password: &str) -> AppResult<()> {
        let email_ok = digest(&email.trim().to_lowercase())
            == digest(&self.admin_email.trim().to_lowercase());
        let password_ok = digest(password) == digest(self.admin_password.expose_secret());

        if email_ok && password_ok {
            log::info!("admin login succeeded");
            Ok(())
        } else {
            log::warn!("admin login rejected");
            Err(AppError::Unauthorized("Invalid admin credentials".to_string()))
        }
    }

    /// Learners are counted from the leaderboard; satisfaction is 0 until any
    /// feedback exists.
    pub async fn stats(&self) -> AppResult<AdminStats> {
        let users = self.leaderboard.count().await?;
        let roadmaps = self.roadmaps.count().await?;
        let scores = self.progress.sentiment_scores(None).await?;
        let satisfaction = sentiment::mean(&scores)
            .map(sentiment::satisfaction_percent)
            .unwrap_or(0);

        Ok(AdminStats {
            users,
            roadmaps,
            satisfaction,
        })
    }

    pub async fn roadmaps(&self) -> AppResult<Vec<RoadmapSummary>> {
        let recent = self.roadmaps.list_recent(RECENT_LIMIT).await?;
        Ok(recent.into_iter().map(RoadmapSummary::from).collect())
    }

    pub async fn feedback(&self) -> AppResult<Vec<FeedbackEntry>> {
        let recent = self.progress.list_recent_feedback(RECENT_LIMIT).await?;
        Ok(recent.into_iter().map(FeedbackEntry::from).collect())
    }

    pub async fn users(&self) -> AppResult<Vec<LeaderboardEntry>> {
        self.leaderboard.top(USER_LIMIT).await
    }

    /// Removes every stored roadmap for the topic, generated and saved alike.
    pub async fn delete_roadmap(&self, topic: &str) -> AppResult<u64> {
        let topic = Topic::normalize(topic);
        let deleted = self.roadmaps.delete_by_topic(&topic).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("No roadmaps stored for '{}'", topic)));
        }
        log::info!("admin deleted {} roadmap(s) for '{}'", deleted, topic);
        Ok(deleted)
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        InMemoryLeaderboardRepository, InMemoryProgressRepository, InMemoryRoadmapRepository,
    };
    use crate::test_utils::fixtures::{progress, stored_roadmap};

    struct Fixture {
        service: AdminService,
        roadmaps: Arc<InMemoryRoadmapRepository>,
        progress: Arc<InMemoryProgressRepository>,
        leaderboard: Arc<InMemoryLeaderboardRepository>,
    }

    fn fixture() -> Fixture {
        let roadmaps = Arc::new(InMemoryRoadmapRepository::new());
        let progress = Arc::new(InMemoryProgressRepository::new());
        let leaderboard = Arc::new(InMemoryLeaderboardRepository::new());
        let service = AdminService::new(
            &Config::test_config(),
            roadmaps.clone(),
            progress.clone(),
            leaderboard.clone(),
        );
        Fixture {
            service,
            roadmaps,
            progress,
            leaderboard,
        }
    }

    #[test]
    fn login_checks_both_fields() {
        let f = fixture();
        let email = Config::test_config().admin_email;

        assert!(f.service.login(&email, "test-admin-password").is_ok());
        assert!(f.service.login(&email.to_uppercase(), "test-admin-password").is_ok());
        assert!(matches!(
            f.service.login(&email, "wrong"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(f.service.login("someone@else.com", "test-admin-password").is_err());
    }

    #[tokio::test]
    async fn stats_aggregate_counts_and_sentiment() {
        let f = fixture();
        assert_eq!(
            f.service.stats().await.unwrap(),
            AdminStats {
                users: 0,
                roadmaps: 0,
                satisfaction: 0
            }
        );

        f.leaderboard.add_score("u1", None, 5).await.unwrap();
        f.leaderboard.add_score("u2", None, 3).await.unwrap();
        f.roadmaps
            .upsert(stored_roadmap(None, "rust", &["Syntax"]))
            .await
            .unwrap();
        f.progress.create(progress("u1", "rust", "good", 1.0)).await.unwrap();
        f.progress.create(progress("u2", "rust", "meh", 0.0)).await.unwrap();

        let stats = f.service.stats().await.unwrap();
        assert_eq!(stats.users, 2);
        assert_eq!(stats.roadmaps, 1);
        assert_eq!(stats.satisfaction, 75);
    }

    #[tokio::test]
    async fn delete_roadmap_removes_all_rows_for_topic() {
        let f = fixture();
        for owner in [None, Some("u1"), Some("u2")] {
            f.roadmaps
                .upsert(stored_roadmap(owner, "rust", &["Syntax"]))
                .await
                .unwrap();
        }

        assert_eq!(f.service.delete_roadmap("RUST").await.unwrap(), 3);
        assert!(matches!(
            f.service.delete_roadmap("rust").await,
            Err(AppError::NotFound(_))
        ));
        assert!(f.service.roadmaps().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn feedback_lists_only_written_feedback() {
        let f = fixture();
        f.progress.create(progress("u1", "go", "", 0.0)).await.unwrap();
        f.progress.create(progress("u1", "go", "clear", 0.4)).await.unwrap();

        let feedback = f.service.feedback().await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].feedback_text, "clear");
    }
}
