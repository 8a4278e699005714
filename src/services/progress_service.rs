use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::AppResult,
    models::{
        domain::{LeaderboardEntry, ProgressRecord, Topic},
        dto::request::SubmitProgressRequest,
    },
    repositories::{LeaderboardRepository, ProgressRepository},
    services::sentiment,
};

pub const LEADERBOARD_SIZE: i64 = 10;

pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl ProgressService {
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        leaderboard: Arc<dyn LeaderboardRepository>,
    ) -> Self {
        Self {
            progress,
            leaderboard,
        }
    }

    /// Records a node completion and adds its score to the learner's total.
    pub async fn submit_progress(&self, request: SubmitProgressRequest) -> AppResult<LeaderboardEntry> {
        request.validate()?;

        let polarity = sentiment::polarity(&request.feedback);
        let record = ProgressRecord::new(
            &request.user_id,
            Topic::normalize(&request.topic),
            &request.node_label,
            request.score,
            &request.feedback,
            polarity,
        );
        self.progress.create(record).await?;

        let username = request
            .username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let entry = self
            .leaderboard
            .add_score(&request.user_id, username, request.score)
            .await?;

        log::info!(
            "progress saved for '{}' on '{}', total score {}",
            request.user_id,
            request.node_label,
            entry.score
        );
        Ok(entry)
    }

    pub async fn leaderboard(&self) -> AppResult<Vec<LeaderboardEntry>> {
        self.leaderboard.top(LEADERBOARD_SIZE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::repositories::{InMemoryLeaderboardRepository, InMemoryProgressRepository};

    fn service() -> (ProgressService, Arc<InMemoryProgressRepository>) {
        let progress = Arc::new(InMemoryProgressRepository::new());
        let service = ProgressService::new(
            progress.clone(),
            Arc::new(InMemoryLeaderboardRepository::new()),
        );
        (service, progress)
    }

    fn submission(user: &str, score: i64, feedback: &str) -> SubmitProgressRequest {
        SubmitProgressRequest {
            user_id: user.to_string(),
            topic: "sql".to_string(),
            node_label: "Joins".to_string(),
            score,
            feedback: feedback.to_string(),
            username: Some("Ada".to_string()),
        }
    }

    #[tokio::test]
    async fn scores_accumulate_per_user() {
        let (service, _) = service();

        service.submit_progress(submission("u1", 5, "")).await.unwrap();
        let entry = service.submit_progress(submission("u1", 7, "")).await.unwrap();

        assert_eq!(entry.score, 12);
        let board = service.leaderboard().await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].score, 12);
        assert_eq!(board[0].full_name, "Ada");
    }

    #[tokio::test]
    async fn sentiment_is_computed_at_write_time() {
        let (service, progress) = service();

        service
            .submit_progress(submission("u1", 3, "This was really helpful, great lesson"))
            .await
            .unwrap();

        let scores = progress
            .sentiment_scores(Some(&Topic::normalize("SQL")))
            .await
            .unwrap();
        assert_eq!(scores.len(), 1);
        assert!(scores[0] > 0.0);
    }

    #[tokio::test]
    async fn leaderboard_is_ordered_and_limited() {
        let (service, _) = service();
        for i in 0..12 {
            service
                .submit_progress(submission(&format!("user{}", i), i, ""))
                .await
                .unwrap();
        }

        let board = service.leaderboard().await.unwrap();
        assert_eq!(board.len(), LEADERBOARD_SIZE as usize);
        assert_eq!(board[0].score, 11);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn missing_user_is_rejected() {
        let (service, _) = service();
        let result = service.submit_progress(submission("", 5, "")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
