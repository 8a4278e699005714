use std::sync::Arc;

use crate::{
    constants::prompts::{quiz_prompt, QUIZ_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::domain::QuizQuestion,
    services::{
        extractor::extract_array,
        model_service::{CompletionClient, CompletionRequest},
    },
};

pub const DEFAULT_QUESTION_COUNT: usize = 10;
const MAX_QUESTION_COUNT: usize = 25;
const QUIZ_TEMPERATURE: f32 = 0.7;

pub struct QuizService {
    completion: Arc<dyn CompletionClient>,
}

impl QuizService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    /// Never empty: a failed generation returns one placeholder question.
    pub async fn get_quiz(
        &self,
        main_topic: &str,
        sub_topic: &str,
        count: Option<usize>,
        prior_topics: &[String],
    ) -> Vec<QuizQuestion> {
        let count = count
            .unwrap_or(DEFAULT_QUESTION_COUNT)
            .clamp(1, MAX_QUESTION_COUNT);

        match self.generate(main_topic, sub_topic, count, prior_topics).await {
            Ok(questions) => questions,
            Err(e) => {
                log::warn!("quiz generation for '{}' failed: {}", sub_topic, e);
                vec![QuizQuestion::placeholder(sub_topic)]
            }
        }
    }

    async fn generate(
        &self,
        main_topic: &str,
        sub_topic: &str,
        count: usize,
        prior_topics: &[String],
    ) -> AppResult<Vec<QuizQuestion>> {
        let request = CompletionRequest::new(
            QUIZ_SYSTEM_PROMPT,
            quiz_prompt(main_topic, sub_topic, count, prior_topics),
            QUIZ_TEMPERATURE,
        );

        let reply = self.completion.complete(request).await?;
        let items = extract_array(&reply)
            .map_err(|e| AppError::Upstream(format!("unreadable quiz reply: {}", e)))?;

        let total = items.len();
        let questions: Vec<QuizQuestion> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();

        if questions.len() < total {
            log::debug!("skipped {} unreadable quiz items", total - questions.len());
        }
        if questions.is_empty() {
            return Err(AppError::Upstream("quiz reply had no usable questions".to_string()));
        }

        Ok(questions)
    }
}
