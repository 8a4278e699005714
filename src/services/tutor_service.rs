use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::prompts::tutor_context,
    errors::AppResult,
    models::dto::request::{ChatNodeRequest, ChatTurn},
    services::model_service::{ChatMessage, CompletionClient, CompletionRequest},
};

pub const FALLBACK_REPLY: &str =
    "I'm having trouble answering right now. Please try again in a moment.";
const MAX_HISTORY_TURNS: usize = 10;
const TUTOR_TEMPERATURE: f32 = 0.5;

pub struct TutorService {
    completion: Arc<dyn CompletionClient>,
}

impl TutorService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    /// Answers a learner's question about one roadmap node. Model failures
    /// produce a canned reply; only an invalid request is an error.
    pub async fn chat_node(&self, request: ChatNodeRequest) -> AppResult<String> {
        request.validate()?;

        let completion = CompletionRequest {
            messages: conversation(&request),
            temperature: TUTOR_TEMPERATURE,
            json_object: false,
        };

        match self.completion.complete(completion).await {
            Ok(reply) if !reply.trim().is_empty() => Ok(reply.trim().to_string()),
            Ok(_) => Ok(FALLBACK_REPLY.to_string()),
            Err(e) => {
                log::warn!("tutor reply for '{}' failed: {}", request.node_label, e);
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}

fn conversation(request: &ChatNodeRequest) -> Vec<ChatMessage> {
    let skip = request.history.len().saturating_sub(MAX_HISTORY_TURNS);

    let mut messages = vec![ChatMessage::system(tutor_context(
        &request.topic,
        &request.node_label,
    ))];
    messages.extend(request.history.iter().skip(skip).map(to_message));
    messages.push(ChatMessage::user(request.message.as_str()));
    messages
}

fn to_message(turn: &ChatTurn) -> ChatMessage {
    match turn.role.as_str() {
        "assistant" | "model" | "bot" => ChatMessage::assistant(turn.content.as_str()),
        _ => ChatMessage::user(turn.content.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::model_service::MockCompletionClient;

    fn request(message: &str, history: Vec<ChatTurn>) -> ChatNodeRequest {
        ChatNodeRequest {
            topic: "Rust".to_string(),
            node_label: "Ownership".to_string(),
            message: message.to_string(),
            history,
        }
    }

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn builds_conversation_with_context_and_history() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .withf(|req| {
                req.messages.len() == 4
                    && req.messages[0].role == "system"
                    && req.messages[0].content.contains("Ownership")
                    && req.messages[2].role == "assistant"
                    && req.messages[3].content == "What is a borrow?"
            })
            .returning(|_| Ok("  A borrow is a reference.  ".to_string()));

        let service = TutorService::new(Arc::new(mock));
        let reply = service
            .chat_node(request(
                "What is a borrow?",
                vec![turn("user", "hi"), turn("model", "hello")],
            ))
            .await
            .unwrap();
        assert_eq!(reply, "A borrow is a reference.");
    }

    #[tokio::test]
    async fn model_failure_gives_fallback_reply() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(|_| Err(AppError::Upstream("down".to_string())));

        let reply = TutorService::new(Arc::new(mock))
            .chat_node(request("help", Vec::new()))
            .await
            .unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().times(0);

        let result = TutorService::new(Arc::new(mock))
            .chat_node(request("", Vec::new()))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn history_is_truncated_to_recent_turns() {
        let history = (0..25).map(|i| turn("user", &i.to_string())).collect();
        let messages = conversation(&request("latest", history));

        assert_eq!(messages.len(), MAX_HISTORY_TURNS + 2);
        assert_eq!(messages[1].content, "15");
    }
}
