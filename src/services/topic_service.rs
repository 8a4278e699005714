use std::sync::Arc;

use crate::{
    constants::prompts::{search_phrase_prompt, SEARCH_PHRASE_SYSTEM_PROMPT},
    models::domain::Topic,
    services::model_service::{CompletionClient, CompletionRequest},
};

const LONG_TOPIC_WORDS: usize = 8;
const LONG_TOPIC_CHARS: usize = 80;
const FALLBACK_TOKENS: usize = 4;

pub struct TopicService {
    completion: Arc<dyn CompletionClient>,
}

impl TopicService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    /// Condenses free text into a short search phrase. Falls back to the first
    /// four tokens of the input when the model is unavailable.
    pub async fn compress(&self, raw: &str) -> String {
        let request = CompletionRequest::new(SEARCH_PHRASE_SYSTEM_PROMPT, search_phrase_prompt(raw), 0.3);

        match self.completion.complete(request).await {
            Ok(reply) => match sanitize_phrase(&reply) {
                Some(phrase) => phrase,
                None => first_tokens(raw),
            },
            Err(e) => {
                log::warn!("topic compression failed, using leading tokens: {}", e);
                first_tokens(raw)
            }
        }
    }

    /// Turns user input into a canonical topic, compressing it first when it
    /// reads like a sentence rather than a subject.
    pub async fn resolve(&self, raw: &str) -> Topic {
        if is_long(raw) {
            let phrase = self.compress(raw).await;
            log::debug!("compressed '{}' to '{}'", raw, phrase);
            return Topic::normalize(&phrase);
        }
        Topic::normalize(raw)
    }
}

fn is_long(raw: &str) -> bool {
    raw.split_whitespace().count() > LONG_TOPIC_WORDS || raw.trim().chars().count() > LONG_TOPIC_CHARS
}

fn first_tokens(raw: &str) -> String {
    raw.split_whitespace()
        .take(FALLBACK_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty line of the reply with wrapping quotes and trailing
/// punctuation removed.
fn sanitize_phrase(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let phrase = line
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches(['.', '!'])
        .trim();
    (!phrase.is_empty()).then(|| phrase.to_string())
}
