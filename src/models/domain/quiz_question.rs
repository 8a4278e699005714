use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`. Passed through as generated; not range-checked.
    #[serde(
        alias = "answer",
        alias = "correctAnswer",
        alias = "correct_index",
        deserialize_with = "answer_index"
    )]
    #[schemars(with = "i64")]
    pub correct_answer: i64,
}

impl QuizQuestion {
    /// Rendered when generation fails so the client always has one item.
    pub fn placeholder(sub_topic: &str) -> Self {
        Self {
            question: format!(
                "We couldn't generate a quiz for {} right now. Please try again.",
                sub_topic
            ),
            options: vec!["Retry later".to_string(), "Continue studying".to_string()],
            correct_answer: 0,
        }
    }
}

/// Accepts `2`, `"2"` or a letter label like `"C"`.
fn answer_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("answer index is not an integer")),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if let Ok(index) = s.parse::<i64>() {
                return Ok(index);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    Ok(c.to_ascii_uppercase() as i64 - 'A' as i64)
                }
                _ => Err(serde::de::Error::custom(format!(
                    "unrecognised answer label '{}'",
                    s
                ))),
            }
        }
        other => Err(serde::de::Error::custom(format!(
            "unexpected answer value {}",
            other
        ))),
    }
}
