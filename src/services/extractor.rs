//! Recovers JSON from free-form model output.
//!
//! Models wrap their answer in markdown fences, prepend chatty prose, or emit
//! LaTeX with bare backslashes. [`extract`] strips all of that down to the
//! outermost bracketed region of the expected shape and parses it, with one
//! repair attempt for stray backslashes. It never panics and never returns
//! anything but a parsed value or an [`ExtractError`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("CODE_FENCE is a valid regex pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
}

impl Shape {
    fn brackets(&self) -> (char, char) {
        match self {
            Shape::Object => ('{', '}'),
            Shape::Array => ('[', ']'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no {0:?}-shaped region in model output")]
    NoStructuredContent(Shape),

    #[error("model output is not valid JSON: {0}")]
    Malformed(String),

    #[error("parsed value contains no array")]
    NoArray,
}

pub fn extract(text: &str, shape: Shape) -> Result<Value, ExtractError> {
    let unfenced = CODE_FENCE.replace_all(text, "");
    let trimmed = unfenced.trim();

    let (open, close) = shape.brackets();
    let start = trimmed
        .find(open)
        .ok_or(ExtractError::NoStructuredContent(shape))?;
    let end = trimmed
        .rfind(close)
        .filter(|end| *end > start)
        .ok_or(ExtractError::NoStructuredContent(shape))?;
    let candidate = &trimmed[start..=end];

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(first) => {
            let repaired = escape_stray_backslashes(candidate);
            serde_json::from_str::<Value>(&repaired).map_err(|_| {
                log::debug!("extraction failed after repair: {}", first);
                ExtractError::Malformed(first.to_string())
            })
        }
    }
}

/// Array extraction that also accepts an object envelope such as
/// `{"questions": [...]}`: the first field holding an array is returned.
pub fn extract_array(text: &str) -> Result<Vec<Value>, ExtractError> {
    let value = match extract(text, Shape::Array) {
        Ok(value) => value,
        Err(array_err) => extract(text, Shape::Object).map_err(|_| array_err)?,
    };
    first_array(value)
}

fn first_array(value: Value) -> Result<Vec<Value>, ExtractError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or(ExtractError::NoArray),
        _ => Err(ExtractError::NoArray),
    }
}

/// Doubles every backslash that does not start a valid JSON escape.
fn escape_stray_backslashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('\\') => {
                out.push_str("\\\\");
                i += 2;
            }
            Some('"' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                out.push('\\');
                i += 1;
            }
            Some('u') if is_unicode_escape(&chars[i + 2..]) => {
                out.push('\\');
                i += 1;
            }
            _ => {
                out.push_str("\\\\");
                i += 1;
            }
        }
    }

    out
}

fn is_unicode_escape(rest: &[char]) -> bool {
    rest.len() >= 4 && rest[..4].iter().all(|c| c.is_ascii_hexdigit())
}
