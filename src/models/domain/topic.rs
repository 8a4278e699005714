use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical subject key: trimmed, inner whitespace collapsed, every word
/// title-cased. Two topics are equal iff their canonical forms are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn normalize(raw: &str) -> Self {
        let canonical = raw
            .split_whitespace()
            .map(title_case_word)
            .collect::<Vec<_>>()
            .join(" ");
        Topic(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Only the first char of an uppercase expansion stays upper (`ß` -> `Ss`),
/// so a second pass leaves the word unchanged.
fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(word.len());
    out.extend(upper.next());
    out.extend(upper.flat_map(char::to_lowercase));
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
