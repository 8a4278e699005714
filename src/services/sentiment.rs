//! Lexicon-based polarity scoring for learner feedback.
//!
//! Each known word carries a polarity in [-1, 1]. A negator within the two
//! preceding words flips and dampens it, an intensifier right before it
//! scales it. The result is the mean over scored words, clamped to [-1, 1];
//! text with no known words scores 0.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("amazing", 0.9),
        ("awesome", 0.9),
        ("excellent", 1.0),
        ("perfect", 1.0),
        ("great", 0.8),
        ("love", 0.7),
        ("loved", 0.7),
        ("fantastic", 0.9),
        ("brilliant", 0.9),
        ("good", 0.7),
        ("nice", 0.6),
        ("helpful", 0.6),
        ("useful", 0.5),
        ("clear", 0.4),
        ("easy", 0.4),
        ("fun", 0.5),
        ("interesting", 0.5),
        ("enjoyed", 0.6),
        ("like", 0.3),
        ("liked", 0.4),
        ("informative", 0.5),
        ("engaging", 0.5),
        ("thanks", 0.3),
        ("okay", 0.1),
        ("ok", 0.1),
        ("fine", 0.2),
        ("bad", -0.7),
        ("terrible", -1.0),
        ("awful", -1.0),
        ("horrible", -1.0),
        ("worst", -1.0),
        ("poor", -0.6),
        ("boring", -0.6),
        ("confusing", -0.5),
        ("confused", -0.4),
        ("hard", -0.3),
        ("difficult", -0.4),
        ("useless", -0.8),
        ("hate", -0.8),
        ("hated", -0.8),
        ("wrong", -0.5),
        ("slow", -0.3),
        ("unclear", -0.5),
        ("broken", -0.6),
        ("frustrating", -0.7),
        ("annoying", -0.6),
        ("waste", -0.7),
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("extremely", 1.5),
        ("super", 1.4),
        ("so", 1.2),
        ("quite", 1.1),
        ("slightly", 0.6),
        ("somewhat", 0.7),
    ]
    .into_iter()
    .collect()
});

const NEGATORS: &[&str] = &["not", "no", "never", "isn't", "wasn't", "don't", "didn't", "hardly"];
const NEGATION_FACTOR: f64 = -0.5;

pub fn polarity(text: &str) -> f64 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let mut total = 0.0;
    let mut scored = 0usize;

    for (i, word) in words.iter().enumerate() {
        let Some(&base) = LEXICON.get(word.as_str()) else {
            continue;
        };

        let mut score = base;
        if let Some(prev) = i.checked_sub(1).and_then(|p| words.get(p)) {
            if let Some(&factor) = INTENSIFIERS.get(prev.as_str()) {
                score *= factor;
            }
        }

        let window = &words[i.saturating_sub(2)..i];
        if window.iter().any(|w| NEGATORS.contains(&w.as_str())) {
            score *= NEGATION_FACTOR;
        }

        total += score.clamp(-1.0, 1.0);
        scored += 1;
    }

    if scored == 0 {
        return 0.0;
    }
    (total / scored as f64).clamp(-1.0, 1.0)
}

/// Maps a mean polarity onto a 0..=100 percentage.
pub fn satisfaction_percent(mean_polarity: f64) -> u8 {
    (((mean_polarity.clamp(-1.0, 1.0) + 1.0) / 2.0) * 100.0).round() as u8
}

pub fn mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}
