// src/emotion/mod.rs

//! Keyword-based emotion tagging for inbound utterances.
//!
//! Pure and total: every utterance gets a label, `neutral` when nothing
//! matches. Matching is case-insensitive substring membership; the first
//! matching category in priority order wins.

use std::fmt;

/// Coarse emotion category attached to each utterance. Recomputed fresh per
/// message, never stored in conversation memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmotionLabel {
    Stressed,
    Sad,
    Happy,
    Neutral,
}

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Stressed => "stressed",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STRESSED_KEYWORDS: &[&str] = &["stressed", "overwhelmed", "anxious", "panic", "worried"];
const SAD_KEYWORDS: &[&str] = &["sad", "depressed", "unhappy", "cry", "lonely"];
const HAPPY_KEYWORDS: &[&str] = &["happy", "great", "wonderful", "excited", "love"];

/// Tag an utterance with its emotion. Priority: stressed > sad > happy,
/// `neutral` otherwise.
pub fn classify(utterance: &str) -> EmotionLabel {
    let lowered = utterance.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if contains_any(STRESSED_KEYWORDS) {
        EmotionLabel::Stressed
    } else if contains_any(SAD_KEYWORDS) {
        EmotionLabel::Sad
    } else if contains_any(HAPPY_KEYWORDS) {
        EmotionLabel::Happy
    } else {
        EmotionLabel::Neutral
    }
}
