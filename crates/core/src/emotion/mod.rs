mod analyzer;
mod intensity;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use analyzer::{LexiconSentimentAnalyzer, PolarityScores, SentimentClassifier};
pub use intensity::estimate_intensity;

/// Coarse polarity of a text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotion vocabulary used as the key into the voice tables.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEmotion {
    Joy,
    Sadness,
    Anger,
    Surprise,
    Inquisitive,
    Concerned,
    Neutral,
    Fear,
    Disgust,
}

impl DisplayEmotion {
    pub const ALL: [DisplayEmotion; 9] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Surprise,
        Self::Inquisitive,
        Self::Concerned,
        Self::Neutral,
        Self::Fear,
        Self::Disgust,
    ];

    /// Every emotion [`DisplayEmotion::from_sentiment`] can produce.
    pub const FROM_SENTIMENT: [DisplayEmotion; 3] = [Self::Joy, Self::Sadness, Self::Neutral];

    /// Default caller policy for widening a sentiment into a display emotion.
    pub fn from_sentiment(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Positive => Self::Joy,
            SentimentLabel::Negative => Self::Sadness,
            SentimentLabel::Neutral => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Surprise => "surprise",
            Self::Inquisitive => "inquisitive",
            Self::Concerned => "concerned",
            Self::Neutral => "neutral",
            Self::Fear => "fear",
            Self::Disgust => "disgust",
        }
    }
}

impl fmt::Display for DisplayEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown emotion label: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for DisplayEmotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| UnknownEmotion(s.to_owned()))
    }
}

/// Heuristic strength of the emotion, ordered low < medium < high.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLevel {
    Low,
    Medium,
    High,
}

impl Default for IntensityLevel {
    fn default() -> Self {
        Self::Low
    }
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 3] = [Self::Low, Self::Medium, Self::High];

    /// Position in `[low, medium, high]`.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown intensity label: {0}")]
pub struct UnknownIntensity(pub String);

impl FromStr for IntensityLevel {
    type Err = UnknownIntensity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| UnknownIntensity(s.to_owned()))
    }
}
