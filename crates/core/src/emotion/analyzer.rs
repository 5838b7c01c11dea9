use crate::emotion::SentimentLabel;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> SentimentLabel;

    /// Raw scores behind the label, for classifiers that have them.
    fn polarity(&self, _text: &str) -> Option<PolarityScores> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct PolarityScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Normalized overall polarity in `[-1.0, 1.0]`.
    pub compound: f64,
}

impl PolarityScores {
    pub fn label(&self) -> SentimentLabel {
        if self.compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if self.compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// VADER scorer over its full embedded valence lexicon.
///
/// Word valence, negation, degree modifiers, caps and punctuation emphasis
/// all come from the lexicon engine. Immutable after construction, so one
/// instance can serve every thread; [`LexiconSentimentAnalyzer::shared`]
/// hands out a process-wide one.
pub struct LexiconSentimentAnalyzer {
    vader: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl LexiconSentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            vader: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }

    pub fn shared() -> &'static LexiconSentimentAnalyzer {
        static SHARED: OnceLock<LexiconSentimentAnalyzer> = OnceLock::new();
        SHARED.get_or_init(LexiconSentimentAnalyzer::new)
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        if text.trim().is_empty() {
            return PolarityScores::default();
        }
        let scores = self.vader.polarity_scores(text);
        let score = |key: &str| scores.get(key).copied().unwrap_or_default();
        PolarityScores {
            positive: score("pos"),
            negative: score("neg"),
            neutral: score("neu"),
            compound: score("compound").clamp(-1.0, 1.0),
        }
    }
}

impl Default for LexiconSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LexiconSentimentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LexiconSentimentAnalyzer")
    }
}

impl SentimentClassifier for LexiconSentimentAnalyzer {
    fn classify(&self, text: &str) -> SentimentLabel {
        if text.trim().is_empty() {
            return SentimentLabel::Neutral;
        }
        self.polarity_scores(text).label()
    }

    fn polarity(&self, text: &str) -> Option<PolarityScores> {
        Some(self.polarity_scores(text))
    }
}
