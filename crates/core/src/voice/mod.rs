mod base;
mod table;

use crate::emotion::{DisplayEmotion, IntensityLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use base::BaseVoiceTable;
pub use table::{TableError, VoiceTable};

const STABILITY_BASE: f64 = 0.75;
const STABILITY_STEP: f64 = -0.10;
const SIMILARITY_BASE: f64 = 0.60;
const SIMILARITY_STEP: f64 = 0.10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pitch {
    VeryLow,
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
}

impl Pitch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::MediumLow => "medium_low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium_high",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete synthesis settings for one emotion at one intensity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct VoiceParameters {
    /// Words per minute.
    pub rate: u32,
    /// Loudness in `[0.0, 1.0]`.
    pub volume: f32,
    pub pitch: Pitch,
}

impl VoiceParameters {
    pub const fn new(rate: u32, volume: f32, pitch: Pitch) -> Self {
        Self {
            rate,
            volume,
            pitch,
        }
    }
}

/// Voice settings for the cloud renderer, derived from intensity alone.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct CloudVoiceTuning {
    pub stability: f64,
    pub similarity_boost: f64,
}

impl CloudVoiceTuning {
    /// Stability falls and similarity rises by 0.1 per intensity step.
    pub fn for_intensity(intensity: IntensityLevel) -> Self {
        let step = f64::from(intensity.ordinal());
        Self {
            stability: STABILITY_BASE + STABILITY_STEP * step,
            similarity_boost: SIMILARITY_BASE + SIMILARITY_STEP * step,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown emotion: {0}")]
    UnknownEmotion(DisplayEmotion),
    #[error("unknown intensity {intensity} for emotion {emotion}")]
    UnknownIntensity {
        emotion: DisplayEmotion,
        intensity: IntensityLevel,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cloud_tuning_literal_values() {
        let expected = [(0.75, 0.60), (0.65, 0.70), (0.55, 0.80)];
        for (level, (stability, similarity)) in IntensityLevel::ALL.into_iter().zip(expected) {
            let tuning = CloudVoiceTuning::for_intensity(level);
            assert!(approx(tuning.stability, stability), "{level}: {tuning:?}");
            assert!(approx(tuning.similarity_boost, similarity), "{level}: {tuning:?}");
        }
    }

    #[test]
    fn cloud_tuning_is_strictly_monotonic() {
        let tunings: Vec<_> = IntensityLevel::ALL
            .into_iter()
            .map(CloudVoiceTuning::for_intensity)
            .collect();
        for pair in tunings.windows(2) {
            assert!(pair[1].stability < pair[0].stability);
            assert!(pair[1].similarity_boost > pair[0].similarity_boost);
        }
    }

    #[test]
    fn pitch_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Pitch::MediumHigh).unwrap(), "\"medium_high\"");
        assert_eq!(Pitch::VeryLow.to_string(), "very_low");
    }
}
