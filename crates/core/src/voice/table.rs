use crate::emotion::{DisplayEmotion, IntensityLevel};
use crate::voice::{LookupError, Pitch, VoiceParameters};
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("voice table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("voice table names unknown emotion {0:?}")]
    UnknownEmotion(String),
    #[error("voice table names unknown intensity {intensity:?} for {emotion}")]
    UnknownIntensity {
        emotion: DisplayEmotion,
        intensity: String,
    },
    #[error("rate for {emotion}/{intensity} must be > 0")]
    ZeroRate {
        emotion: DisplayEmotion,
        intensity: IntensityLevel,
    },
    #[error("volume {volume} for {emotion}/{intensity} is outside [0.0, 1.0]")]
    VolumeOutOfRange {
        emotion: DisplayEmotion,
        intensity: IntensityLevel,
        volume: f32,
    },
    #[error("voice table is incomplete: {0}")]
    Incomplete(#[from] LookupError),
}

/// Intensity-aware voice settings keyed by emotion, then intensity.
///
/// Lookups are exact; a missing key is a configuration error and is never
/// papered over with a default.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceTable {
    entries: BTreeMap<DisplayEmotion, BTreeMap<IntensityLevel, VoiceParameters>>,
}

impl VoiceTable {
    pub fn builtin() -> Self {
        use Pitch::*;

        // Columns are low, medium, high.
        let rows: [(DisplayEmotion, [VoiceParameters; 3]); 7] = [
            (
                DisplayEmotion::Joy,
                [
                    VoiceParameters::new(170, 0.9, MediumHigh),
                    VoiceParameters::new(180, 1.0, High),
                    VoiceParameters::new(190, 1.0, VeryHigh),
                ],
            ),
            (
                DisplayEmotion::Sadness,
                [
                    VoiceParameters::new(150, 0.8, MediumLow),
                    VoiceParameters::new(140, 0.7, Low),
                    VoiceParameters::new(130, 0.6, VeryLow),
                ],
            ),
            (
                DisplayEmotion::Anger,
                [
                    VoiceParameters::new(170, 0.9, MediumHigh),
                    VoiceParameters::new(190, 1.0, High),
                    VoiceParameters::new(200, 1.0, VeryHigh),
                ],
            ),
            (
                DisplayEmotion::Surprise,
                [
                    VoiceParameters::new(170, 0.9, High),
                    VoiceParameters::new(180, 1.0, VeryHigh),
                    VoiceParameters::new(190, 1.0, VeryHigh),
                ],
            ),
            (
                DisplayEmotion::Inquisitive,
                [
                    VoiceParameters::new(160, 0.8, MediumHigh),
                    VoiceParameters::new(165, 0.9, High),
                    VoiceParameters::new(170, 1.0, VeryHigh),
                ],
            ),
            (
                DisplayEmotion::Concerned,
                [
                    VoiceParameters::new(155, 0.8, MediumLow),
                    VoiceParameters::new(150, 0.9, Low),
                    VoiceParameters::new(145, 1.0, VeryLow),
                ],
            ),
            (
                DisplayEmotion::Neutral,
                [
                    VoiceParameters::new(150, 0.8, Medium),
                    VoiceParameters::new(155, 0.85, Medium),
                    VoiceParameters::new(160, 0.9, MediumHigh),
                ],
            ),
        ];

        let entries = rows
            .into_iter()
            .map(|(emotion, levels)| {
                let row = IntensityLevel::ALL.into_iter().zip(levels).collect();
                (emotion, row)
            })
            .collect();
        Self { entries }
    }

    /// Process-wide copy of [`VoiceTable::builtin`].
    pub fn shared() -> &'static VoiceTable {
        static SHARED: OnceLock<VoiceTable> = OnceLock::new();
        SHARED.get_or_init(VoiceTable::builtin)
    }

    /// Parses `{"joy": {"low": {"rate": 170, "volume": 0.9, "pitch": "medium_high"}}}`.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let raw: BTreeMap<String, BTreeMap<String, VoiceParameters>> = serde_json::from_str(json)?;

        let mut entries = BTreeMap::new();
        for (emotion_label, levels) in raw {
            let emotion: DisplayEmotion = emotion_label
                .parse()
                .map_err(|_| TableError::UnknownEmotion(emotion_label.clone()))?;
            let mut row = BTreeMap::new();
            for (intensity_label, params) in levels {
                let intensity: IntensityLevel =
                    intensity_label
                        .parse()
                        .map_err(|_| TableError::UnknownIntensity {
                            emotion,
                            intensity: intensity_label.clone(),
                        })?;
                validate_entry(emotion, intensity, &params)?;
                row.insert(intensity, params);
            }
            entries.insert(emotion, row);
        }
        Ok(Self { entries })
    }

    pub fn resolve(
        &self,
        emotion: DisplayEmotion,
        intensity: IntensityLevel,
    ) -> Result<VoiceParameters, LookupError> {
        let row = self
            .entries
            .get(&emotion)
            .ok_or(LookupError::UnknownEmotion(emotion))?;
        row.get(&intensity)
            .copied()
            .ok_or(LookupError::UnknownIntensity { emotion, intensity })
    }

    /// Fails unless every listed emotion resolves at every intensity.
    pub fn ensure_covers(&self, emotions: &[DisplayEmotion]) -> Result<(), LookupError> {
        for &emotion in emotions {
            for intensity in IntensityLevel::ALL {
                self.resolve(emotion, intensity)?;
            }
        }
        Ok(())
    }

    pub fn emotions(&self) -> impl Iterator<Item = DisplayEmotion> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_entry(
    emotion: DisplayEmotion,
    intensity: IntensityLevel,
    params: &VoiceParameters,
) -> Result<(), TableError> {
    if params.rate == 0 {
        return Err(TableError::ZeroRate { emotion, intensity });
    }
    if !(0.0..=1.0).contains(&params.volume) {
        return Err(TableError::VolumeOutOfRange {
            emotion,
            intensity,
            volume: params.volume,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_sentiment_policy() {
        let table = VoiceTable::builtin();
        table
            .ensure_covers(&DisplayEmotion::FROM_SENTIMENT)
            .expect("policy emotions resolve");
    }

    #[test]
    fn resolves_builtin_values() {
        let table = VoiceTable::shared();
        assert_eq!(
            table.resolve(DisplayEmotion::Joy, IntensityLevel::High),
            Ok(VoiceParameters::new(190, 1.0, Pitch::VeryHigh))
        );
        assert_eq!(
            table.resolve(DisplayEmotion::Sadness, IntensityLevel::Medium),
            Ok(VoiceParameters::new(140, 0.7, Pitch::Low))
        );
        assert_eq!(
            table.resolve(DisplayEmotion::Concerned, IntensityLevel::Low),
            Ok(VoiceParameters::new(155, 0.8, Pitch::MediumLow))
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let table = VoiceTable::builtin();
        for emotion in table.emotions().collect::<Vec<_>>() {
            for intensity in IntensityLevel::ALL {
                let first = table.resolve(emotion, intensity).unwrap();
                let second = table.resolve(emotion, intensity).unwrap();
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn emotions_missing_from_table_fail_lookup() {
        let table = VoiceTable::builtin();
        for intensity in IntensityLevel::ALL {
            assert_eq!(
                table.resolve(DisplayEmotion::Fear, intensity),
                Err(LookupError::UnknownEmotion(DisplayEmotion::Fear))
            );
        }
        assert!(table.ensure_covers(&[DisplayEmotion::Disgust]).is_err());
    }

    #[test]
    fn json_table_with_missing_intensity_reports_it() {
        let table = VoiceTable::from_json_str(
            r#"{"joy": {"low": {"rate": 170, "volume": 0.9, "pitch": "medium_high"}}}"#,
        )
        .unwrap();
        assert!(table.resolve(DisplayEmotion::Joy, IntensityLevel::Low).is_ok());
        assert_eq!(
            table.resolve(DisplayEmotion::Joy, IntensityLevel::High),
            Err(LookupError::UnknownIntensity {
                emotion: DisplayEmotion::Joy,
                intensity: IntensityLevel::High,
            })
        );
        let err = table.ensure_covers(&[DisplayEmotion::Joy]).unwrap_err();
        assert!(err.to_string().contains("medium"));
    }

    #[test]
    fn json_table_rejects_bad_entries() {
        let err = VoiceTable::from_json_str(
            r#"{"glee": {"low": {"rate": 170, "volume": 0.9, "pitch": "high"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::UnknownEmotion(label) if label == "glee"));

        let err = VoiceTable::from_json_str(
            r#"{"joy": {"extreme": {"rate": 170, "volume": 0.9, "pitch": "high"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::UnknownIntensity { .. }));

        let err = VoiceTable::from_json_str(
            r#"{"joy": {"low": {"rate": 0, "volume": 0.9, "pitch": "high"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::ZeroRate { .. }));

        let err = VoiceTable::from_json_str(
            r#"{"joy": {"low": {"rate": 120, "volume": 1.5, "pitch": "high"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::VolumeOutOfRange { .. }));

        let err = VoiceTable::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
    }
}
