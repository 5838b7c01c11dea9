use crate::emotion::DisplayEmotion;
use crate::voice::{Pitch, VoiceParameters};

const NEUTRAL: VoiceParameters = VoiceParameters::new(150, 0.8, Pitch::Medium);

/// Intensity-independent voice settings for callers that only want a base
/// voice per emotion. Unlike [`crate::voice::VoiceTable`], anything it does
/// not know falls back to the neutral entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseVoiceTable;

impl BaseVoiceTable {
    pub const EMOTIONS: [DisplayEmotion; 7] = [
        DisplayEmotion::Joy,
        DisplayEmotion::Surprise,
        DisplayEmotion::Neutral,
        DisplayEmotion::Sadness,
        DisplayEmotion::Anger,
        DisplayEmotion::Fear,
        DisplayEmotion::Disgust,
    ];

    pub fn get(&self, emotion: DisplayEmotion) -> VoiceParameters {
        match emotion {
            DisplayEmotion::Joy => VoiceParameters::new(200, 1.0, Pitch::High),
            DisplayEmotion::Surprise => VoiceParameters::new(180, 0.9, Pitch::High),
            DisplayEmotion::Sadness => VoiceParameters::new(120, 0.7, Pitch::Low),
            DisplayEmotion::Anger => VoiceParameters::new(170, 0.95, Pitch::Low),
            DisplayEmotion::Fear => VoiceParameters::new(140, 0.75, Pitch::Medium),
            DisplayEmotion::Disgust => VoiceParameters::new(130, 0.7, Pitch::Low),
            DisplayEmotion::Neutral | DisplayEmotion::Inquisitive | DisplayEmotion::Concerned => {
                NEUTRAL
            }
        }
    }

    /// Looks up a free-form label, defaulting to neutral when unrecognized.
    pub fn get_label(&self, label: &str) -> VoiceParameters {
        label
            .parse::<DisplayEmotion>()
            .map(|emotion| self.get(emotion))
            .unwrap_or(NEUTRAL)
    }

    pub fn neutral(&self) -> VoiceParameters {
        NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_emotions_have_their_own_entry() {
        let table = BaseVoiceTable;
        assert_eq!(table.get(DisplayEmotion::Joy), VoiceParameters::new(200, 1.0, Pitch::High));
        assert_eq!(
            table.get(DisplayEmotion::Anger),
            VoiceParameters::new(170, 0.95, Pitch::Low)
        );
        assert_eq!(table.get(DisplayEmotion::Neutral), table.neutral());
    }

    #[test]
    fn unrecognized_emotions_default_to_neutral() {
        let table = BaseVoiceTable;
        assert_eq!(table.get_label("bewildered"), table.neutral());
        assert_eq!(table.get_label(""), table.neutral());
        assert_eq!(table.get(DisplayEmotion::Inquisitive), table.neutral());
        assert_eq!(table.get_label("Sadness"), table.get(DisplayEmotion::Sadness));
    }
}
