use crate::emotion::IntensityLevel;

// Checked in this order; the first list with a hit wins. "!" is deliberately
// not a high marker here, unlike the usual marker set: exclamation marks are
// left to the count below so a single "!" stays medium.
const MARKERS: [(IntensityLevel, &[&str]); 3] = [
    (
        IntensityLevel::High,
        &["extremely", "very", "super", "absolutely", "completely"],
    ),
    (IntensityLevel::Medium, &["quite", "rather", "pretty", "somewhat"]),
    (IntensityLevel::Low, &["slightly", "a bit", "kind of", "sort of"]),
];

/// Estimates how strongly an emotion is expressed.
///
/// Markers are plain substring matches on the lower-cased text, so "every"
/// counts as "very". Without a marker the number of `!` decides.
pub fn estimate_intensity(text: &str) -> IntensityLevel {
    let lower = text.to_lowercase();

    for (level, markers) in MARKERS {
        if markers.iter().any(|m| lower.contains(m)) {
            return level;
        }
    }

    match text.matches('!').count() {
        0 => IntensityLevel::Low,
        1 => IntensityLevel::Medium,
        _ => IntensityLevel::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_markers_are_checked_before_low_markers() {
        assert_eq!(estimate_intensity("slightly very happy"), IntensityLevel::High);
        assert_eq!(estimate_intensity("quite a bit tired"), IntensityLevel::Medium);
    }

    #[test]
    fn each_marker_list_matches() {
        assert_eq!(estimate_intensity("That was EXTREMELY loud"), IntensityLevel::High);
        assert_eq!(estimate_intensity("rather nice"), IntensityLevel::Medium);
        assert_eq!(estimate_intensity("I'm sort of sad"), IntensityLevel::Low);
    }

    #[test]
    fn word_markers_win_over_exclamations() {
        assert_eq!(estimate_intensity("slightly annoyed!!"), IntensityLevel::Low);
        assert_eq!(estimate_intensity("pretty good!!!"), IntensityLevel::Medium);
    }

    #[test]
    fn markers_match_inside_words() {
        assert_eq!(estimate_intensity("everyone came"), IntensityLevel::High);
        assert_eq!(estimate_intensity("a bitter taste"), IntensityLevel::Low);
    }

    #[test]
    fn exclamation_fallback() {
        assert_eq!(estimate_intensity("ok"), IntensityLevel::Low);
        assert_eq!(estimate_intensity("ok!"), IntensityLevel::Medium);
        assert_eq!(estimate_intensity("ok!!"), IntensityLevel::High);
        assert_eq!(estimate_intensity("I am SO happy!!"), IntensityLevel::High);
        assert_eq!(estimate_intensity("ok."), IntensityLevel::Low);
        assert_eq!(estimate_intensity(""), IntensityLevel::Low);
    }
}
