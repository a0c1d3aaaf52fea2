//! H-class phrase counting
//!
//! Counts occurrences of lexicon phrases in a piece of text:
//! - the whole text is lowercased once, then each phrase is matched with a
//!   non-overlapping, left-to-right substring scan
//! - there are NO word-boundary checks: a phrase occurring inside a longer
//!   word still counts ("we" matches inside "power"). This trades precision
//!   for speed and simplicity; downstream statistics depend on the exact
//!   counting behavior, so it must not be tightened.

use crate::lexicon::{HClass, HClassLexicon};
use serde::{Deserialize, Serialize};

/// Occurrence counts per H-class for one piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HClassCounts {
    pub h1_emotion: u32,
    pub h2_relational: u32,
    pub h3_hedging: u32,
    pub h4_anthro: u32,
    pub h5_softeners: u32,
}

impl HClassCounts {
    /// Count for a single class
    pub fn get(&self, class: HClass) -> u32 {
        match class {
            HClass::Emotion => self.h1_emotion,
            HClass::Relational => self.h2_relational,
            HClass::Hedging => self.h3_hedging,
            HClass::Anthro => self.h4_anthro,
            HClass::Softeners => self.h5_softeners,
        }
    }

    /// Sum of all class counts
    pub fn total(&self) -> u32 {
        self.h1_emotion + self.h2_relational + self.h3_hedging + self.h4_anthro + self.h5_softeners
    }
}

/// Count occurrences of H-class phrases in `text` (case-insensitive).
///
/// Pure and deterministic: any string input is valid, empty text yields
/// all-zero counts. Phrase order within a class is irrelevant to the result
/// since counts are additive, but the scan follows the lexicon's declared
/// order for determinism.
pub fn count_h_tokens(text: &str, lexicon: &HClassLexicon) -> HClassCounts {
    if text.is_empty() {
        return HClassCounts::default();
    }

    let lower = text.to_lowercase();

    let mut counts = HClassCounts::default();
    for (class, phrases) in lexicon.entries() {
        let mut class_count = 0u32;
        for phrase in phrases {
            class_count += count_non_overlapping(&lower, phrase);
        }
        match class {
            HClass::Emotion => counts.h1_emotion = class_count,
            HClass::Relational => counts.h2_relational = class_count,
            HClass::Hedging => counts.h3_hedging = class_count,
            HClass::Anthro => counts.h4_anthro = class_count,
            HClass::Softeners => counts.h5_softeners = class_count,
        }
    }

    counts
}

/// Non-overlapping, left-to-right substring scan.
///
/// After each match the search resumes immediately past the end of that
/// match, so "aa" occurs twice in "aaaa", not three times.
fn count_non_overlapping(haystack: &str, needle: &str) -> u32 {
    // An empty needle would match at every position and never advance
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut start = 0;
    while let Some(idx) = haystack[start..].find(needle) {
        count += 1;
        start += idx + needle.len();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single_class_lexicon(phrases: &[&str]) -> HClassLexicon {
        HClassLexicon::new(
            phrases.iter().map(|p| p.to_string()).collect(),
            vec![],
            vec![],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_empty_text_yields_all_zero() {
        let counts = count_h_tokens("", &HClassLexicon::default());
        assert_eq!(counts, HClassCounts::default());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let lexicon = HClassLexicon::default();
        let text = "I feel worried, but thank you for being here. Maybe it's fine.";
        assert_eq!(count_h_tokens(text, &lexicon), count_h_tokens(text, &lexicon));
    }

    #[test]
    fn test_case_insensitive() {
        let lexicon = single_class_lexicon(&["maybe"]);
        assert_eq!(
            count_h_tokens("MAYBE", &lexicon),
            count_h_tokens("maybe", &lexicon)
        );
        assert_eq!(count_h_tokens("MaYbE so", &lexicon).h1_emotion, 1);
    }

    #[test]
    fn test_non_overlapping_scan() {
        let lexicon = single_class_lexicon(&["aa"]);
        // "aaaa" contains two non-overlapping "aa", not three
        assert_eq!(count_h_tokens("aaaa", &lexicon).h1_emotion, 2);
        assert_eq!(count_h_tokens("aaa", &lexicon).h1_emotion, 1);
    }

    #[test]
    fn test_substring_match_inside_longer_word() {
        // No word-boundary filtering: "we" counts inside "power"
        let lexicon = single_class_lexicon(&["we"]);
        assert_eq!(count_h_tokens("power", &lexicon).h1_emotion, 1);
    }

    #[test]
    fn test_multi_word_phrase() {
        let lexicon = HClassLexicon::default();
        let counts = count_h_tokens("Thank you, I understand.", &lexicon);
        // "thank you" and "i understand" both hit the relational class
        assert_eq!(counts.h2_relational, 2);
    }

    #[test]
    fn test_total_equals_sum_of_classes() {
        let lexicon = HClassLexicon::default();
        let counts = count_h_tokens(
            "I feel really relieved, thank you. Maybe we could be together.",
            &lexicon,
        );
        assert_eq!(
            counts.total(),
            counts.h1_emotion
                + counts.h2_relational
                + counts.h3_hedging
                + counts.h4_anthro
                + counts.h5_softeners
        );
        assert!(counts.total() > 0);
    }

    #[test]
    fn test_phrases_may_overlap_across_classes() {
        // "i feel" (anthro) and "feel" (emotion) both match the same span
        let lexicon = HClassLexicon::default();
        let counts = count_h_tokens("i feel fine", &lexicon);
        assert_eq!(counts.h1_emotion, 1);
        assert_eq!(counts.h4_anthro, 1);
    }

    #[test]
    fn test_empty_phrase_is_skipped() {
        let lexicon = single_class_lexicon(&["", "aa"]);
        assert_eq!(count_h_tokens("aaaa", &lexicon).h1_emotion, 2);
    }

    #[test]
    fn test_counts_are_fresh_per_input() {
        let lexicon = single_class_lexicon(&["we"]);
        assert_eq!(count_h_tokens("we are sweet", &lexicon).h1_emotion, 2);
        assert_eq!(count_h_tokens("", &lexicon).h1_emotion, 0);
    }
}
