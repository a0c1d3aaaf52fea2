//! H-class lexicon
//!
//! Five fixed lexical categories ("H-classes") of trigger phrases used to
//! bucket humanistic / ambiguity-edging language:
//! - H1 emotion, H2 relational, H3 hedging, H4 anthropomorphic
//!   self-reference, H5 softeners
//!
//! The lexicon is plain data: lowercase phrase lists, possibly multi-word,
//! immutable after construction. Matching is case-insensitive with no
//! stemming or lemmatization.

use serde::{Deserialize, Serialize};

/// One of the five fixed H-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HClass {
    Emotion,
    Relational,
    Hedging,
    Anthro,
    Softeners,
}

impl HClass {
    /// All classes in declared (column) order
    pub const ALL: [HClass; 5] = [
        HClass::Emotion,
        HClass::Relational,
        HClass::Hedging,
        HClass::Anthro,
        HClass::Softeners,
    ];

    /// Canonical column name for this class
    pub fn as_str(&self) -> &'static str {
        match self {
            HClass::Emotion => "h1_emotion",
            HClass::Relational => "h2_relational",
            HClass::Hedging => "h3_hedging",
            HClass::Anthro => "h4_anthro",
            HClass::Softeners => "h5_softeners",
        }
    }
}

/// Lexicon mapping each H-class to an ordered list of lowercase phrases.
///
/// Phrases may contain spaces (multi-word phrases) and need not be disjoint
/// across classes. The value is immutable after construction; the default
/// instance ships the hand-curated phrase lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HClassLexicon {
    emotion: Vec<String>,
    relational: Vec<String>,
    hedging: Vec<String>,
    anthro: Vec<String>,
    softeners: Vec<String>,
}

impl HClassLexicon {
    /// Build a lexicon from explicit phrase lists, one per class.
    ///
    /// Callers are expected to supply lowercase phrases; the counter
    /// lowercases input text, not the lexicon.
    pub fn new(
        emotion: Vec<String>,
        relational: Vec<String>,
        hedging: Vec<String>,
        anthro: Vec<String>,
        softeners: Vec<String>,
    ) -> Self {
        Self {
            emotion,
            relational,
            hedging,
            anthro,
            softeners,
        }
    }

    /// Phrases for a single class, in declared order
    pub fn phrases(&self, class: HClass) -> &[String] {
        match class {
            HClass::Emotion => &self.emotion,
            HClass::Relational => &self.relational,
            HClass::Hedging => &self.hedging,
            HClass::Anthro => &self.anthro,
            HClass::Softeners => &self.softeners,
        }
    }

    /// Iterate `(class, phrases)` pairs in stable class order
    pub fn entries(&self) -> impl Iterator<Item = (HClass, &[String])> + '_ {
        HClass::ALL.iter().map(move |&c| (c, self.phrases(c)))
    }

    /// Total number of phrases across all classes
    pub fn phrase_count(&self) -> usize {
        HClass::ALL.iter().map(|&c| self.phrases(c).len()).sum()
    }
}

fn to_strings(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

impl Default for HClassLexicon {
    fn default() -> Self {
        Self::new(
            to_strings(&[
                "feel",
                "feeling",
                "afraid",
                "scared",
                "worried",
                "anxious",
                "relief",
                "comfort",
                "hurt",
                "desire",
                "hope",
                "frustrated",
                "upset",
                "excited",
                "sad",
                "angry",
            ]),
            to_strings(&[
                "thank you",
                "thanks",
                "appreciate",
                "i understand",
                "i get it",
                "i'm here",
                "i am here",
                "we",
                "together",
                "support",
                // Corpus text carries both apostrophe spellings
                "you\u{2019}re right",
                "you're right",
            ]),
            to_strings(&[
                "maybe",
                "perhaps",
                "might",
                "could be",
                "seems",
                "appears",
                "kind of",
                "sort of",
                "a bit",
                "somewhat",
                "feels like",
                "i think",
            ]),
            to_strings(&[
                "i feel",
                "i believe",
                "i worry",
                "i imagine",
                "i experience",
            ]),
            to_strings(&["just", "only", "really", "honestly"]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_order_is_stable() {
        let names: Vec<&str> = HClass::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "h1_emotion",
                "h2_relational",
                "h3_hedging",
                "h4_anthro",
                "h5_softeners"
            ]
        );
    }

    #[test]
    fn test_default_lexicon_has_all_classes() {
        let lexicon = HClassLexicon::default();
        for (_, phrases) in lexicon.entries() {
            assert!(!phrases.is_empty());
        }
        assert_eq!(lexicon.phrases(HClass::Softeners).len(), 4);
        assert_eq!(lexicon.phrase_count(), 49);
    }

    #[test]
    fn test_default_phrases_are_lowercase() {
        let lexicon = HClassLexicon::default();
        for (_, phrases) in lexicon.entries() {
            for phrase in phrases {
                assert_eq!(phrase, &phrase.to_lowercase());
            }
        }
    }

    #[test]
    fn test_multi_word_phrases_present() {
        let lexicon = HClassLexicon::default();
        assert!(lexicon
            .phrases(HClass::Relational)
            .iter()
            .any(|p| p == "thank you"));
        assert!(lexicon
            .phrases(HClass::Hedging)
            .iter()
            .any(|p| p == "could be"));
    }
}
