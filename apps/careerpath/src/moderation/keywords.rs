//! Keyword vocabularies used by the safety classifier.
//!
//! Matching is plain substring containment on lowercased text, so entries
//! must be chosen with that in mind: "hate" would also hit "whatever" and
//! "kill" would hit every "skills" field.

/// Terms that flag content outright.
const INAPPROPRIATE: &[&str] = &[
    "hateful",
    "hate speech",
    "racist",
    "sexist",
    "harassment",
    "violent threat",
    "obscene",
    "pornographic",
    "nsfw",
    "explicit content",
    "slur",
];

/// Scam and spam markers. Also flag.
const SUSPICIOUS: &[&str] = &[
    "click here",
    "free money",
    "get rich quick",
    "guaranteed income",
    "wire transfer",
    "crypto giveaway",
    "limited time offer",
    "act now",
    "send your password",
    "work from home and earn",
];

/// Casual or dismissive language that only warrants a warning.
const UNPROFESSIONAL: &[&str] = &[
    "lol", "lmao", "rofl", "wtf", "omg", "dude", "whatever", "sucks", "stupid", "idk",
];

/// The three vocabularies the classifier checks. Stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSets {
    pub inappropriate: Vec<String>,
    pub suspicious: Vec<String>,
    pub unprofessional: Vec<String>,
}

impl KeywordSets {
    pub fn new<I, S>(inappropriate: I, suspicious: I, unprofessional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        fn lower<I: IntoIterator<Item = S>, S: AsRef<str>>(words: I) -> Vec<String> {
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        }
        Self {
            inappropriate: lower(inappropriate),
            suspicious: lower(suspicious),
            unprofessional: lower(unprofessional),
        }
    }
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self::new(
            INAPPROPRIATE.iter().copied(),
            SUSPICIOUS.iter().copied(),
            UNPROFESSIONAL.iter().copied(),
        )
    }
}

/// Every keyword from `words` that occurs in `text` (already lowercased).
pub(crate) fn find_matches(text: &str, words: &[String]) -> Vec<String> {
    words
        .iter()
        .filter(|w| text.contains(w.as_str()))
        .cloned()
        .collect()
}
