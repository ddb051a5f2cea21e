//! Safety classifier: keyword and formatting heuristics over a content item's
//! text fields, reduced to a tri-state verdict.
//!
//! Verdict rule, in priority order:
//! 1. any inappropriate or suspicious keyword → `Flagged`
//! 2. unprofessional keyword, shouting, `!!`/`??` runs, or under 10
//!    characters of text → `Warning`
//! 3. otherwise → `Safe`

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::content::ContentItem;
use crate::moderation::keywords::{find_matches, KeywordSets};

/// Text fields concatenated for analysis, in this order.
pub const TEXT_FIELDS: &[&str] = &[
    "title",
    "name",
    "description",
    "content",
    "message",
    "question",
    "answer",
    "skills",
    "technologies",
    "bio",
    "details",
];

const MIN_TEXT_LEN: usize = 10;
const CAPS_MIN_LEN: usize = 10;
const CAPS_RATIO: f64 = 0.3;

static REPEATED_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!?]{2,}").expect("valid punctuation regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyVerdict {
    Safe,
    Warning,
    Flagged,
}

/// Everything the classifier noticed, plus the verdict derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub verdict: SafetyVerdict,
    pub inappropriate: Vec<String>,
    pub suspicious: Vec<String>,
    pub unprofessional: Vec<String>,
    pub excessive_caps: bool,
    pub excessive_punctuation: bool,
    pub too_short: bool,
}

impl SafetyReport {
    fn clean() -> Self {
        Self {
            verdict: SafetyVerdict::Safe,
            inappropriate: vec![],
            suspicious: vec![],
            unprofessional: vec![],
            excessive_caps: false,
            excessive_punctuation: false,
            too_short: false,
        }
    }

    fn derive_verdict(&self) -> SafetyVerdict {
        if !self.inappropriate.is_empty() || !self.suspicious.is_empty() {
            SafetyVerdict::Flagged
        } else if !self.unprofessional.is_empty()
            || self.excessive_caps
            || self.excessive_punctuation
            || self.too_short
        {
            SafetyVerdict::Warning
        } else {
            SafetyVerdict::Safe
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub keywords: KeywordSets,
    pub text_fields: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordSets::default(),
            text_fields: TEXT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SafetyClassifier {
    config: ClassifierConfig,
}

impl SafetyClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn with_keywords(keywords: KeywordSets) -> Self {
        Self::new(ClassifierConfig {
            keywords,
            ..ClassifierConfig::default()
        })
    }

    /// Non-empty recognised fields joined by a single space, original case.
    pub fn analysis_text(&self, item: &ContentItem) -> String {
        self.config
            .text_fields
            .iter()
            .filter_map(|f| item.text(f))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn analyze(&self, item: Option<&ContentItem>) -> SafetyReport {
        let Some(item) = item else {
            return SafetyReport::clean();
        };

        let original = self.analysis_text(item);
        let text = original.to_lowercase();
        let keywords = &self.config.keywords;

        let mut report = SafetyReport {
            inappropriate: find_matches(&text, &keywords.inappropriate),
            suspicious: find_matches(&text, &keywords.suspicious),
            unprofessional: find_matches(&text, &keywords.unprofessional),
            excessive_caps: has_excessive_caps(&original),
            excessive_punctuation: REPEATED_PUNCTUATION.is_match(&text),
            too_short: text.trim().chars().count() < MIN_TEXT_LEN,
            ..SafetyReport::clean()
        };
        report.verdict = report.derive_verdict();
        report
    }

    pub fn classify(&self, item: Option<&ContentItem>) -> SafetyVerdict {
        self.analyze(item).verdict
    }
}

/// Uppercase letters make up more than 30% of all characters in text longer
/// than 10 characters.
fn has_excessive_caps(text: &str) -> bool {
    let total = text.chars().count();
    if total <= CAPS_MIN_LEN {
        return false;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f64 / total as f64 > CAPS_RATIO
}
