//! Topical relevance: a permissive substring filter and a weighted keyword score.
//!
//! Both are built from an immutable [`Vocabulary`] and hold no shared state,
//! so pipelines with different vocabularies can run side by side.

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Terms used by the relevance filter when no profile overrides them.
pub const DEFAULT_RELEVANT_TERMS: &[&str] = &[
    "cervical cancer",
    "cervix",
    "cervical",
    "colposcopy",
    "pap smear",
    "hpv",
    "human papillomavirus",
    "cin",
    "cervical intraepithelial neoplasia",
    "precancerous lesions",
    "cervical screening",
    "who colposcopy",
    "iarc colposcopy",
];

/// Keyword weights used for scoring when no profile overrides them.
///
/// Specific dataset names weigh the most, generic single words the least.
pub const DEFAULT_KEYWORD_WEIGHTS: &[(&str, u32)] = &[
    ("iarc colposcopy database", 5),
    ("who colposcopy", 5),
    ("iarcimagebankolpo", 5),
    ("colposcopy image", 4),
    ("cervical cancer", 3),
    ("colposcopy", 3),
    ("cervical", 2),
    ("hpv", 2),
    ("screening", 1),
    ("dataset", 1),
];

/// A scoring keyword and its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keyword: String,
    pub weight: u32,
}

impl KeywordWeight {
    pub fn new(keyword: impl Into<String>, weight: u32) -> Self {
        Self {
            keyword: keyword.into(),
            weight,
        }
    }
}

/// Domain vocabulary for filtering and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_relevant_terms")]
    pub relevant_terms: Vec<String>,

    /// Scoring keywords, iterated in this order
    #[serde(default = "default_keywords")]
    pub keywords: Vec<KeywordWeight>,
}

fn default_relevant_terms() -> Vec<String> {
    DEFAULT_RELEVANT_TERMS.iter().map(|t| t.to_string()).collect()
}

fn default_keywords() -> Vec<KeywordWeight> {
    DEFAULT_KEYWORD_WEIGHTS
        .iter()
        .map(|(k, w)| KeywordWeight::new(*k, *w))
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            relevant_terms: default_relevant_terms(),
            keywords: default_keywords(),
        }
    }
}

impl Vocabulary {
    /// Reject empty lists and blank entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relevant_terms.is_empty() {
            return Err(ConfigError::InvalidVocabulary(
                "relevant_terms must not be empty".to_string(),
            ));
        }
        if self.keywords.is_empty() {
            return Err(ConfigError::InvalidVocabulary(
                "keywords must not be empty".to_string(),
            ));
        }
        if self.relevant_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidVocabulary(
                "relevant_terms contains a blank term".to_string(),
            ));
        }
        if let Some(blank) = self.keywords.iter().find(|k| k.keyword.trim().is_empty()) {
            return Err(ConfigError::InvalidKeyword {
                keyword: blank.keyword.clone(),
                reason: "keyword is blank".to_string(),
            });
        }
        Ok(())
    }
}

/// Case-insensitive substring filter over a fixed term list.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    terms: Vec<String>,
}

impl RelevanceClassifier {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        Self::new(&vocabulary.relevant_terms)
    }

    /// True iff some term occurs as a substring of the lower-cased text.
    pub fn is_relevant(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }
}

impl Default for RelevanceClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RELEVANT_TERMS)
    }
}

#[derive(Debug, Clone)]
struct CompiledKeyword {
    weight: u32,
    pattern: Regex,
}

/// Weighted keyword-frequency score over title and abstract.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<CompiledKeyword>,
}

impl RelevanceScorer {
    pub fn new(keywords: &[KeywordWeight]) -> Result<Self, ConfigError> {
        let keywords = keywords
            .iter()
            .map(|k| {
                let source = format!(r"\b{}\b", regex::escape(&k.keyword.to_lowercase()));
                Regex::new(&source)
                    .map(|pattern| CompiledKeyword {
                        weight: k.weight,
                        pattern,
                    })
                    .map_err(|e| ConfigError::InvalidKeyword {
                        keyword: k.keyword.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keywords })
    }

    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Result<Self, ConfigError> {
        Self::new(&vocabulary.keywords)
    }

    /// Sum over keywords of `weight * whole-word occurrences` in
    /// `"{title} {abstract}"`, lower-cased. Saturates at `u32::MAX`.
    pub fn score(&self, title: &str, abstract_text: &str) -> u32 {
        let text = format!("{} {}", title, abstract_text).to_lowercase();
        self.keywords.iter().fold(0u32, |total, k| {
            let hits = u32::try_from(k.pattern.find_iter(&text).count()).unwrap_or(u32::MAX);
            total.saturating_add(k.weight.saturating_mul(hits))
        })
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        // Escaped literal patterns always compile.
        Self::from_vocabulary(&Vocabulary::default())
            .unwrap_or(Self { keywords: Vec::new() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        let classifier = RelevanceClassifier::default();
        assert!(!classifier.is_relevant("unrelated text"));
        assert!(classifier.is_relevant("Patient screened for cervical cancer"));
        assert!(classifier.is_relevant("HPV VACCINATION UPTAKE"));
    }

    #[test]
    fn test_is_relevant_is_substring_based() {
        let classifier = RelevanceClassifier::default();
        // "cin" hides inside "medicine"
        assert!(classifier.is_relevant("Advances in medicine"));
    }

    #[test]
    fn test_empty_text_is_not_relevant() {
        let classifier = RelevanceClassifier::default();
        assert!(!classifier.is_relevant(""));
    }

    #[test]
    fn test_custom_terms() {
        let classifier = RelevanceClassifier::new(["Retina"]);
        assert!(classifier.is_relevant("retinal imaging"));
        assert!(!classifier.is_relevant("cervical cancer"));
    }

    #[test]
    fn test_score_weighted_sum() {
        let scorer = RelevanceScorer::default();
        // cervical cancer 3 + cervical 2 + screening 1
        assert_eq!(scorer.score("Cervical cancer screening", ""), 6);
        // colposcopy image 4 + colposcopy 3 + dataset 1
        assert_eq!(scorer.score("colposcopy image dataset", ""), 8);
    }

    #[test]
    fn test_score_counts_every_occurrence() {
        let scorer = RelevanceScorer::default();
        assert_eq!(scorer.score("HPV", "hpv and HPV"), 6);
    }

    #[test]
    fn test_score_respects_word_boundaries() {
        let scorer = RelevanceScorer::default();
        assert_eq!(scorer.score("cervicalgia", "datasets of hpvx"), 0);
    }

    #[test]
    fn test_score_joins_title_and_abstract_with_space() {
        let scorer = RelevanceScorer::new(&[KeywordWeight::new("cervical cancer", 3)]).unwrap();
        assert_eq!(scorer.score("cervical", "cancer"), 3);
    }

    #[test]
    fn test_score_saturates_on_huge_weights() {
        let scorer = RelevanceScorer::new(&[KeywordWeight::new("hpv", 3_000_000_000)]).unwrap();
        assert_eq!(scorer.score("hpv hpv", ""), u32::MAX);

        let scorer = RelevanceScorer::new(&[
            KeywordWeight::new("hpv", u32::MAX),
            KeywordWeight::new("cervical", 5),
        ])
        .unwrap();
        assert_eq!(scorer.score("hpv", "cervical"), u32::MAX);
    }

    #[test]
    fn test_specificity_monotonicity() {
        let scorer = RelevanceScorer::default();
        assert!(scorer.score("colposcopy image dataset", "") >= scorer.score("dataset", ""));
    }

    #[test]
    fn test_vocabulary_validate() {
        assert!(Vocabulary::default().validate().is_ok());

        let mut vocab = Vocabulary::default();
        vocab.relevant_terms.clear();
        assert!(vocab.validate().is_err());

        let mut vocab = Vocabulary::default();
        vocab.keywords.push(KeywordWeight::new("  ", 2));
        assert!(matches!(
            vocab.validate(),
            Err(ConfigError::InvalidKeyword { .. })
        ));
    }
}
