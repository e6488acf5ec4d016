//! Aggregation pipeline: filter, score, deduplicate, rank.
//!
//! The pipeline is synchronous and owns no shared mutable state. Each call to
//! [`AggregationPipeline::run`] is a pure function of its input batches and
//! the vocabulary captured at construction.

use crate::dedup::DuplicateResolver;
use crate::error::ConfigError;
use crate::profiles::SearchProfile;
use crate::record::{CandidateRecord, ResolvedRecord, ScoredRecord};
use crate::relevance::{RelevanceClassifier, RelevanceScorer};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct AggregationPipeline {
    classifier: RelevanceClassifier,
    scorer: RelevanceScorer,
    resolver: DuplicateResolver,
}

impl AggregationPipeline {
    pub fn new(
        classifier: RelevanceClassifier,
        scorer: RelevanceScorer,
        resolver: DuplicateResolver,
    ) -> Self {
        Self {
            classifier,
            scorer,
            resolver,
        }
    }

    /// Build a pipeline from a profile's vocabulary and dedup settings.
    pub fn from_profile(profile: &SearchProfile) -> Result<Self, ConfigError> {
        profile.validate()?;
        Ok(Self::new(
            RelevanceClassifier::from_vocabulary(&profile.vocabulary),
            RelevanceScorer::from_vocabulary(&profile.vocabulary)?,
            DuplicateResolver::from_config(&profile.dedup)?,
        ))
    }

    pub fn classifier(&self) -> &RelevanceClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Keep a record if its title or its summary is on topic, and score it.
    pub fn admit(&self, record: CandidateRecord) -> Option<ScoredRecord> {
        let relevant = self.classifier.is_relevant(&record.title)
            || self.classifier.is_relevant(&record.summary_text);
        if !relevant {
            return None;
        }
        let score = self.scorer.score(&record.title, &record.summary_text);
        Some(ScoredRecord::new(record, score))
    }

    /// Run the whole pipeline over batches of candidates.
    ///
    /// Records are visited batch by batch, in order. The result is sorted by
    /// relevance score, highest first; equal scores keep the resolver's
    /// cluster order.
    pub fn run<B, I>(&self, batches: B) -> Vec<ResolvedRecord>
    where
        B: IntoIterator<Item = I>,
        I: IntoIterator<Item = CandidateRecord>,
    {
        let mut seen = 0usize;
        let scored: Vec<ScoredRecord> = batches
            .into_iter()
            .flatten()
            .inspect(|_| seen += 1)
            .filter_map(|record| self.admit(record))
            .collect();
        debug!("{} of {} candidates passed the relevance filter", scored.len(), seen);

        let mut resolved = self.resolver.resolve(scored);
        resolved.sort_by(|a, b| b.relevance_score().cmp(&a.relevance_score()));
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceKind;
    use crate::relevance::{KeywordWeight, Vocabulary};

    fn candidate(title: &str, summary: &str) -> CandidateRecord {
        CandidateRecord::new(SourceKind::Other, title).with_summary(summary)
    }

    #[test]
    fn test_admit_title_or_summary() {
        let pipeline = AggregationPipeline::default();
        assert!(pipeline.admit(candidate("Colposcopy atlas", "")).is_some());
        assert!(pipeline
            .admit(candidate("Image atlas", "acetowhite lesions of the cervix"))
            .is_some());
        assert!(pipeline.admit(candidate("Image atlas", "retina")).is_none());
    }

    #[test]
    fn test_admit_scores_title_and_summary() {
        let pipeline = AggregationPipeline::default();
        let scored = pipeline.admit(candidate("HPV", "cervical screening")).unwrap();
        // hpv 2 + cervical 2 + screening 1
        assert_eq!(scored.relevance_score, 5);
    }

    #[test]
    fn test_run_empty_batches() {
        let pipeline = AggregationPipeline::default();
        let empty: Vec<Vec<CandidateRecord>> = vec![vec![]];
        assert!(pipeline.run(empty).is_empty());
        assert!(pipeline.run(Vec::<Vec<CandidateRecord>>::new()).is_empty());
    }

    #[test]
    fn test_run_sorts_descending_and_stable() {
        let pipeline = AggregationPipeline::default();
        let batches = vec![
            vec![
                candidate("cervical notes", ""),  // 2
                candidate("hpv primer", ""),      // 2
            ],
            vec![
                candidate("cervical cancer colposcopy", ""), // 3 + 2 + 3
                candidate("unrelated", "nothing here"),
            ],
        ];

        let out = pipeline.run(batches);
        let titles: Vec<&str> = out.iter().map(|r| r.title()).collect();
        assert_eq!(
            titles,
            vec!["cervical cancer colposcopy", "cervical notes", "hpv primer"]
        );
        assert_eq!(out[0].relevance_score(), 8);
    }

    #[test]
    fn test_from_profile_uses_custom_vocabulary() {
        let mut profile = SearchProfile::default();
        profile.vocabulary = Vocabulary {
            relevant_terms: vec!["retina".to_string()],
            keywords: vec![KeywordWeight::new("retina", 7)],
        };
        let pipeline = AggregationPipeline::from_profile(&profile).unwrap();

        let out = pipeline.run(vec![vec![
            candidate("Retina scans", ""),
            candidate("Cervical cancer", ""),
        ]]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relevance_score(), 7);
    }
}
