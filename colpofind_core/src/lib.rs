// src/lib.rs
pub mod collect;
pub mod connectors;
pub mod dedup;
pub mod error;
pub mod links;
pub mod output;
pub mod pipeline;
pub mod profiles;
pub mod record;
pub mod relevance;
pub mod similarity;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConnectorError;
use crate::profiles::SearchProfile;
use async_trait::async_trait;

pub use crate::collect::{CollectionReport, Collector, SourceBatch, SourceError};
pub use crate::dedup::{DedupConfig, DuplicateResolver};
pub use crate::links::{merge_links, LinkMap};
pub use crate::pipeline::AggregationPipeline;
pub use crate::record::{CandidateRecord, RecordMetadata, ResolvedRecord, ScoredRecord, SourceKind};
pub use crate::relevance::{KeywordWeight, RelevanceClassifier, RelevanceScorer, Vocabulary};
pub use crate::similarity::similarity;

/// Per-call knobs a source receives alongside the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum results for sources with a result-count parameter
    pub limit: u32,
    /// Result pages to walk for paginated scrapers
    pub pages: u32,
    /// Overrides the source's own delay between upstream requests
    pub request_delay: Option<Duration>,
}

impl SearchParams {
    pub fn from_profile(profile: &SearchProfile) -> Self {
        Self {
            limit: profile.limit,
            pages: profile.scholar_pages,
            request_delay: profile.request_delay_ms.map(Duration::from_millis),
        }
    }

    /// The configured delay, or the source's default.
    pub fn delay_or(&self, default: Duration) -> Duration {
        self.request_delay.unwrap_or(default)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from_profile(&SearchProfile::default())
    }
}

/// A literature source adapter.
///
/// Adapters fetch and parse upstream hits into [`CandidateRecord`]s. They do
/// not filter for relevance or score; that belongs to the pipeline.
#[async_trait]
pub trait Source: Send + Sync {
    /// Unique source name used in profiles (e.g. "pubmed").
    fn name(&self) -> &'static str;

    /// Provenance tag stamped on every record from this source.
    fn kind(&self) -> SourceKind;

    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<CandidateRecord>, ConnectorError>;
}

#[derive(Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn Source>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.insert(source.name().to_string(), source);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Source>> {
        self.sources.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Build a registry holding only the sources enabled via Cargo features.
pub fn build_registry_enabled_only() -> Result<SourceRegistry, ConnectorError> {
    #[allow(unused_mut)]
    let mut registry = SourceRegistry::new();

    #[cfg(feature = "google-scholar")]
    {
        let source = connectors::google_scholar::GoogleScholarSource::new()?;
        registry.register(Arc::new(source));
    }

    #[cfg(feature = "pubmed")]
    {
        let source = connectors::pubmed::PubMedSource::new()?;
        registry.register(Arc::new(source));
    }

    #[cfg(feature = "arxiv")]
    {
        let source = connectors::arxiv::ArxivSource::new()?;
        registry.register(Arc::new(source));
    }

    Ok(registry)
}
