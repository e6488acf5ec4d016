//! Collection of candidate batches from sources.
//!
//! Runs every profile source concurrently for each query and turns failures
//! and timeouts into empty batches, so the pipeline only ever sees records.

use crate::error::ConnectorError;
use crate::profiles::SearchProfile;
use crate::record::CandidateRecord;
use crate::{SearchParams, Source, SourceRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

/// Records returned by one source for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBatch {
    pub source: String,
    pub query: String,
    pub records: Vec<CandidateRecord>,

    /// Time taken to fetch the batch (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// A source that failed or timed out for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    pub query: String,
    pub error: String,
    #[serde(default)]
    pub is_timeout: bool,
}

/// Everything collected for a profile, in query-then-source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionReport {
    pub batches: Vec<SourceBatch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SourceError>,

    /// Sources named by the profile but not registered
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_sources: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl CollectionReport {
    pub fn candidate_count(&self) -> usize {
        self.batches.iter().map(|b| b.records.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record batches in collection order, ready for the pipeline.
    pub fn into_batches(self) -> impl Iterator<Item = Vec<CandidateRecord>> {
        self.batches.into_iter().map(|b| b.records)
    }
}

/// Drives the sources of a profile.
pub struct Collector<'a> {
    registry: &'a SourceRegistry,
}

impl<'a> Collector<'a> {
    pub fn new(registry: &'a SourceRegistry) -> Self {
        Self { registry }
    }

    /// Collect candidates for every expanded profile query.
    pub async fn collect(&self, profile: &SearchProfile) -> CollectionReport {
        let start = Instant::now();
        let mut report = CollectionReport::default();

        let mut sources: Vec<(String, Arc<dyn Source>)> = Vec::new();
        for name in &profile.sources {
            match self.registry.get(name) {
                Some(source) => sources.push((name.clone(), Arc::clone(source))),
                None => {
                    warn!("source '{}' is not available in this build", name);
                    report.missing_sources.push(name.clone());
                }
            }
        }

        let params = SearchParams::from_profile(profile);
        let timeout_ms = profile.timeout_ms;

        for query in profile.expanded_queries() {
            info!("Searching for: {}", query);

            let futures: Vec<_> = sources
                .iter()
                .map(|(name, source)| {
                    let name = name.clone();
                    let source = Arc::clone(source);
                    let query = query.clone();
                    let params = params.clone();

                    async move {
                        let started = Instant::now();
                        let outcome = match timeout(
                            Duration::from_millis(timeout_ms),
                            source.search(&query, &params),
                        )
                        .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(ConnectorError::Timeout(format!(
                                "{} timed out after {}ms",
                                name, timeout_ms
                            ))),
                        };
                        (name, query, outcome, started.elapsed().as_millis() as u64)
                    }
                })
                .collect();

            for (source, query, outcome, elapsed) in futures::future::join_all(futures).await {
                let records = match outcome {
                    Ok(records) => {
                        info!("Found {} papers from {}", records.len(), source);
                        records
                    }
                    Err(e) => {
                        warn!(code = e.code_str(), "{} failed for '{}': {}", source, query, e);
                        report.errors.push(SourceError {
                            source: source.clone(),
                            query: query.clone(),
                            is_timeout: matches!(e, ConnectorError::Timeout(_)),
                            error: e.to_string(),
                        });
                        Vec::new()
                    }
                };
                report.batches.push(SourceBatch {
                    source,
                    query,
                    records,
                    duration_ms: Some(elapsed),
                });
            }
        }

        report.duration_ms = Some(start.elapsed().as_millis() as u64);
        report
    }
}
