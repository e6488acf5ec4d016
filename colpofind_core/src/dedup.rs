//! Duplicate resolution: exact-title collapse followed by anchor-only fuzzy clustering.

use crate::error::ConfigError;
use crate::links::merge_links;
use crate::record::{ResolvedRecord, ScoredRecord};
use crate::similarity::similarity;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info};

/// Titles scoring strictly above this are treated as the same paper.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Configuration for duplicate resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Fuzzy-match threshold in [0, 1] (default: 0.85, compared with `>`)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl DedupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold(self.similarity_threshold));
        }
        Ok(())
    }
}

/// Merges candidate records that describe the same paper.
#[derive(Debug, Clone)]
pub struct DuplicateResolver {
    threshold: f64,
}

impl Default for DuplicateResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl DuplicateResolver {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &DedupConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.similarity_threshold))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolve duplicates, one output record per cluster in cluster-creation order.
    ///
    /// `duplicate_count` on each output is the number of input records folded
    /// into it across both passes.
    pub fn resolve(&self, records: Vec<ScoredRecord>) -> Vec<ResolvedRecord> {
        let input_len = records.len();
        let singles = records
            .into_iter()
            .map(|scored| ResolvedRecord {
                scored,
                duplicate_count: 1,
            })
            .collect();
        let resolved = self.cluster_fuzzy(collapse_exact(singles));

        info!(
            "After duplicate detection: {} papers -> {} unique papers",
            input_len,
            resolved.len()
        );
        resolved
    }

    /// Pass 2. Each unassigned record anchors a cluster and absorbs every later
    /// unassigned record whose title is similar to the anchor's. Members are
    /// never compared with each other.
    fn cluster_fuzzy(&self, representatives: Vec<ResolvedRecord>) -> Vec<ResolvedRecord> {
        let n = representatives.len();
        let mut assigned = vec![false; n];
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for i in 0..n {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let mut cluster = vec![i];
            let anchor = representatives[i].title();

            for j in (i + 1)..n {
                if assigned[j] {
                    continue;
                }
                if similarity(anchor, representatives[j].title()) > self.threshold {
                    cluster.push(j);
                    assigned[j] = true;
                }
            }
            clusters.push(cluster);
        }

        let mut slots: Vec<Option<ResolvedRecord>> = representatives.into_iter().map(Some).collect();
        clusters
            .into_iter()
            .map(|cluster| {
                let members: Vec<ResolvedRecord> = cluster
                    .into_iter()
                    .filter_map(|idx| slots[idx].take())
                    .collect();
                if members.len() > 1 {
                    info!(
                        "Found {} similar papers: '{}...'",
                        members.len(),
                        members[0].title().chars().take(50).collect::<String>()
                    );
                }
                merge_members(members)
            })
            .collect()
    }
}

/// Pass 1. Group by trimmed, lower-cased title and merge each group, keeping
/// groups in first-seen order.
fn collapse_exact(records: Vec<ResolvedRecord>) -> Vec<ResolvedRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<ResolvedRecord>> = Vec::new();

    for record in records {
        match positions.entry(record.scored.record.title_key()) {
            Entry::Occupied(slot) => groups[*slot.get()].push(record),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(vec![record]);
            }
        }
    }

    debug!("exact-title pass produced {} groups", groups.len());
    groups.into_iter().map(merge_members).collect()
}

/// Fold a non-empty group into its best-scoring member.
///
/// The first member with the maximum score wins. Links from all members are
/// merged in member order and the duplicate counts are summed.
fn merge_members(mut members: Vec<ResolvedRecord>) -> ResolvedRecord {
    if members.len() == 1 {
        return members.remove(0);
    }

    let mut best = 0;
    for (idx, member) in members.iter().enumerate().skip(1) {
        if member.relevance_score() > members[best].relevance_score() {
            best = idx;
        }
    }

    let links = merge_links(members.iter().map(|m| m.links()));
    let duplicate_count = members.iter().map(|m| m.duplicate_count).sum();

    let mut winner = members.swap_remove(best);
    winner.scored.record.links = links;
    winner.duplicate_count = duplicate_count;
    winner
}
