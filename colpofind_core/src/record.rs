//! Record types flowing through the aggregation pipeline.
//!
//! A [`CandidateRecord`] is what a source adapter hands to the core. Records
//! that pass the relevance filter become [`ScoredRecord`]s, and duplicate
//! resolution turns those into [`ResolvedRecord`]s.

use crate::links::LinkMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Provenance tag of a candidate record. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "Google Scholar")]
    GoogleScholar,
    #[serde(rename = "PubMed")]
    PubMed,
    #[serde(rename = "arXiv")]
    Arxiv,
    /// Any source without a dedicated tag
    #[default]
    #[serde(other)]
    Other,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::GoogleScholar => "Google Scholar",
            SourceKind::PubMed => "PubMed",
            SourceKind::Arxiv => "arXiv",
            SourceKind::Other => "Other",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pass-through bibliographic fields. The core never reads or rewrites them.
///
/// Sources populate different subsets: PubMed and arXiv fill `authors` and
/// `published`, Google Scholar only has a combined `authors_venue` line.
/// Anything else an adapter wants to keep goes into `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Scholar's "Author - Venue, Year - host" line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors_venue: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single unmerged hit returned by one source for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Matching and merge key. A missing or null title reads as "".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Abstract or snippet text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary_text: String,

    #[serde(default)]
    pub source: SourceKind,

    #[serde(default)]
    pub links: LinkMap,

    #[serde(default)]
    pub metadata: RecordMetadata,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CandidateRecord {
    pub fn new(source: SourceKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source,
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary_text = summary.into();
        self
    }

    pub fn with_link(mut self, kind: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.insert(kind.into(), url.into());
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.metadata.authors = authors;
        self
    }

    pub fn with_authors_venue(mut self, line: impl Into<String>) -> Self {
        self.metadata.authors_venue = Some(line.into());
        self
    }

    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.metadata.published = Some(published.into());
        self
    }

    pub fn with_pmid(mut self, pmid: impl Into<String>) -> Self {
        self.metadata.pmid = Some(pmid.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.extra.insert(key.into(), value);
        self
    }

    /// Normalized key used by the exact-title pass.
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// A candidate that passed the relevance filter, with its score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: CandidateRecord,

    pub relevance_score: u32,
}

impl ScoredRecord {
    pub fn new(record: CandidateRecord, relevance_score: u32) -> Self {
        Self {
            record,
            relevance_score,
        }
    }
}

/// The deduplicated output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    #[serde(flatten)]
    pub scored: ScoredRecord,

    /// Number of candidates merged into this record (1 when nothing merged)
    pub duplicate_count: usize,
}

impl ResolvedRecord {
    pub fn title(&self) -> &str {
        &self.scored.record.title
    }

    pub fn summary_text(&self) -> &str {
        &self.scored.record.summary_text
    }

    pub fn source(&self) -> SourceKind {
        self.scored.record.source
    }

    pub fn links(&self) -> &LinkMap {
        &self.scored.record.links
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.scored.record.metadata
    }

    pub fn relevance_score(&self) -> u32 {
        self.scored.relevance_score
    }

    /// Human-readable author line, whichever shape the source produced.
    pub fn display_authors(&self) -> String {
        let meta = self.metadata();
        if !meta.authors.is_empty() {
            meta.authors.join(", ")
        } else if let Some(line) = &meta.authors_venue {
            line.clone()
        } else {
            "No authors listed".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_builder() {
        let record = CandidateRecord::new(SourceKind::PubMed, "HPV screening outcomes")
            .with_summary("Abstract text")
            .with_link("pubmed", "https://pubmed.ncbi.nlm.nih.gov/1/")
            .with_authors(vec!["Smith J".to_string(), "Jones A".to_string()])
            .with_pmid("1");

        assert_eq!(record.source, SourceKind::PubMed);
        assert_eq!(record.links.len(), 1);
        assert_eq!(record.metadata.pmid.as_deref(), Some("1"));
    }

    #[test]
    fn test_null_title_reads_as_empty() {
        let record: CandidateRecord = serde_json::from_value(json!({
            "title": null,
            "source": "arXiv"
        }))
        .unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.summary_text, "");
        assert_eq!(record.source, SourceKind::Arxiv);
        assert!(record.links.is_empty());
    }

    #[test]
    fn test_unknown_source_tag() {
        let record: CandidateRecord = serde_json::from_value(json!({
            "title": "x",
            "source": "Semantic Scholar"
        }))
        .unwrap();
        assert_eq!(record.source, SourceKind::Other);
    }

    #[test]
    fn test_title_key() {
        let record = CandidateRecord::new(SourceKind::Other, "  Colposcopy Atlas \n");
        assert_eq!(record.title_key(), "colposcopy atlas");
    }

    #[test]
    fn test_resolved_serialization_is_flat() {
        let record = CandidateRecord::new(SourceKind::GoogleScholar, "Cervical screening")
            .with_authors_venue("A Author - Lancet, 2020 - thelancet.com")
            .with_extra("citations_count", json!(12));
        let resolved = ResolvedRecord {
            scored: ScoredRecord::new(record, 3),
            duplicate_count: 2,
        };

        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["title"], "Cervical screening");
        assert_eq!(value["source"], "Google Scholar");
        assert_eq!(value["relevance_score"], 3);
        assert_eq!(value["duplicate_count"], 2);
        assert_eq!(value["metadata"]["citations_count"], 12);

        let back: ResolvedRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, resolved);
    }

    #[test]
    fn test_display_authors() {
        let listed = ResolvedRecord {
            scored: ScoredRecord::new(
                CandidateRecord::new(SourceKind::Arxiv, "t")
                    .with_authors(vec!["A".to_string(), "B".to_string()]),
                1,
            ),
            duplicate_count: 1,
        };
        assert_eq!(listed.display_authors(), "A, B");

        let bare = ResolvedRecord {
            scored: ScoredRecord::new(CandidateRecord::new(SourceKind::Other, "t"), 1),
            duplicate_count: 1,
        };
        assert_eq!(bare.display_authors(), "No authors listed");
    }
}
