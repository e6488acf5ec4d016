//! PubMed source via NCBI E-utilities (esearch + esummary, JSON).

use crate::error::ConnectorError;
use crate::record::{CandidateRecord, SourceKind};
use crate::{SearchParams, Source};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const ESUMMARY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";

/// Delay between per-article summary requests
const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct PubMedSource {
    client: Client,
}

impl PubMedSource {
    pub fn new() -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(ConnectorError::HttpRequest)?;
        Ok(Self { client })
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ConnectorError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(ConnectorError::HttpRequest)?;

        if !response.status().is_success() {
            return Err(ConnectorError::UpstreamStatus(response.status().as_u16()));
        }

        let body = response.json::<Value>().await.map_err(ConnectorError::HttpRequest)?;
        debug!(
            target: "connector.pubmed",
            %url,
            total_ms = %t0.elapsed().as_millis(),
            "fetched e-utilities response"
        );
        Ok(body)
    }

    async fn search_ids(&self, query: &str, limit: u32) -> Result<Vec<String>, ConnectorError> {
        let body = self
            .get_json(
                ESEARCH_URL,
                &[
                    ("db", "pubmed".to_string()),
                    ("term", query.to_string()),
                    ("retmode", "json".to_string()),
                    ("retmax", limit.to_string()),
                ],
            )
            .await?;
        Ok(parse_esearch_ids(&body))
    }

    async fn fetch_summary(&self, pmid: &str) -> Result<Option<CandidateRecord>, ConnectorError> {
        let body = self
            .get_json(
                ESUMMARY_URL,
                &[
                    ("db", "pubmed".to_string()),
                    ("id", pmid.to_string()),
                    ("retmode", "json".to_string()),
                ],
            )
            .await?;
        Ok(parse_esummary(pmid, &body))
    }
}

#[async_trait]
impl Source for PubMedSource {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::PubMed
    }

    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<CandidateRecord>, ConnectorError> {
        info!("Searching PubMed for: {}", query);
        let ids = self.search_ids(query, params.limit).await?;
        let delay = params.delay_or(DEFAULT_DELAY);

        let mut records = Vec::with_capacity(ids.len());
        for pmid in &ids {
            match self.fetch_summary(pmid).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!(target: "connector.pubmed", %pmid, "no summary returned"),
                Err(e) => warn!("Error fetching details for PMID {}: {}", pmid, e),
            }
            tokio::time::sleep(delay).await;
        }

        info!("Found {} papers from PubMed", records.len());
        Ok(records)
    }
}

/// PMIDs from an esearch JSON response.
pub fn parse_esearch_ids(body: &Value) -> Vec<String> {
    body.get("esearchresult")
        .and_then(|r| r.get("idlist"))
        .and_then(|ids| ids.as_array())
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Candidate record for `pmid` from an esummary JSON response.
pub fn parse_esummary(pmid: &str, body: &Value) -> Option<CandidateRecord> {
    let details = body.get("result")?.get(pmid)?;

    let text = |field: &str| {
        details
            .get(field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let authors = details
        .get("authors")
        .and_then(|a| a.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut record = CandidateRecord::new(SourceKind::PubMed, text("title"))
        .with_summary(text("summary"))
        .with_authors(authors)
        .with_pmid(pmid)
        .with_link("pubmed", format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid))
        .with_link(
            "fulltext",
            format!("https://www.ncbi.nlm.nih.gov/pmc/articles/pmid/{}/", pmid),
        );

    let pubdate = text("pubdate");
    if !pubdate.is_empty() {
        record = record.with_published(pubdate);
    }
    if let Some(journal) = details.get("fulljournalname").filter(|v| v.is_string()) {
        record = record.with_extra("journal", journal.clone());
    }

    Some(record)
}
