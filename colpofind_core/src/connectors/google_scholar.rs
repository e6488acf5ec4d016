//! Google Scholar source (HTML results pages).

use super::collapse_whitespace;
use crate::error::ConnectorError;
use crate::record::{CandidateRecord, SourceKind};
use crate::{SearchParams, Source};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tokio::time::{self, Duration};
use tracing::{info, warn};

const BASE_URL: &str = "https://scholar.google.com";
const RESULTS_PER_PAGE: u32 = 10;
const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

pub struct GoogleScholarSource {
    client: Client,
}

impl GoogleScholarSource {
    pub fn new() -> Result<Self, ConnectorError> {
        Ok(Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36")
                .cookie_store(true)
                .build()
                .map_err(ConnectorError::HttpRequest)?,
        })
    }

    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<CandidateRecord>, ConnectorError> {
        let url = format!(
            "{}/scholar?q={}&start={}&hl=en",
            BASE_URL,
            urlencoding::encode(query),
            page * RESULTS_PER_PAGE
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ConnectorError::HttpRequest)?;

        if !response.status().is_success() {
            return Err(ConnectorError::UpstreamStatus(response.status().as_u16()));
        }

        let html_content = response.text().await.map_err(ConnectorError::HttpRequest)?;
        parse_results_page(&html_content)
    }
}

#[async_trait]
impl Source for GoogleScholarSource {
    fn name(&self) -> &'static str {
        "google-scholar"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::GoogleScholar
    }

    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<CandidateRecord>, ConnectorError> {
        info!("Searching Google Scholar for: {}", query);
        let delay = params.delay_or(DEFAULT_PAGE_DELAY);
        let mut records = Vec::new();

        for page in 0..params.pages {
            info!("  Page {}...", page + 1);
            match self.fetch_page(query, page).await {
                Ok(mut found) => records.append(&mut found),
                // Blocked pages will not recover on the next page either
                Err(ConnectorError::PageIsCaptchaOrAuthChallenge) if records.is_empty() => {
                    return Err(ConnectorError::PageIsCaptchaOrAuthChallenge);
                }
                Err(e) => warn!("Error on page {}: {}", page + 1, e),
            }
            time::sleep(delay).await;
        }

        info!("Found {} papers from Google Scholar", records.len());
        Ok(records)
    }
}

fn selector(css: &str) -> Result<Selector, ConnectorError> {
    Selector::parse(css)
        .map_err(|e| ConnectorError::ParseError(format!("invalid selector '{}': {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn looks_like_challenge(html: &str) -> bool {
    html.contains("gs_captcha") || html.contains("unusual traffic from your computer")
}

/// Parse one Scholar results page into candidate records.
///
/// Results without a `.gs_rt` title element are skipped.
pub fn parse_results_page(html: &str) -> Result<Vec<CandidateRecord>, ConnectorError> {
    if looks_like_challenge(html) {
        return Err(ConnectorError::PageIsCaptchaOrAuthChallenge);
    }

    let document = Html::parse_document(html);

    let result_sel = selector(".gs_r")?;
    let title_sel = selector(".gs_rt")?;
    let title_link_sel = selector(".gs_rt a")?;
    let meta_sel = selector(".gs_a")?;
    let snippet_sel = selector(".gs_rs")?;
    let pdf_sel = selector(".gs_or_ggsm a")?;
    let anchor_sel = selector("a")?;

    let mut records = Vec::new();

    for result in document.select(&result_sel) {
        let Some(title_elem) = result.select(&title_sel).next() else {
            continue;
        };

        let mut record = CandidateRecord::new(SourceKind::GoogleScholar, element_text(title_elem));

        if let Some(snippet) = result.select(&snippet_sel).next() {
            record = record.with_summary(element_text(snippet));
        }
        if let Some(meta) = result.select(&meta_sel).next() {
            record = record.with_authors_venue(element_text(meta));
        }

        let pdf = result
            .select(&pdf_sel)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.contains(".pdf"));
        if let Some(href) = pdf {
            record = record.with_link("pdf", href);
        }

        if let Some(href) = result
            .select(&title_link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            record = record.with_link("main", href);
        }

        let cited_by = result.select(&anchor_sel).find(|a| {
            a.text()
                .collect::<String>()
                .trim_start()
                .starts_with("Cited by")
        });
        if let Some(href) = cited_by.and_then(|a| a.value().attr("href")) {
            record = record.with_link("citations", format!("{}{}", BASE_URL, href));
        }

        records.push(record);
    }

    Ok(records)
}
