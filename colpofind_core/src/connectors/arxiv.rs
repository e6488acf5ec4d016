//! arXiv source via the export Atom API.

use super::collapse_whitespace;
use crate::error::ConnectorError;
use crate::record::{CandidateRecord, SourceKind};
use crate::{SearchParams, Source};
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

const API_URL: &str = "http://export.arxiv.org/api/query";

pub struct ArxivSource {
    client: Client,
}

impl ArxivSource {
    pub fn new() -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ConnectorError::HttpRequest)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<CandidateRecord>, ConnectorError> {
        info!("Searching arXiv for: {}", query);
        let mut url = Url::parse(API_URL)
            .map_err(|e| ConnectorError::InvalidInput(format!("Failed to parse URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("search_query", query)
            .append_pair("start", "0")
            .append_pair("max_results", &params.limit.to_string());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ConnectorError::HttpRequest)?;

        if !response.status().is_success() {
            return Err(ConnectorError::UpstreamStatus(response.status().as_u16()));
        }

        let content = response.text().await.map_err(ConnectorError::HttpRequest)?;
        let records = parse_arxiv_feed(&content)?;
        info!("Found {} papers from arXiv", records.len());
        Ok(records)
    }
}

#[derive(Default)]
struct EntryBuilder {
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    links: Vec<(String, String)>,
}

impl EntryBuilder {
    fn finish(self) -> CandidateRecord {
        let mut record = CandidateRecord::new(SourceKind::Arxiv, collapse_whitespace(&self.title))
            .with_summary(collapse_whitespace(&self.summary))
            .with_authors(self.authors);
        if !self.published.is_empty() {
            record = record.with_published(self.published);
        }
        for (kind, href) in self.links {
            record = record.with_link(kind, href);
        }
        record
    }

    /// Map an Atom `<link>` to a link kind: titled pdf/doi links, or the
    /// untitled alternate page as "main".
    fn add_link(&mut self, element: &BytesStart<'_>) {
        let mut href = None;
        let mut rel = None;
        let mut title = None;

        for attr in element.attributes().filter_map(Result::ok) {
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match attr.key.as_ref() {
                b"href" => href = Some(value),
                b"rel" => rel = Some(value),
                b"title" => title = Some(value),
                _ => {}
            }
        }

        let Some(href) = href else { return };
        let kind = match (title.as_deref(), rel.as_deref()) {
            (Some("pdf"), _) => "pdf",
            (Some("doi"), _) => "doi",
            (None, Some("alternate")) => "main",
            _ => return,
        };
        self.links.push((kind.to_string(), href));
    }
}

/// Parse an arXiv Atom feed into candidate records, one per `<entry>`.
pub fn parse_arxiv_feed(xml_content: &str) -> Result<Vec<CandidateRecord>, ConnectorError> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut records = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut current_tag: Option<String> = None;
    let mut buffer = Vec::new();

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "entry" => entry = Some(EntryBuilder::default()),
                    "link" => {
                        if let Some(builder) = entry.as_mut() {
                            builder.add_link(e);
                        }
                    }
                    "title" | "summary" | "published" | "name" if entry.is_some() => {
                        current_tag = Some(tag_name);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"link" {
                    if let Some(builder) = entry.as_mut() {
                        builder.add_link(e);
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(tag), Some(builder)) = (current_tag.as_deref(), entry.as_mut()) {
                    let text = e
                        .unescape()
                        .map_err(|err| ConnectorError::ParseError(err.to_string()))?;
                    match tag {
                        "title" => builder.title.push_str(&text),
                        "summary" => builder.summary.push_str(&text),
                        "published" => builder.published.push_str(&text),
                        "name" => builder.authors.push(text.to_string()),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag_name == "entry" {
                    if let Some(builder) = entry.take() {
                        records.push(builder.finish());
                    }
                } else if current_tag.as_deref() == Some(tag_name.as_str()) {
                    current_tag = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConnectorError::ParseError(e.to_string())),
            _ => {}
        }

        buffer.clear();
    }

    Ok(records)
}
