use crate::cli::OutputFormat;
use crate::commands::Result;
use colpofind_core::collect::SourceError;
use colpofind_core::links::link_label;
use colpofind_core::profiles::SearchProfile;
use colpofind_core::ResolvedRecord;
use serde::{Deserialize, Serialize};

mod pretty;

/// Longest summary shown per paper, in characters
pub const SUMMARY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    RankedPapers {
        profile: String,
        papers: Vec<ResolvedRecord>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        errors: Vec<SourceError>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        saved_to: Option<String>,
    },
    ScoreResult {
        title: String,
        relevant: bool,
        score: u32,
    },
    ProfileList(Vec<SearchProfile>),
    ProfileDetail(SearchProfile),
    Message(String),
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            print!("{}", format_text(data)?);
        }
        OutputFormat::Pretty => {
            print!("{}", pretty::format_pretty(data)?);
        }
    }
    Ok(())
}

fn format_text(data: &OutputData) -> Result<String> {
    let mut out = String::new();
    match data {
        OutputData::RankedPapers {
            papers,
            errors,
            saved_to,
            ..
        } => {
            out.push_str(&format!(
                "Found {} relevant papers (sorted by relevance):\n",
                papers.len()
            ));
            for (i, paper) in papers.iter().enumerate() {
                out.push('\n');
                out.push_str(&paper_text(paper, i + 1));
            }
            for err in errors {
                out.push_str(&format!(
                    "\nWarning: {} failed for '{}': {}\n",
                    err.source, err.query, err.error
                ));
            }
            if let Some(path) = saved_to {
                out.push_str(&format!("\nResults saved to {}\n", path));
            }
        }
        OutputData::ScoreResult {
            title,
            relevant,
            score,
        } => {
            out.push_str(&format!("{}\n", title));
            out.push_str(&format!("relevant: {}\nscore: {}\n", relevant, score));
        }
        OutputData::ProfileList(profiles) => {
            for profile in profiles {
                out.push_str(&format!(
                    "{}\t{}\t{}\n",
                    profile.name,
                    profile.sources.join(","),
                    profile.description.as_deref().unwrap_or("")
                ));
            }
        }
        OutputData::ProfileDetail(profile) => {
            out.push_str(&serde_yaml::to_string(profile)?);
        }
        OutputData::Message(msg) => {
            out.push_str(msg);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Plain multi-line rendering of one ranked paper.
fn paper_text(paper: &ResolvedRecord, index: usize) -> String {
    let mut out = format!("{}. {}\n", index, paper.title());
    out.push_str(&format!("   Source: {}\n", paper.source()));
    out.push_str(&format!("   Relevance Score: {}\n", paper.relevance_score()));
    if paper.duplicate_count > 1 {
        out.push_str(&format!(
            "   Note: Combined {} duplicate/similar entries\n",
            paper.duplicate_count
        ));
    }
    out.push_str(&format!("   Authors: {}\n", paper.display_authors()));
    if let Some(published) = &paper.metadata().published {
        out.push_str(&format!("   Published: {}\n", published));
    }
    if let Some(summary) = summary_preview(paper.summary_text()) {
        out.push_str(&format!("   Summary: {}\n", summary));
    }
    if !paper.links().is_empty() {
        out.push_str("   Links:\n");
        for (kind, url) in paper.links() {
            out.push_str(&format!("      {}: {}\n", link_label(kind), url));
        }
    }
    out
}

/// First [`SUMMARY_PREVIEW_CHARS`] characters of a summary, `None` when blank.
pub fn summary_preview(summary: &str) -> Option<String> {
    let summary = summary.trim();
    if summary.is_empty() {
        return None;
    }
    if summary.chars().count() <= SUMMARY_PREVIEW_CHARS {
        return Some(summary.to_string());
    }
    let head: String = summary.chars().take(SUMMARY_PREVIEW_CHARS).collect();
    Some(format!("{}...", head))
}
