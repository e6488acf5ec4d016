//! Pretty formatter for terminal output.
//!
//! Ranked papers render as numbered cards: bold title, dimmed metadata,
//! wrapped summary and labelled, clickable links.

use super::{summary_preview, OutputData};
use crate::commands::Result;
use colpofind_core::collect::SourceError;
use colpofind_core::links::link_label;
use colpofind_core::profiles::SearchProfile;
use colpofind_core::ResolvedRecord;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

/// Terminal width for formatting (default fallback)
const DEFAULT_WIDTH: usize = 80;

/// Indent for card content (after number)
const CARD_INDENT: usize = 6;

// ============================================================================
// Public API
// ============================================================================

pub fn format_pretty(data: &OutputData) -> Result<String> {
    let width = terminal_width();
    let out = match data {
        OutputData::RankedPapers {
            profile,
            papers,
            errors,
            saved_to,
        } => format_ranked(profile, papers, errors, saved_to.as_deref(), width),
        OutputData::ScoreResult {
            title,
            relevant,
            score,
        } => format_score(title, *relevant, *score),
        OutputData::ProfileList(profiles) => format_profile_table(profiles, width),
        OutputData::ProfileDetail(profile) => format!(
            "{}\n\n{}",
            format_section_header(&profile.name, None, width),
            serde_yaml::to_string(profile)?
        ),
        OutputData::Message(msg) => format!("{}\n", msg),
    };
    Ok(out)
}

// ============================================================================
// Ranked papers
// ============================================================================

fn format_ranked(
    profile: &str,
    papers: &[ResolvedRecord],
    errors: &[SourceError],
    saved_to: Option<&str>,
    width: usize,
) -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str(&format_section_header(
        &format!("Relevant papers ({})", profile),
        Some(papers.len()),
        width,
    ));
    output.push_str("\n\n");

    if papers.is_empty() {
        output.push_str(&format!("      {}\n", "No relevant papers found".yellow()));
    }

    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format_card(paper, i + 1, width));
        output.push('\n');
    }

    if !errors.is_empty() {
        output.push_str(&format!("{}\n", "Sources with errors:".yellow().bold()));
        for err in errors {
            let kind = if err.is_timeout { "timed out" } else { "failed" };
            output.push_str(&format!(
                "  {} {} {} for '{}': {}\n",
                "•".yellow(),
                err.source.bold(),
                kind,
                err.query,
                err.error.dimmed()
            ));
        }
        output.push('\n');
    }

    if let Some(path) = saved_to {
        output.push_str(&format!(
            "{} {}\n",
            "Results saved to".green().bold(),
            path.cyan()
        ));
    }

    output
}

fn format_card(paper: &ResolvedRecord, index: usize, width: usize) -> String {
    let mut output = String::new();
    let pad = " ".repeat(CARD_INDENT);
    let content_width = width.saturating_sub(CARD_INDENT + 2).max(20);

    let index_str = format!(" {:>3}. ", index).cyan().bold().to_string();
    output.push_str(&format!("{}{}\n", index_str, paper.title().bold()));

    output.push_str(&format!(
        "{}{} {}  {} {}\n",
        pad,
        "source:".dimmed(),
        paper.source().to_string().magenta(),
        "score:".dimmed(),
        paper.relevance_score().to_string().green().bold()
    ));

    if paper.duplicate_count > 1 {
        output.push_str(&format!(
            "{}{}\n",
            pad,
            format!(
                "Combined {} duplicate/similar entries",
                paper.duplicate_count
            )
            .yellow()
        ));
    }

    let authors = truncate_str(&paper.display_authors(), content_width);
    output.push_str(&format!("{}{} {}\n", pad, "authors:".dimmed(), authors.dimmed()));

    if let Some(published) = &paper.metadata().published {
        output.push_str(&format!(
            "{}{} {}\n",
            pad,
            "published:".dimmed(),
            published.dimmed()
        ));
    }

    if let Some(summary) = summary_preview(paper.summary_text()) {
        for line in textwrap::wrap(&summary, content_width) {
            output.push_str(&format!("{}{}\n", pad, line));
        }
    }

    for (kind, url) in paper.links() {
        output.push_str(&format!(
            "{}{} {}\n",
            pad,
            format!("{}:", link_label(kind)).dimmed(),
            format_hyperlink(url, url).blue()
        ));
    }

    output
}

// ============================================================================
// Score and profiles
// ============================================================================

fn format_score(title: &str, relevant: bool, score: u32) -> String {
    let verdict = if relevant {
        "relevant".green().bold().to_string()
    } else {
        "not relevant".red().bold().to_string()
    };
    format!(
        "{}\n      {} {}  {} {}\n",
        title.bold(),
        "verdict:".dimmed(),
        verdict,
        "score:".dimmed(),
        score.to_string().cyan().bold()
    )
}

fn format_profile_table(profiles: &[SearchProfile], width: usize) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width as u16)
        .set_header(vec!["Name", "Sources", "Queries", "Description"]);

    for profile in profiles {
        table.add_row(vec![
            profile.name.clone(),
            profile.sources.join(", "),
            profile.queries.len().to_string(),
            profile.description.clone().unwrap_or_default(),
        ]);
    }

    format!(
        "{}\n\n{}\n\n{} Use {} to see a profile in full\n",
        "Search Profiles".bold().cyan(),
        table,
        "Tip:".green().bold(),
        "colpofind profiles show <name>".cyan()
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn format_section_header(label: &str, count: Option<usize>, width: usize) -> String {
    let count_str = match count {
        Some(n) => format!(" ({} results)", n),
        None => String::new(),
    };

    let header_text = format!("{}{}", label, count_str);
    let line_len = (width.saturating_sub(header_text.len() + 4)).min(60);
    let line = "─".repeat(line_len);

    format!(
        "{} {} {}",
        "──".cyan(),
        header_text.green().bold(),
        line.cyan()
    )
}

fn truncate_str(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or(s);

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// OSC 8 hyperlink, terminated with BEL.
fn format_hyperlink(url: &str, display_text: &str) -> String {
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, display_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colpofind_core::{CandidateRecord, ScoredRecord, SourceKind};

    fn paper() -> ResolvedRecord {
        let record = CandidateRecord::new(SourceKind::GoogleScholar, "Deep colposcopy")
            .with_authors_venue("J Smith - Cancers, 2023")
            .with_summary("Automated grading of cervical lesions")
            .with_link("pdf", "https://example.org/a.pdf");
        ResolvedRecord {
            scored: ScoredRecord::new(record, 9),
            duplicate_count: 2,
        }
    }

    #[test]
    fn test_format_card() {
        let output = format_card(&paper(), 1, 80);
        assert!(output.contains("Deep colposcopy"));
        assert!(output.contains("Google Scholar"));
        assert!(output.contains("Combined 2 duplicate/similar entries"));
        assert!(output.contains("J Smith - Cancers, 2023"));
        assert!(output.contains("PDF Download:"));
        assert!(output.contains("https://example.org/a.pdf"));
    }

    #[test]
    fn test_format_ranked_lists_errors() {
        let errors = vec![SourceError {
            source: "google-scholar".to_string(),
            query: "colposcopy".to_string(),
            error: "Page is a CAPTCHA or authentication challenge".to_string(),
            is_timeout: false,
        }];
        let output = format_ranked("colposcopy", &[paper()], &errors, Some("out.json"), 80);
        assert!(output.contains("1 results"));
        assert!(output.contains("google-scholar"));
        assert!(output.contains("out.json"));
    }

    #[test]
    fn test_truncate_str() {
        let long = "This is a very long string that should be truncated";
        let truncated = truncate_str(long, 20);
        assert!(truncated.ends_with("..."));
        assert!(truncated.chars().count() <= 20);
    }

    #[test]
    fn test_format_section_header() {
        let header = format_section_header("colposcopy", Some(10), 80);
        assert!(header.contains("colposcopy"));
        assert!(header.contains("10"));
    }
}
