#[cfg(feature = "arxiv")]
pub mod arxiv;
#[cfg(feature = "google-scholar")]
pub mod google_scholar;
#[cfg(feature = "pubmed")]
pub mod pubmed;

/// Collapse runs of whitespace (including feed line breaks) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
