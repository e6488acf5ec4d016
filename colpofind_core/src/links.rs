//! Link maps and merging.

use std::collections::BTreeMap;

/// Link-kind key ("pdf", "main", "doi", "pubmed", "fulltext", "citations") to URL.
pub type LinkMap = BTreeMap<String, String>;

/// Fold link maps left to right into one map.
///
/// Every key present in any input survives. On a key collision the map that
/// comes later in `maps` wins.
pub fn merge_links<'a, I>(maps: I) -> LinkMap
where
    I: IntoIterator<Item = &'a LinkMap>,
{
    let mut merged = LinkMap::new();
    for map in maps {
        for (kind, url) in map {
            merged.insert(kind.clone(), url.clone());
        }
    }
    merged
}

/// Display label for a link key.
pub fn link_label(kind: &str) -> String {
    match kind {
        "main" => "Paper URL".to_string(),
        "pdf" => "PDF Download".to_string(),
        "pubmed" => "PubMed Page".to_string(),
        "fulltext" => "Full Text".to_string(),
        "doi" => "DOI Link".to_string(),
        "citations" => "Citations".to_string(),
        other => capitalize(other),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
