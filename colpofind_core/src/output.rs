//! Result files: saving resolved records and loading records back.

use crate::error::StorageError;
use crate::record::{CandidateRecord, ResolvedRecord};
use chrono::{DateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// `cervical_cancer_papers_YYYYMMDD_HHMMSS.json` for the given instant.
pub fn default_results_filename<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("cervical_cancer_papers_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write records as pretty-printed JSON.
pub fn save_results(records: &[ResolvedRecord], path: &Path) -> Result<(), StorageError> {
    write_json(records, path)?;
    info!("Results saved to {}", path.display());
    Ok(())
}

/// Read a file written by [`save_results`].
pub fn load_results(path: &Path) -> Result<Vec<ResolvedRecord>, StorageError> {
    read_json(path)
}

/// Read a JSON array of candidate records, e.g. a saved source batch.
///
/// Saved result files load too: the score and duplicate count are ignored.
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateRecord>, StorageError> {
    read_json(path)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, content).map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StorageError::Json {
        path: path.display().to_string(),
        source,
    })
}
