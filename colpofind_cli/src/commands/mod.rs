pub mod profiles;
pub mod rank;
pub mod score;
pub mod search;

use colpofind_core::error::{ConfigError, ConnectorError, StorageError};
use colpofind_core::profiles::{ProfileStore, SearchProfile, DEFAULT_PROFILE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No usable sources: {0}")]
    NoSources(String),

    #[error("Source error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Load a profile by name from the user store, falling back to built-ins.
pub fn load_profile(name: Option<&str>) -> Result<SearchProfile> {
    let store = ProfileStore::new_default();
    let profile = store.load(name.unwrap_or(DEFAULT_PROFILE))?;
    Ok(profile)
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("pubmed, arxiv,,google-scholar "),
            vec!["pubmed", "arxiv", "google-scholar"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::from(ConfigError::ProfileNotFound("nope".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Profile 'nope' not found"
        );
    }
}
