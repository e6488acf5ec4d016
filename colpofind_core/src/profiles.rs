//! Search profile management.
//!
//! A profile bundles everything one aggregation run needs: the queries to
//! send, the sources to ask, the relevance vocabulary and the dedup
//! threshold. Everything has sensible defaults.

use crate::dedup::DedupConfig;
use crate::error::ConfigError;
use crate::relevance::Vocabulary;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// ============================================================================
// Default Values
// ============================================================================

/// Dataset substituted into `{dataset}` query placeholders
pub const DEFAULT_DATASET: &str = "IARCImageBankColpo";

/// Default results per source per query
pub const DEFAULT_LIMIT: u32 = 20;

/// Default number of Google Scholar result pages per query
pub const DEFAULT_SCHOLAR_PAGES: u32 = 2;

/// Default per-source timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Name of the built-in profile used when none is given
pub const DEFAULT_PROFILE: &str = "colposcopy";

const DATASET_PLACEHOLDER: &str = "{dataset}";

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_scholar_pages() -> u32 {
    DEFAULT_SCHOLAR_PAGES
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_queries() -> Vec<String> {
    vec![
        "{dataset} cervical cancer colposcopy".to_string(),
        "IARC colposcopy database cervical cancer".to_string(),
        "WHO colposcopy images cervical cancer dataset".to_string(),
        "colposcopy imaging cervical cancer screening".to_string(),
        "cervical intraepithelial neoplasia colposcopy WHO".to_string(),
    ]
}

fn default_sources() -> Vec<String> {
    vec![
        "google-scholar".to_string(),
        "pubmed".to_string(),
        "arxiv".to_string(),
    ]
}

// ============================================================================
// SearchProfile
// ============================================================================

/// A named search profile configuration.
///
/// Profiles can be:
/// - Built-in (shipped with colpofind)
/// - User-defined (in ~/.config/colpofind/profiles.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchProfile {
    /// Profile name
    pub name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Dataset name for `{dataset}` placeholders
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Query templates, searched in order
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,

    /// Sources to ask for every query, in order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Relevance filter terms and scoring weights
    #[serde(default)]
    pub vocabulary: Vocabulary,

    /// Duplicate resolution settings
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Maximum results per source per query (default: 20)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Google Scholar result pages per query (default: 2)
    #[serde(default = "default_scholar_pages")]
    pub scholar_pages: u32,

    /// Per-source timeout in milliseconds (default: 60000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Fixed delay between upstream requests, overriding each source's own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_delay_ms: Option<u64>,
}

impl SearchProfile {
    /// Create a new profile with default vocabulary, queries and sources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            dataset: default_dataset(),
            queries: default_queries(),
            sources: default_sources(),
            vocabulary: Vocabulary::default(),
            dedup: DedupConfig::default(),
            limit: DEFAULT_LIMIT,
            scholar_pages: DEFAULT_SCHOLAR_PAGES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            request_delay_ms: None,
        }
    }

    /// Get a built-in profile by name.
    pub fn get_builtin(name: &str) -> Option<Self> {
        BUILTIN_PROFILES.iter().find(|p| p.name == name).cloned()
    }

    /// List all built-in profiles.
    pub fn list_builtin() -> &'static [SearchProfile] {
        &BUILTIN_PROFILES
    }

    /// Queries with the dataset placeholder filled in.
    pub fn expanded_queries(&self) -> Vec<String> {
        self.queries
            .iter()
            .map(|q| q.replace(DATASET_PLACEHOLDER, &self.dataset))
            .collect()
    }

    /// Check the vocabulary and dedup settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vocabulary.validate()?;
        self.dedup.validate()
    }
}

impl Default for SearchProfile {
    fn default() -> Self {
        let mut profile = Self::new(DEFAULT_PROFILE);
        profile.description =
            Some("Cervical-cancer colposcopy imaging literature across Scholar, PubMed and arXiv".to_string());
        profile
    }
}

// ============================================================================
// Built-in Profiles
// ============================================================================

static BUILTIN_PROFILES: Lazy<Vec<SearchProfile>> = Lazy::new(|| {
    let mut open_access = SearchProfile::new("colposcopy-open");
    open_access.description =
        Some("Colposcopy literature from open APIs only (PubMed, arXiv)".to_string());
    open_access.sources = vec!["pubmed".to_string(), "arxiv".to_string()];

    vec![SearchProfile::default(), open_access]
});

// ============================================================================
// ProfileStore
// ============================================================================

/// Storage for user-defined profiles.
///
/// Profiles are stored in YAML format at `~/.config/colpofind/profiles.yaml`.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Create a new profile store at the default location.
    pub fn new_default() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        let path = base.join("colpofind").join("profiles.yaml");
        Self { path }
    }

    /// Create a profile store at a custom path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load all user-defined profiles. A missing file means no profiles.
    pub fn load_all(&self) -> Result<HashMap<String, SearchProfile>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ConfigError::Io(e.to_string())),
        }
    }

    /// Load a specific profile by name.
    ///
    /// Resolution order:
    /// 1. User profiles (from file)
    /// 2. Built-in profiles
    pub fn load(&self, name: &str) -> Result<SearchProfile, ConfigError> {
        if let Some(profile) = self.load_all()?.remove(name) {
            return Ok(profile);
        }
        SearchProfile::get_builtin(name).ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Save a profile.
    pub fn save(&self, profile: &SearchProfile) -> Result<(), ConfigError> {
        let mut profiles = self.load_all()?;
        profiles.insert(profile.name.clone(), profile.clone());
        self.write_all(&profiles)
    }

    /// Delete a user profile.
    ///
    /// Returns `Ok(true)` if deleted, `Ok(false)` if not found.
    /// Cannot delete built-in profiles.
    pub fn delete(&self, name: &str) -> Result<bool, ConfigError> {
        let mut profiles = self.load_all()?;
        let existed = profiles.remove(name).is_some();
        if existed {
            self.write_all(&profiles)?;
        }
        Ok(existed)
    }

    /// List all available profiles (user + built-in), sorted by name.
    pub fn list_all(&self) -> Result<Vec<SearchProfile>, ConfigError> {
        let mut profiles: Vec<SearchProfile> = self.load_all()?.into_values().collect();

        for builtin in SearchProfile::list_builtin() {
            if !profiles.iter().any(|p| p.name == builtin.name) {
                profiles.push(builtin.clone());
            }
        }

        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    fn write_all(&self, profiles: &HashMap<String, SearchProfile>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content =
            serde_yaml::to_string(profiles).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&self.path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relevance::KeywordWeight;

    /// Store in a fresh directory; the directory lives as long as the guard.
    fn temp_store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("colpofind").join("profiles.yaml"));
        (dir, store)
    }

    #[test]
    fn test_builtin_profiles() {
        let profile = SearchProfile::get_builtin(DEFAULT_PROFILE).unwrap();
        assert_eq!(profile.sources, vec!["google-scholar", "pubmed", "arxiv"]);
        assert_eq!(profile.queries.len(), 5);
        assert_eq!(profile.limit, DEFAULT_LIMIT);
        assert!(SearchProfile::get_builtin("colposcopy-open").is_some());
        assert!(SearchProfile::get_builtin("nope").is_none());
    }

    #[test]
    fn test_expanded_queries() {
        let mut profile = SearchProfile::default();
        profile.dataset = "MyColpoSet".to_string();
        let queries = profile.expanded_queries();
        assert_eq!(queries[0], "MyColpoSet cervical cancer colposcopy");
        assert_eq!(queries[1], "IARC colposcopy database cervical cancer");
    }

    #[test]
    fn test_yaml_defaults_fill_missing_fields() {
        let profile: SearchProfile = serde_yaml::from_str("name: minimal\n").unwrap();
        assert_eq!(profile.dataset, DEFAULT_DATASET);
        assert_eq!(profile.vocabulary, Vocabulary::default());
        assert_eq!(profile.dedup.similarity_threshold, 0.85);
        assert_eq!(profile.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_yaml_custom_vocabulary() {
        let yaml = r#"
name: retina
sources: [pubmed]
vocabulary:
  relevant_terms: [retina, fundus]
  keywords:
    - keyword: fundus image
      weight: 4
"#;
        let profile: SearchProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.vocabulary.relevant_terms, vec!["retina", "fundus"]);
        assert_eq!(
            profile.vocabulary.keywords,
            vec![KeywordWeight::new("fundus image", 4)]
        );
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut profile = SearchProfile::default();
        profile.dedup.similarity_threshold = -0.1;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_store_roundtrip() {
        let (_dir, store) = temp_store();
        let mut profile = SearchProfile::new("mine");
        profile.sources = vec!["arxiv".to_string()];

        store.save(&profile).unwrap();
        assert_eq!(store.load("mine").unwrap(), profile);

        let names: Vec<String> = store.list_all().unwrap().into_iter().map(|p| p.name).collect();
        assert!(names.contains(&"mine".to_string()));
        assert!(names.contains(&DEFAULT_PROFILE.to_string()));

        assert!(store.delete("mine").unwrap());
        assert!(!store.delete("mine").unwrap());
        assert!(matches!(
            store.load("mine"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_user_profile_overrides_builtin() {
        let (_dir, store) = temp_store();
        let mut profile = SearchProfile::default();
        profile.limit = 5;
        store.save(&profile).unwrap();

        assert_eq!(store.load(DEFAULT_PROFILE).unwrap().limit, 5);
    }
}
