// src/error.rs
use serde_json::json;

/// Failures raised by source adapters while fetching or parsing upstream hits.
///
/// These never cross into the aggregation core: the collector turns them into
/// empty batches plus a recorded [`crate::collect::SourceError`].
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found")]
    ResourceNotFound,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Page is a CAPTCHA or authentication challenge")]
    PageIsCaptchaOrAuthChallenge,

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ConnectorError {
    pub fn code_str(&self) -> &'static str {
        match self {
            ConnectorError::InvalidInput(_) => "invalid_input",
            ConnectorError::ResourceNotFound => "not_found",
            ConnectorError::ParseError(_) => "parse_error",
            ConnectorError::Timeout(_) => "timeout",
            ConnectorError::HttpRequest(_) => "upstream_error",
            ConnectorError::UpstreamStatus(_) => "upstream_error",
            ConnectorError::PageIsCaptchaOrAuthChallenge => "blocked",
            ConnectorError::SerdeJson(_) => "parse_error",
            ConnectorError::Io(_) | ConnectorError::Other(_) => "internal_error",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "code": self.code_str(),
            "message": self.to_string(),
        })
    }
}

/// Errors from profile storage and vocabulary validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Invalid keyword pattern '{keyword}': {reason}")]
    InvalidKeyword { keyword: String, reason: String },

    #[error("Similarity threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Errors reading or writing result files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
