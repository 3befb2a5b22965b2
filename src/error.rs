use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SolrError {
    #[error("Failed to reach Solr: {0}")]
    Transport(String),

    #[error("Solr returned HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("{0}")]
    Solr(String),

    #[error("Failed to decode Solr response: {0}")]
    Decode(String),

    #[error("Core '{0}' already exists in Solr.")]
    CoreExists(String),

    #[error("Core '{0}' does not exist in Solr.")]
    CoreNotFound(String),

    #[error("Empty response received while deleting core '{0}'.")]
    EmptyResponse(String),

    #[error("Migration halted: {0}")]
    MigrationHalted(String),

    #[error("Failed to delete any fields from core '{0}'.")]
    NoFieldsDeleted(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, SolrError>;

impl From<std::io::Error> for SolrError {
    fn from(e: std::io::Error) -> Self {
        SolrError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SolrError {
    fn from(e: serde_json::Error) -> Self {
        SolrError::Json(e.to_string())
    }
}

impl From<reqwest::Error> for SolrError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SolrError::Decode(e.to_string())
        } else {
            SolrError::Transport(e.to_string())
        }
    }
}

impl SolrError {
    /// Whether the failure happened before Solr produced an answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, SolrError::Transport(_))
    }

    /// HTTP status the error maps to when surfaced by a caller's own API.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SolrError::Transport(_) => StatusCode::BAD_GATEWAY,
            SolrError::Status { status, .. } => *status,
            SolrError::Solr(_) => StatusCode::BAD_REQUEST,
            SolrError::Decode(_) => StatusCode::BAD_GATEWAY,
            SolrError::CoreExists(_) => StatusCode::CONFLICT,
            SolrError::CoreNotFound(_) => StatusCode::NOT_FOUND,
            SolrError::EmptyResponse(_) => StatusCode::BAD_GATEWAY,
            SolrError::MigrationHalted(_) => StatusCode::CONFLICT,
            SolrError::NoFieldsDeleted(_) => StatusCode::BAD_REQUEST,
            SolrError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SolrError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SolrError::Json(_) => StatusCode::BAD_REQUEST,
        }
    }
}
