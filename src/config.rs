use crate::error::{Result, SolrError};
use std::env;
use std::time::Duration;

pub const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings shared by every component that talks to Solr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolrConfig {
    /// Base endpoint without trailing slash, e.g. `http://localhost:8983/solr`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOLR_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SolrConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Optional: SOLR_URL (defaults to `http://localhost:8983/solr`)
    /// Optional: SOLR_TIMEOUT_SECS (defaults to 30, must be positive)
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("SOLR_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOLR_URL.to_string());

        let timeout = match env::var("SOLR_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        SolrError::Config(format!("Invalid SOLR_TIMEOUT_SECS: {}", raw))
                    })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<base>/<path>` with exactly one slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SolrError::Config("Solr URL is empty".into()));
    }
    url::Url::parse(trimmed)
        .map_err(|e| SolrError::Config(format!("Invalid Solr URL '{}': {}", trimmed, e)))?;
    Ok(trimmed.to_string())
}
