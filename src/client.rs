use crate::config::SolrConfig;
use crate::error::{Result, SolrError};
use crate::types::SolrEnvelope;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// HTTP transport shared by every Solr-facing component.
///
/// One `reqwest::Client` per `SolrClient`; cloning is cheap and shares the
/// connection pool.
#[derive(Debug, Clone)]
pub struct SolrClient {
    config: SolrConfig,
    http_client: reqwest::Client,
}

impl SolrClient {
    pub fn new(config: SolrConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SolrError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SolrConfig::from_env()?)
    }

    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// GET `path` and return the raw status and body, without interpreting either.
    pub async fn get_raw<Q>(&self, path: &str, query: &Q) -> Result<(StatusCode, String)>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| SolrError::Transport(format!("GET {} failed: {}", url, describe(&e))))?;
        read_body(response).await
    }

    /// POST a JSON body to `path` and return the raw status and body.
    pub async fn post_raw<B>(&self, path: &str, body: &B) -> Result<(StatusCode, String)>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST");
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SolrError::Transport(format!("POST {} failed: {}", url, describe(&e))))?;
        read_body(response).await
    }

    /// GET and decode JSON. HTTP failures surface as [`SolrError::Status`];
    /// `responseHeader.status` is not inspected.
    pub async fn get_json<Q>(&self, path: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let (status, body) = self.get_raw(path, query).await?;
        decode_lenient(status, &body)
    }

    /// GET and require `responseHeader.status == 0`.
    pub async fn get_checked<Q>(&self, path: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let (status, body) = self.get_raw(path, query).await?;
        decode_checked(status, &body)
    }

    /// POST and require `responseHeader.status == 0`.
    pub async fn post_checked<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let (status, body) = self.post_raw(path, body).await?;
        decode_checked(status, &body)
    }
}

/// reqwest's `Display` stops at the outermost error; append the source chain
/// so the cause (timeout, refused connection, DNS) survives.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    if err.is_timeout() {
        message.push_str(" (timed out)");
    }
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

async fn read_body(response: reqwest::Response) -> Result<(StatusCode, String)> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SolrError::Transport(format!("Failed to read response body: {}", describe(&e))))?;
    Ok((status, body))
}

fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Err(SolrError::Decode("empty response body".to_string()));
    }
    serde_json::from_str(body).map_err(|e| SolrError::Decode(e.to_string()))
}

fn decode_lenient(status: StatusCode, body: &str) -> Result<Value> {
    match parse_body(body) {
        Ok(value) if status.is_success() => Ok(value),
        Ok(value) => {
            let envelope: SolrEnvelope = serde_json::from_value(value).unwrap_or_default();
            Err(SolrError::Status {
                status,
                message: envelope.error_message(),
            })
        }
        Err(_) if !status.is_success() => Err(SolrError::Status {
            status,
            message: body.trim().to_string(),
        }),
        Err(e) => Err(e),
    }
}

/// Solr reports failures in the body, usually with a matching 4xx/5xx status.
/// A decodable body wins over the HTTP status so `error.msg` reaches the caller.
fn decode_checked(status: StatusCode, body: &str) -> Result<Value> {
    let value = match parse_body(body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(SolrError::Status {
                status,
                message: body.trim().to_string(),
            })
        }
        Err(e) => return Err(e),
    };

    let envelope: SolrEnvelope = serde_json::from_value(value.clone()).unwrap_or_default();
    if status.is_success() && envelope.is_ok() {
        Ok(value)
    } else {
        Err(SolrError::Solr(envelope.error_message()))
    }
}
