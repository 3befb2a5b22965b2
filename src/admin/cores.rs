use crate::client::SolrClient;
use crate::error::{Result, SolrError};
use crate::types::SolrEnvelope;
use serde_json::Value;

const CORES_ENDPOINT: &str = "admin/cores";
const DEFAULT_CONFIG_SET: &str = "_default";

/// Core lifecycle through Solr's CoreAdmin API.
#[derive(Debug, Clone)]
pub struct CoreAdmin {
    client: SolrClient,
}

impl CoreAdmin {
    pub fn new(client: SolrClient) -> Self {
        Self { client }
    }

    /// Raw `action=STATUS` response for one core.
    pub async fn status(&self, core: &str) -> Result<Value> {
        self.client
            .get_checked(CORES_ENDPOINT, &[("action", "STATUS"), ("core", core)])
            .await
    }

    /// Solr answers STATUS for an unknown core with an empty object, so
    /// existence means a non-empty entry under `status.<core>`.
    ///
    /// Errors are logged and read as "does not exist".
    pub async fn core_exists(&self, core: &str) -> bool {
        match self.status(core).await {
            Ok(value) => value
                .get("status")
                .and_then(|s| s.get(core))
                .and_then(|c| c.as_object())
                .is_some_and(|c| !c.is_empty()),
            Err(e) => {
                tracing::error!(core = %core, error = %e, "Error checking core existence");
                false
            }
        }
    }

    pub async fn create_core(&self, core: &str) -> Result<()> {
        if self.core_exists(core).await {
            return Err(SolrError::CoreExists(core.to_string()));
        }

        self.client
            .get_checked(
                CORES_ENDPOINT,
                &[
                    ("action", "CREATE"),
                    ("name", core),
                    ("configSet", DEFAULT_CONFIG_SET),
                ],
            )
            .await
            .map_err(|e| with_context(e, format!("Failed to create core '{}'.", core)))?;

        tracing::info!("Core '{}' created successfully.", core);
        Ok(())
    }

    /// Returns `true` once the core exists, creating it if needed.
    pub async fn create_core_if_not_exists(&self, core: &str) -> Result<bool> {
        if self.core_exists(core).await {
            return Ok(true);
        }
        self.create_core(core).await?;
        Ok(true)
    }

    pub async fn rename_core(&self, old_name: &str, new_name: &str) -> Result<()> {
        if !self.core_exists(old_name).await {
            return Err(SolrError::CoreNotFound(old_name.to_string()));
        }

        self.client
            .get_checked(
                CORES_ENDPOINT,
                &[("action", "RENAME"), ("core", old_name), ("other", new_name)],
            )
            .await
            .map_err(|e| {
                with_context(
                    e,
                    format!("Failed to rename core '{}' to '{}'.", old_name, new_name),
                )
            })?;

        tracing::info!("Core '{}' renamed to '{}' successfully.", old_name, new_name);
        Ok(())
    }

    /// `action=UNLOAD`; returns Solr's decoded answer.
    pub async fn delete_core(&self, core: &str) -> Result<Value> {
        let (status, body) = self
            .client
            .get_raw(CORES_ENDPOINT, &[("action", "UNLOAD"), ("core", core)])
            .await?;

        if body.trim().is_empty() {
            return Err(SolrError::EmptyResponse(core.to_string()));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            SolrError::Decode(format!(
                "Invalid JSON response received while deleting core '{}': {}",
                core, e
            ))
        })?;

        let envelope: SolrEnvelope = serde_json::from_value(value.clone()).unwrap_or_default();
        if !status.is_success() || !envelope.is_ok() {
            return Err(SolrError::Solr(format!(
                "Failed to delete core '{}'. {}",
                core,
                envelope.error_message()
            )));
        }

        tracing::info!("Core '{}' deleted successfully.", core);
        Ok(value)
    }
}

fn with_context(err: SolrError, context: String) -> SolrError {
    match err {
        SolrError::Solr(msg) => SolrError::Solr(format!("{} {}", context, msg)),
        other => other,
    }
}
