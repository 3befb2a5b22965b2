use crate::client::SolrClient;
use crate::error::Result;
use serde_json::{json, Value};

/// Writes to one core's update handler. Every call commits.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    client: SolrClient,
    core: String,
}

impl DocumentStore {
    pub fn new(client: SolrClient, core: impl Into<String>) -> Self {
        Self {
            client,
            core: core.into(),
        }
    }

    pub fn core(&self) -> &str {
        &self.core
    }

    fn update_path(&self) -> String {
        format!("{}/update?commit=true", self.core)
    }

    async fn post(&self, body: &Value) -> Result<()> {
        self.client.post_checked(&self.update_path(), body).await?;
        Ok(())
    }

    /// Index one document (a JSON object) or a list of them.
    pub async fn add_documents(&self, data: Value) -> Result<()> {
        let docs = as_document_list(data);
        let count = docs.as_array().map_or(0, Vec::len);
        self.post(&docs).await?;
        tracing::info!(core = %self.core, count, "Documents added");
        Ok(())
    }

    /// Solr replaces documents with the same unique key, so an update is an add.
    pub async fn update_documents(&self, data: Value) -> Result<()> {
        let docs = as_document_list(data);
        self.post(&docs).await?;
        tracing::info!(core = %self.core, "Documents updated");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.post(&json!({ "delete": { "id": id } })).await?;
        tracing::info!(core = %self.core, id = %id, "Document deleted");
        Ok(())
    }

    /// Sends `{"delete": {"*": "*"}}`.
    pub async fn delete_all(&self) -> Result<()> {
        self.post(&json!({ "delete": { "*": "*" } })).await?;
        tracing::info!(core = %self.core, "All documents deleted");
        Ok(())
    }

    /// Attach `children` to the parent under `child_key` as nested documents.
    pub async fn add_child_to_parent(
        &self,
        parent_id: &str,
        child_key: &str,
        children: Value,
    ) -> Result<()> {
        let mut parent = serde_json::Map::new();
        parent.insert("id".to_string(), Value::String(parent_id.to_string()));
        parent.insert(child_key.to_string(), children);
        self.post(&Value::Array(vec![Value::Object(parent)])).await?;
        tracing::info!(core = %self.core, parent = %parent_id, "Child documents attached");
        Ok(())
    }
}

/// A list is sent as is; anything else becomes a one-element list.
fn as_document_list(data: Value) -> Value {
    match data {
        Value::Array(_) => data,
        other => Value::Array(vec![other]),
    }
}
