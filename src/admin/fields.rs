use crate::client::SolrClient;
use crate::error::{Result, SolrError};
use crate::schema::FieldSpec;
use serde_json::Value;

/// Schema API command applied to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Add,
    Replace,
    Delete,
}

impl FieldAction {
    pub fn command(&self) -> &'static str {
        match self {
            FieldAction::Add => "add-field",
            FieldAction::Replace => "replace-field",
            FieldAction::Delete => "delete-field",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            FieldAction::Add => "add",
            FieldAction::Replace => "update",
            FieldAction::Delete => "delete",
        }
    }

    /// `{"<command>": {...}}`; deletes only carry the field name.
    pub fn payload(&self, field: &FieldSpec) -> Value {
        let body = match self {
            FieldAction::Delete => serde_json::json!({ "name": field.name }),
            FieldAction::Add | FieldAction::Replace => field.to_payload(),
        };
        let mut command = serde_json::Map::new();
        command.insert(self.command().to_string(), body);
        Value::Object(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Applied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: String,
    pub status: FieldStatus,
}

/// Per-field outcomes of one sequential batch, in submission order.
///
/// A batch stops at its first failure, so at most the last entry is
/// `Failed`; fields after it were never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub core: String,
    pub action: FieldAction,
    pub outcomes: Vec<FieldOutcome>,
}

impl BatchReport {
    pub fn applied(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == FieldStatus::Applied)
            .map(|o| o.field.as_str())
    }

    pub fn failure(&self) -> Option<(&str, &str)> {
        self.outcomes.iter().find_map(|o| match &o.status {
            FieldStatus::Failed(msg) => Some((o.field.as_str(), msg.as_str())),
            FieldStatus::Applied => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }
}

/// Field mutations through a core's Schema API.
#[derive(Debug, Clone)]
pub struct FieldsAdmin {
    client: SolrClient,
}

impl FieldsAdmin {
    pub fn new(client: SolrClient) -> Self {
        Self { client }
    }

    /// One `POST <core>/schema`.
    pub async fn modify_field(&self, core: &str, action: FieldAction, field: &FieldSpec) -> Result<()> {
        self.client
            .post_checked(&format!("{}/schema", core), &action.payload(field))
            .await?;
        Ok(())
    }

    pub async fn delete_field(&self, core: &str, name: &str) -> Result<()> {
        self.modify_field(core, FieldAction::Delete, &FieldSpec::new(name, ""))
            .await
    }

    /// Apply `action` to each field in order, stopping at the first failure.
    /// Nothing is compensated here; see [`FieldsAdmin::rollback`].
    pub async fn apply_fields(
        &self,
        core: &str,
        action: FieldAction,
        fields: &[FieldSpec],
    ) -> BatchReport {
        let mut outcomes = Vec::with_capacity(fields.len());
        for field in fields {
            match self.modify_field(core, action, field).await {
                Ok(()) => {
                    tracing::info!(
                        "{} field '{}' successfully in core '{}'.",
                        past_tense(action),
                        field.name,
                        core
                    );
                    outcomes.push(FieldOutcome {
                        field: field.name.clone(),
                        status: FieldStatus::Applied,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to {} field '{}' in core '{}': {}",
                        action.verb(),
                        field.name,
                        core,
                        e
                    );
                    outcomes.push(FieldOutcome {
                        field: field.name.clone(),
                        status: FieldStatus::Failed(e.to_string()),
                    });
                    break;
                }
            }
        }
        BatchReport {
            core: core.to_string(),
            action,
            outcomes,
        }
    }

    /// Delete every field the batch applied. Returns how many deletes succeeded.
    pub async fn rollback(&self, report: &BatchReport) -> usize {
        let applied: Vec<String> = report.applied().map(String::from).collect();
        self.rollback_fields(&report.core, &applied).await
    }

    /// Best-effort `delete-field` for each name; failures are logged only.
    pub async fn rollback_fields(&self, core: &str, names: &[String]) -> usize {
        let mut rolled_back = 0;
        for name in names {
            match self.delete_field(core, name).await {
                Ok(()) => {
                    tracing::info!("Rolled back field '{}' in core '{}'.", name, core);
                    rolled_back += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to rollback field '{}' in core '{}': {}",
                        name,
                        core,
                        e
                    );
                }
            }
        }
        rolled_back
    }

    /// Add all fields or, on the first failure, remove the ones already added
    /// and fail with [`SolrError::MigrationHalted`].
    pub async fn add_fields(&self, core: &str, fields: &[FieldSpec]) -> Result<BatchReport> {
        tracing::info!("Starting to add fields to core: {}", core);
        self.apply_or_rollback(core, FieldAction::Add, fields).await
    }

    /// Same contract as [`FieldsAdmin::add_fields`] with `replace-field`.
    pub async fn update_fields(&self, core: &str, fields: &[FieldSpec]) -> Result<BatchReport> {
        tracing::info!("Updating fields in core: {}", core);
        self.apply_or_rollback(core, FieldAction::Replace, fields).await
    }

    async fn apply_or_rollback(
        &self,
        core: &str,
        action: FieldAction,
        fields: &[FieldSpec],
    ) -> Result<BatchReport> {
        let report = self.apply_fields(core, action, fields).await;
        if let Some((field, message)) = report.failure() {
            let err = SolrError::MigrationHalted(format!(
                "failed to {} field '{}' {} core '{}': {}",
                action.verb(),
                field,
                if action == FieldAction::Add { "to" } else { "in" },
                core,
                message
            ));
            self.rollback(&report).await;
            return Err(err);
        }
        Ok(report)
    }

    /// Try every delete; succeed if at least one went through.
    pub async fn delete_fields(&self, core: &str, names: &[String]) -> Result<usize> {
        tracing::info!("Deleting fields from core: {}", core);
        let mut deleted = 0;
        for name in names {
            match self.delete_field(core, name).await {
                Ok(()) => {
                    tracing::info!("Deleted field '{}' successfully in core '{}'.", name, core);
                    deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to delete field '{}' in core '{}': {}",
                        name,
                        core,
                        e
                    );
                }
            }
        }

        if deleted == 0 {
            return Err(SolrError::NoFieldsDeleted(core.to_string()));
        }

        tracing::info!(
            "Deleted {} out of {} fields from core '{}'.",
            deleted,
            names.len(),
            core
        );
        Ok(deleted)
    }

    /// Field definitions from `<core>/schema/fields`.
    pub async fn get_core_fields(&self, core: &str) -> Result<Vec<Value>> {
        let value = self
            .client
            .get_json(&format!("{}/schema/fields", core), &[] as &[(&str, &str)])
            .await?;
        Ok(value
            .get("fields")
            .and_then(|f| f.as_array())
            .cloned()
            .unwrap_or_default())
    }
}

fn past_tense(action: FieldAction) -> &'static str {
    match action {
        FieldAction::Add => "Added",
        FieldAction::Replace => "Updated",
        FieldAction::Delete => "Deleted",
    }
}
