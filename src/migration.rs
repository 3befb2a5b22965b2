//! Schema migrations: a serializable plan per change, applied with `up` and
//! reverted with `down`.
//!
//! | plan | up | down |
//! |---|---|---|
//! | `CreateCore` | create the core | unload it |
//! | `RenameCore` | rename `from` → `to` | rename back |
//! | `DeleteCore` | unload the core | recreate it (empty) |
//! | `CreateFields` | add fields, all or nothing | delete them |
//! | `UpdateFields` | replace fields, all or nothing | delete them |
//! | `DeleteFields` | delete fields, at least one | nothing |

use crate::admin::{CoreAdmin, FieldsAdmin};
use crate::client::SolrClient;
use crate::error::{Result, SolrError};
use crate::schema::FieldSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Migration {
    CreateCore { core: String },
    RenameCore { from: String, to: String },
    DeleteCore { core: String },
    CreateFields { core: String, fields: Vec<FieldSpec> },
    UpdateFields { core: String, fields: Vec<FieldSpec> },
    DeleteFields { core: String, fields: Vec<String> },
}

impl Migration {
    /// File-name stem describing the change, e.g. `create_products_solr_core`.
    pub fn slug(&self) -> String {
        match self {
            Migration::CreateCore { core } => format!("create_{}_solr_core", core),
            Migration::RenameCore { from, to } => format!("update_{}_to_{}_solr_core", from, to),
            Migration::DeleteCore { core } => format!("delete_{}_solr_core", core),
            Migration::CreateFields { core, .. } => format!("create_{}_solr_fields", core),
            Migration::UpdateFields { core, .. } => format!("update_{}_solr_fields", core),
            Migration::DeleteFields { core, .. } => {
                format!("delete_fields_from_{}_solr_core", core)
            }
        }
    }

    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!("{}_{}.json", at.format("%Y_%m_%d_%H%M%S"), self.slug())
    }

    fn field_names(fields: &[FieldSpec]) -> Vec<String> {
        fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// A migration as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationFile {
    pub created_at: DateTime<Utc>,
    pub migration: Migration,
}

impl MigrationFile {
    pub fn new(migration: Migration) -> Self {
        Self {
            created_at: Utc::now(),
            migration,
        }
    }

    pub fn file_name(&self) -> String {
        self.migration.file_name(self.created_at)
    }

    /// Write into `dir` (created if missing) and return the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SolrError::Io(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| SolrError::Json(format!("{}: {}", path.display(), e)))
    }
}

/// Runs migrations against one Solr server.
#[derive(Debug, Clone)]
pub struct Migrator {
    cores: CoreAdmin,
    fields: FieldsAdmin,
}

impl Migrator {
    pub fn new(client: SolrClient) -> Self {
        Self {
            cores: CoreAdmin::new(client.clone()),
            fields: FieldsAdmin::new(client),
        }
    }

    pub async fn up(&self, migration: &Migration) -> Result<()> {
        tracing::info!(migration = %migration.slug(), "Applying migration");
        match migration {
            Migration::CreateCore { core } => self.cores.create_core(core).await,
            Migration::RenameCore { from, to } => self.cores.rename_core(from, to).await,
            Migration::DeleteCore { core } => self.cores.delete_core(core).await.map(|_| ()),
            Migration::CreateFields { core, fields } => {
                self.fields.add_fields(core, fields).await.map(|_| ())
            }
            Migration::UpdateFields { core, fields } => {
                self.fields.update_fields(core, fields).await.map(|_| ())
            }
            Migration::DeleteFields { core, fields } => {
                self.fields.delete_fields(core, fields).await.map(|_| ())
            }
        }
    }

    pub async fn down(&self, migration: &Migration) -> Result<()> {
        tracing::info!(migration = %migration.slug(), "Rolling back migration");
        match migration {
            Migration::CreateCore { core } => self.cores.delete_core(core).await.map(|_| ()),
            Migration::RenameCore { from, to } => self.cores.rename_core(to, from).await,
            Migration::DeleteCore { core } => self.cores.create_core(core).await,
            Migration::CreateFields { core, fields } | Migration::UpdateFields { core, fields } => {
                let names = Migration::field_names(fields);
                self.fields.rollback_fields(core, &names).await;
                Ok(())
            }
            Migration::DeleteFields { core, fields } => {
                tracing::warn!(
                    core = %core,
                    fields = ?fields,
                    "Deleted fields cannot be restored; rollback is a no-op"
                );
                Ok(())
            }
        }
    }
}
