//! # solrbridge
//!
//! A client for Apache Solr's HTTP APIs: a fluent `/select` query builder,
//! core and schema administration, document updates, and replayable schema
//! migrations.
//!
//! Every operation is one HTTP call (or a short sequential series for field
//! batches). Solr owns indexing, querying and storage; this crate only
//! encodes requests and interprets `responseHeader.status`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use solrbridge::{QueryBuilder, SolrClient, SolrConfig};
//!
//! # async fn run() -> solrbridge::Result<()> {
//! // Reads SOLR_URL (default http://localhost:8983/solr)
//! let client = SolrClient::new(SolrConfig::from_env()?)?;
//!
//! let outcome = QueryBuilder::new(client, "products")
//!     .search("title", "like", "laptop", Some(2.0))
//!     .and_where("price", "<", "2000", None)
//!     .where_in("brand", ["Apple", "Lenovo"])
//!     .rows(20)
//!     .get()
//!     .await;
//!
//! println!("Found {} hits", outcome.num_found());
//! # Ok(())
//! # }
//! ```
//!
//! ## Schema changes
//!
//! ```rust,no_run
//! use solrbridge::{FieldsAdmin, SchemaBuilder, SolrClient, SolrConfig};
//!
//! # async fn run() -> solrbridge::Result<()> {
//! let client = SolrClient::new(SolrConfig::default())?;
//! let fields = SchemaBuilder::new()
//!     .name("title").field_type("text_general").required(true)
//!     .name("tags").field_type("strings").multi_valued(true)
//!     .into_fields();
//!
//! // All or nothing: on the first failure the fields already added are removed.
//! FieldsAdmin::new(client).add_fields("products", &fields).await?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod client;
pub mod config;
pub mod documents;
pub mod error;
pub mod migration;
pub mod query;
pub mod schema;
pub mod types;

pub use admin::{BatchReport, CoreAdmin, FieldAction, FieldOutcome, FieldStatus, FieldsAdmin};
pub use client::SolrClient;
pub use config::SolrConfig;
pub use documents::DocumentStore;
pub use error::{Result, SolrError};
pub use migration::{Migration, MigrationFile, Migrator};
pub use query::{FacetedResults, JoinConditions, QueryBuilder, QueryOutcome};
pub use schema::{FieldSpec, SchemaBuilder};
pub use types::*;
