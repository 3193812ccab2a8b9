//! Schema export
//!
//! Walks every root collection and dumps the aggregated schema tree as
//! YAML, the shape quest content is reviewed and diffed in.

use crate::error::Result;
use crate::schema::{SchemaWalker, StoreSchema};
use crate::store::DocumentStore;

/// Compute the schema of every root collection
pub async fn export_schema<S: DocumentStore + Sync>(store: &S) -> Result<StoreSchema> {
    SchemaWalker::new(store).store_schema().await
}

/// Serialize a store schema to YAML
pub fn schema_to_yaml(schema: &StoreSchema) -> Result<String> {
    Ok(serde_yaml::to_string(schema)?)
}
