//! Schema walker
//!
//! Depth-first traversal of the store's document tree, building a
//! [`CollectionSchema`] per collection. Single-pass and sequential; a
//! store failure anywhere aborts the whole walk.

use super::inference::{infer_fields, merge};
use super::types::{CollectionSchema, Schema, StoreSchema};
use crate::error::Result;
use crate::store::{Document, DocumentStore};
use futures::future::{BoxFuture, FutureExt};
use std::collections::BTreeMap;
use tracing::info;

/// Walks a document store and aggregates schemas
pub struct SchemaWalker<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore + Sync> SchemaWalker<'a, S> {
    /// Create a walker over the given store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Compute the schema of every root collection
    pub async fn store_schema(&self) -> Result<StoreSchema> {
        let mut schemas = BTreeMap::new();
        for name in self.store.list_collections(None).await? {
            info!(collection = %name, "scanning collection");
            let collection = self.collection_schema(name.clone()).await?;
            schemas.insert(name, collection);
        }
        Ok(schemas)
    }

    /// Aggregate the schemas of every document in one collection
    ///
    /// The first document's schema is kept verbatim as the example; the
    /// running schema folds `merge` in enumeration order. Boxed because the
    /// recursion alternates with `document_schema`.
    pub fn collection_schema(&self, path: String) -> BoxFuture<'_, Result<CollectionSchema>> {
        async move {
            let mut aggregated: Option<Schema> = None;
            let mut example: Option<Schema> = None;

            for doc in self.store.list_documents(&path).await? {
                let doc_schema = self.document_schema(&doc).await?;
                if example.is_none() {
                    example = Some(doc_schema.clone());
                }
                aggregated = Some(match aggregated {
                    None => doc_schema,
                    Some(acc) => merge(&acc, &doc_schema),
                });
            }

            Ok(CollectionSchema {
                schema: aggregated,
                example,
            })
        }
        .boxed()
    }

    /// Compute the full recursive schema of one document, including any
    /// subcollections it owns
    async fn document_schema(&self, doc: &Document) -> Result<Schema> {
        let mut schema = infer_fields(&doc.fields);

        let child_ids = self.store.list_collections(Some(&doc.path)).await?;
        if !child_ids.is_empty() {
            let mut children = BTreeMap::new();
            for id in child_ids {
                info!(subcollection = %id, document = %doc.path, "scanning subcollection");
                let child = self
                    .collection_schema(format!("{}/{}", doc.path, id))
                    .await?;
                children.insert(id, child);
            }
            // A field map always infers to an object, so the children can
            // be attached directly.
            if let Schema::Object { subcollections, .. } = &mut schema {
                *subcollections = children;
            }
        }

        Ok(schema)
    }
}
