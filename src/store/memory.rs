//! In-memory document store
//!
//! Backs tests and dry runs. Documents live in a `BTreeMap` keyed by path,
//! so enumeration order is stable (sorted by path).

use super::types::{Document, Value, Write};
use super::DocumentStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory implementation of [`DocumentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Document path -> field map
    documents: RwLock<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, replacing any existing one at the same path
    pub async fn insert(&self, path: impl Into<String>, fields: BTreeMap<String, Value>) {
        self.documents.write().await.insert(path.into(), fields);
    }

    /// Fetch a single document by path
    pub async fn get(&self, path: &str) -> Option<Document> {
        self.documents
            .read()
            .await
            .get(path)
            .map(|fields| Document::new(path, fields.clone()))
    }

    /// Number of documents in the store
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_collections(&self, parent: Option<&str>) -> Result<Vec<String>> {
        let docs = self.documents.read().await;
        let parent_segs = parent.map(segments).unwrap_or_default();

        let mut ids: Vec<String> = Vec::new();
        for path in docs.keys() {
            let segs = segments(path);
            // A document path under `parent` has at least two more segments:
            // the collection id and the document id.
            if segs.len() < parent_segs.len() + 2 {
                continue;
            }
            if segs[..parent_segs.len()] != parent_segs[..] {
                continue;
            }
            let id = segs[parent_segs.len()].to_string();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let docs = self.documents.read().await;
        let coll_segs = segments(collection);

        let mut out = Vec::new();
        for (path, fields) in docs.iter() {
            let segs = segments(path);
            if segs.len() != coll_segs.len() + 1 {
                continue;
            }
            if segs[..coll_segs.len()] != coll_segs[..] {
                continue;
            }
            out.push(Document::new(path.clone(), fields.clone()));
        }
        Ok(out)
    }

    async fn set(&self, path: &str, fields: BTreeMap<String, Value>, merge: bool) -> Result<()> {
        let mut docs = self.documents.write().await;
        if merge {
            docs.entry(path.to_string()).or_default().extend(fields);
        } else {
            docs.insert(path.to_string(), fields);
        }
        Ok(())
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        let mut docs = self.documents.write().await;
        for write in writes {
            match write {
                Write::Set {
                    path,
                    fields,
                    merge,
                } => {
                    if merge {
                        docs.entry(path).or_default().extend(fields);
                    } else {
                        docs.insert(path, fields);
                    }
                }
                Write::Update { path, fields } => {
                    let existing = docs
                        .get_mut(&path)
                        .ok_or_else(|| Error::Other(format!("no document to update: {path}")))?;
                    existing.extend(fields);
                }
                Write::Delete { path } => {
                    docs.remove(&path);
                }
            }
        }
        Ok(())
    }
}
