//! Document store abstraction
//!
//! The schema walker and every migration op run against this trait so they
//! can be exercised in-memory and pointed at the real store unchanged. The
//! client instance is constructed once by the CLI bootstrap and passed in by
//! reference; there is no process-global client.

mod memory;
mod types;

pub use memory::MemoryStore;
pub use types::{Document, Value, Write};

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Read/write access to a tree-shaped document store
///
/// Paths are relative to the database root: a collection path has an odd
/// number of `/`-separated segments (`questSystems`,
/// `questSystems/walk/quests`), a document path an even number.
///
/// All calls are sequential and blocking from the caller's point of view;
/// nothing here retries or parallelizes. Failures abort the whole run.
#[async_trait]
pub trait DocumentStore {
    /// List the collection ids under a document, or the root collections
    /// when `parent` is `None`
    async fn list_collections(&self, parent: Option<&str>) -> Result<Vec<String>>;

    /// List all documents of a collection, in the store's stable
    /// enumeration order
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>>;

    /// Create or replace a single document
    async fn set(&self, path: &str, fields: BTreeMap<String, Value>, merge: bool) -> Result<()>;

    /// Apply a batch of writes atomically
    async fn commit(&self, writes: Vec<Write>) -> Result<()>;
}
