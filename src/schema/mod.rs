//! Schema inference module
//!
//! Infers a compact type schema for every collection in the store by
//! walking documents and subcollections recursively and merging the
//! per-document schemas, collapsing type conflicts into a `mixed` marker.

mod inference;
mod types;
mod walker;

pub use inference::{infer, infer_fields, merge, merge_collections};
pub use types::{CollectionSchema, ScalarKind, Schema, StoreSchema};
pub use walker::SchemaWalker;

#[cfg(test)]
mod tests;
