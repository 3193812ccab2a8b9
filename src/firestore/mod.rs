//! Firestore REST backend
//!
//! A [`FirestoreClient`] implements [`crate::store::DocumentStore`] over
//! the v1 REST API: paginated listing of collections and documents, typed
//! value decoding, single-document sets, and batched commits.

mod client;
mod codec;

pub use client::{FirestoreClient, DEFAULT_BASE_URL};
pub use codec::{decode_fields, decode_value, encode_fields, encode_value};
