// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # quest-tools
//!
//! One-off tooling for quest game content in Firestore: export a recursive
//! type schema of every collection, migrate and retype existing documents,
//! and bulk-upload quest systems from YAML or CSV.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quest_tools::auth::{ServiceAccountKey, TokenProvider};
//! use quest_tools::firestore::FirestoreClient;
//! use quest_tools::ops::{export_schema, schema_to_yaml};
//! use quest_tools::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let key = ServiceAccountKey::from_file("serviceAccountKey.json")?;
//!     let client = FirestoreClient::new(TokenProvider::new(key));
//!
//!     let schema = export_schema(&client).await?;
//!     println!("{}", schema_to_yaml(&schema)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           ops                                │
//! │  export    upload    upload-csv    migrate    convert-numeric│
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ DocumentStore (trait)
//!               ┌────────────────┴────────────────┐
//!               │                                 │
//!        FirestoreClient                    MemoryStore
//!        (REST + auth)                      (tests, dry runs)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Service-account authentication
pub mod auth;

/// Document store trait and domain model
pub mod store;

/// Firestore REST backend
pub mod firestore;

/// Schema inference, merging, and the store walker
pub mod schema;

/// Quest content models (YAML systems, CSV sheets)
pub mod quests;

/// One-off operations
pub mod ops;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use store::{Document, DocumentStore, Value, Write};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
