//! One-off operations
//!
//! Each op is a linear pipeline over a [`crate::store::DocumentStore`]
//! reference: read input, transform, write output, done. No retries, no
//! resume; a failure aborts the run.

mod convert;
mod export;
mod migrate;
mod upload;
mod upload_csv;

pub use convert::{convert_numeric, FLOAT_FIELDS, INTEGER_FIELDS};
pub use export::{export_schema, schema_to_yaml};
pub use migrate::migrate_subcollection;
pub use upload::{upload_systems, UploadReport, QUESTS_SUBCOLLECTION, SYSTEMS_COLLECTION};
pub use upload_csv::upload_csv;
