//! CLI module
//!
//! Command-line interface for the quest tooling.
//!
//! # Commands
//!
//! - `export` - Dump a recursive YAML schema of every collection
//! - `upload` - Upload quest system YAML files
//! - `upload-csv` - Replace systems' quests from CSV sheets
//! - `migrate` - Copy a quests subcollection to a new name
//! - `convert-numeric` - Retype string-typed numeric quest fields

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
