//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quest content tooling for Firestore
#[derive(Parser, Debug)]
#[command(name = "quest-tools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the service account key JSON file
    #[arg(short = 'c', long, global = true)]
    pub creds: Option<PathBuf>,

    /// Override the API base URL (emulator or tests)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a recursive YAML schema of every collection, including
    /// subcollections
    Export {
        /// Output YAML file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload quest system YAML files
    Upload {
        /// Path to a single quest YAML file
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// Directory containing quest YAML files
        #[arg(short = 'i', long)]
        input_dir: Option<PathBuf>,

        /// Merge with existing documents instead of overwriting
        #[arg(long)]
        merge: bool,
    },

    /// Upload quest CSV sheets, replacing each system's quests
    UploadCsv {
        /// One or more CSV files
        #[arg(required = true)]
        csv_files: Vec<PathBuf>,
    },

    /// Copy every document of one quests subcollection name to another
    Migrate {
        /// Subcollection name to copy from
        #[arg(long)]
        from: String,

        /// Subcollection name to copy to
        #[arg(long)]
        to: String,
    },

    /// Convert string-typed numeric quest fields to their proper types
    ConvertNumeric,
}
