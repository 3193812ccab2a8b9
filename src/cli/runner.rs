//! CLI runner - executes commands

use crate::auth::{ServiceAccountKey, TokenProvider};
use crate::cli::commands::{Cli, Commands};
use crate::error::{Error, Result};
use crate::firestore::FirestoreClient;
use crate::ops::{
    convert_numeric, export_schema, migrate_subcollection, schema_to_yaml, upload_csv,
    upload_systems,
};
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.build_client()?;

        match &self.cli.command {
            Commands::Export { output } => self.export(&client, output.as_deref()).await,
            Commands::Upload {
                file,
                input_dir,
                merge,
            } => {
                self.upload(&client, file.as_deref(), input_dir.as_deref(), *merge)
                    .await
            }
            Commands::UploadCsv { csv_files } => {
                let report = upload_csv(&client, csv_files).await?;
                println!(
                    "Uploaded {} quests across {} systems.",
                    report.quests, report.systems
                );
                Ok(())
            }
            Commands::Migrate { from, to } => {
                let copied = migrate_subcollection(&client, from, to).await?;
                println!("Copied {copied} documents from '{from}' to '{to}'.");
                Ok(())
            }
            Commands::ConvertNumeric => {
                let updated = convert_numeric(&client).await?;
                println!("Converted numeric fields on {updated} quest documents.");
                Ok(())
            }
        }
    }

    /// Build the store client from the credential file, once
    fn build_client(&self) -> Result<FirestoreClient> {
        let creds = self
            .cli
            .creds
            .as_ref()
            .ok_or_else(|| Error::config("Service account key not specified (use -c flag)"))?;
        let key = ServiceAccountKey::from_file(creds)?;
        let tokens = TokenProvider::new(key);

        match &self.cli.base_url {
            Some(url) => FirestoreClient::with_base_url(tokens, url),
            None => Ok(FirestoreClient::new(tokens)),
        }
    }

    async fn export(&self, client: &FirestoreClient, output: Option<&Path>) -> Result<()> {
        let schema = export_schema(client).await?;
        let yaml = schema_to_yaml(&schema)?;

        match output {
            Some(path) => {
                std::fs::write(path, &yaml)?;
                println!("Schema has been saved to: {}", path.display());
            }
            None => println!("{yaml}"),
        }
        Ok(())
    }

    async fn upload(
        &self,
        client: &FirestoreClient,
        file: Option<&Path>,
        input_dir: Option<&Path>,
        merge: bool,
    ) -> Result<()> {
        let paths = match (file, input_dir) {
            (Some(file), None) => vec![file.to_path_buf()],
            (None, Some(dir)) => yaml_files_in(dir)?,
            _ => {
                return Err(Error::config(
                    "Specify exactly one of --file or --input-dir",
                ))
            }
        };

        let report = upload_systems(client, &paths, merge).await?;
        println!(
            "Uploaded {} systems and {} quests ({} skipped).",
            report.systems, report.quests, report.skipped
        );
        Ok(())
    }
}

/// YAML files in a directory, sorted by name
fn yaml_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
            )
        })
        .collect();
    paths.sort();
    Ok(paths)
}
