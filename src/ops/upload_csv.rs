//! Quest CSV upload
//!
//! Replaces each named system's quests with the CSV contents: the system
//! document is upserted, its existing quests subcollection cleared, and
//! every row uploaded as a fresh quest document.

use super::upload::{UploadReport, QUESTS_SUBCOLLECTION, SYSTEMS_COLLECTION};
use crate::error::{Error, Result};
use crate::quests::{parse_quest_csv, QuestRow};
use crate::store::{DocumentStore, Value, Write};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Upload quest CSV files, grouping rows across files by system name
pub async fn upload_csv<S: DocumentStore + Sync>(
    store: &S,
    paths: &[PathBuf],
) -> Result<UploadReport> {
    let mut systems: BTreeMap<String, Vec<QuestRow>> = BTreeMap::new();
    for path in paths {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        for (name, mut rows) in parse_quest_csv(&content)? {
            systems.entry(name).or_default().append(&mut rows);
        }
    }

    let mut report = UploadReport::default();
    for (system_name, rows) in &systems {
        info!(system = %system_name, quests = rows.len(), "processing system");
        let system_path = format!("{SYSTEMS_COLLECTION}/{system_name}");

        // Ensure the system document exists and carries its name
        let name_field = BTreeMap::from([(
            "name".to_string(),
            Value::Text(system_name.clone()),
        )]);
        store.set(&system_path, name_field, true).await?;
        report.systems += 1;

        // Clear existing quests before re-uploading
        let quests_path = format!("{system_path}/{QUESTS_SUBCOLLECTION}");
        let deletes: Vec<Write> = store
            .list_documents(&quests_path)
            .await?
            .into_iter()
            .map(|doc| Write::Delete { path: doc.path })
            .collect();
        if !deletes.is_empty() {
            info!(system = %system_name, count = deletes.len(), "clearing existing quests");
            store.commit(deletes).await?;
        }

        for row in rows {
            let quest_path = format!("{quests_path}/{}", row.doc_id());
            store.set(&quest_path, row.fields(), false).await?;
            info!(quest = %row.quest_name, rank = row.quest_rank, "uploaded quest");
            report.quests += 1;
        }
    }

    Ok(report)
}
