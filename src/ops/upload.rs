//! Quest system YAML upload
//!
//! Uploads quest system files: one system document per file under
//! `questSystems`, each quest under its `quests` subcollection. Files
//! missing system metadata and quests missing an id are skipped with a
//! warning; everything else is all-or-nothing.

use crate::error::{Error, Result};
use crate::quests::QuestSystemFile;
use crate::store::DocumentStore;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Root collection holding quest systems
pub const SYSTEMS_COLLECTION: &str = "questSystems";

/// Subcollection holding a system's quests
pub const QUESTS_SUBCOLLECTION: &str = "quests";

/// Counts of what an upload touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// System documents written
    pub systems: usize,
    /// Quest documents written
    pub quests: usize,
    /// Files or quest entries skipped over
    pub skipped: usize,
}

/// Upload quest system YAML files
///
/// With `merge` the documents are merged into any existing ones instead of
/// replacing them.
pub async fn upload_systems<S: DocumentStore + Sync>(
    store: &S,
    paths: &[PathBuf],
    merge: bool,
) -> Result<UploadReport> {
    let mut report = UploadReport::default();

    for path in paths {
        if !is_yaml(path) {
            warn!(path = %path.display(), "skipping non-YAML file");
            report.skipped += 1;
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        let system = QuestSystemFile::from_yaml_str(&content)?;

        if let Err(e) = system.validate() {
            warn!(path = %path.display(), error = %e, "skipping invalid system file");
            report.skipped += 1;
            continue;
        }

        let system_path = format!("{SYSTEMS_COLLECTION}/{}", system.id);
        store.set(&system_path, system.system_fields()?, merge).await?;
        info!(system = %system.id, name = %system.short_name, "uploaded system");
        report.systems += 1;

        for quest in &system.quests {
            let Some(quest_id) = &quest.quest_id else {
                warn!(path = %path.display(), "skipping quest without questId");
                report.skipped += 1;
                continue;
            };

            let quest_path = format!("{system_path}/{QUESTS_SUBCOLLECTION}/{quest_id}");
            store.set(&quest_path, quest.quest_fields()?, merge).await?;
            info!(quest = %quest_id, "uploaded quest");
            report.quests += 1;
        }
    }

    Ok(report)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
    )
}
