//! String-to-number field conversion
//!
//! Early quest uploads stored numeric fields as strings. This op rewrites
//! them with their proper types, batched per system. An unparseable value
//! aborts the run; there is no partial-result mode.

use super::upload::{QUESTS_SUBCOLLECTION, SYSTEMS_COLLECTION};
use crate::error::{Error, Result};
use crate::store::{Document, DocumentStore, Value, Write};
use std::collections::BTreeMap;
use tracing::info;

/// Fields converted from string to integer
pub const INTEGER_FIELDS: &[&str] = &["questRank"];

/// Fields converted from string to double
pub const FLOAT_FIELDS: &[&str] = &["questAuraGranted", "questEventCount"];

/// Convert string-typed numeric quest fields across all systems
///
/// Returns the number of quest documents updated.
pub async fn convert_numeric<S: DocumentStore + Sync>(store: &S) -> Result<usize> {
    let mut updated = 0;

    for system in store.list_documents(SYSTEMS_COLLECTION).await? {
        let quests_path = format!("{}/{QUESTS_SUBCOLLECTION}", system.path);
        let mut writes = Vec::new();

        for quest in store.list_documents(&quests_path).await? {
            let updates = numeric_updates(&quest)?;
            if !updates.is_empty() {
                writes.push(Write::Update {
                    path: quest.path,
                    fields: updates,
                });
            }
        }

        updated += writes.len();
        store.commit(writes).await?;
        info!(system = %system.id(), "converted system");
    }

    Ok(updated)
}

/// The typed replacements for string-typed numeric fields of one quest
fn numeric_updates(quest: &Document) -> Result<BTreeMap<String, Value>> {
    let mut updates = BTreeMap::new();

    for field in INTEGER_FIELDS {
        if let Some(Value::Text(text)) = quest.fields.get(*field) {
            let parsed = text.trim().parse::<i64>().map_err(|e| {
                Error::decode(format!("{}: {field} '{text}': {e}", quest.path))
            })?;
            updates.insert((*field).to_string(), Value::Integer(parsed));
        }
    }

    for field in FLOAT_FIELDS {
        if let Some(Value::Text(text)) = quest.fields.get(*field) {
            let parsed = text.trim().parse::<f64>().map_err(|e| {
                Error::decode(format!("{}: {field} '{text}': {e}", quest.path))
            })?;
            updates.insert((*field).to_string(), Value::Double(parsed));
        }
    }

    Ok(updates)
}
