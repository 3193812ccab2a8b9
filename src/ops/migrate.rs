//! Subcollection rename migration
//!
//! Copies every document of one subcollection name to another across all
//! quest systems, batched per system. Source documents are left in place;
//! deleting them is a separate, deliberate step.

use super::upload::SYSTEMS_COLLECTION;
use crate::error::Result;
use crate::store::{DocumentStore, Write};
use tracing::info;

/// Copy `questSystems/*/{from}/*` to `questSystems/*/{to}/*`
///
/// Returns the number of documents copied.
pub async fn migrate_subcollection<S: DocumentStore + Sync>(
    store: &S,
    from: &str,
    to: &str,
) -> Result<usize> {
    let mut copied = 0;

    for system in store.list_documents(SYSTEMS_COLLECTION).await? {
        let old_path = format!("{}/{from}", system.path);
        let writes: Vec<Write> = store
            .list_documents(&old_path)
            .await?
            .into_iter()
            .map(|doc| Write::Set {
                path: format!("{}/{to}/{}", system.path, doc.id()),
                fields: doc.fields,
                merge: false,
            })
            .collect();

        copied += writes.len();
        store.commit(writes).await?;
        info!(system = %system.id(), "migrated system");
    }

    Ok(copied)
}
