//! Location child synchronization.
//!
//! A location update carries the full desired list of bins (or shelves).
//! Rows missing from that list are deleted, listed rows with an id are
//! renamed, and entries without an id are inserted. Each step is its own
//! statement and nothing is wrapped in a transaction.

use std::collections::HashSet;

use crate::error::Result;
use crate::model::{ChildKind, DesiredChild};
use crate::store::InventoryStore;

/// What a sync pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted: Vec<i64>,
    pub renamed: Vec<i64>,
    pub inserted: Vec<i64>,
}

/// Reconcile the `kind` children of `location_id` with `desired`.
///
/// `None` leaves the stored children untouched; `Some(&[])` deletes them all.
/// The first failing statement aborts the pass and is returned; statements
/// already executed are not undone.
pub fn sync_children<S>(
    store: &S,
    kind: ChildKind,
    location_id: i64,
    desired: Option<&[DesiredChild]>,
) -> Result<SyncReport>
where
    S: InventoryStore + ?Sized,
{
    let Some(desired) = desired else {
        return Ok(SyncReport::default());
    };

    let existing = store.child_ids(kind, location_id)?;
    let keep: HashSet<i64> = desired.iter().filter_map(|c| c.id).collect();

    let mut report = SyncReport::default();

    for id in existing.into_iter().filter(|id| !keep.contains(id)) {
        store.delete_child(kind, id)?;
        report.deleted.push(id);
    }

    for child in desired {
        match child.id {
            Some(id) => {
                store.rename_child(kind, id, &child.name)?;
                report.renamed.push(id);
            }
            None => {
                let id = store.insert_child(kind, &child.name, Some(location_id))?;
                report.inserted.push(id);
            }
        }
    }

    tracing::debug!(
        location_id,
        kind = %kind,
        deleted = report.deleted.len(),
        renamed = report.renamed.len(),
        inserted = report.inserted.len(),
        "synced location children"
    );
    Ok(report)
}
