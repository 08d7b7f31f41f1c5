//! Tag reconciliation for items.
//!
//! The stored association set is replaced wholesale: every link of the item is
//! removed, then each requested name is resolved (creating the tag if needed)
//! and linked again. Individual tag failures are logged and skipped.

use crate::error::Result;
use crate::store::InventoryStore;

/// Make the item's tag associations match `names`.
///
/// Blank names are skipped. A failure while resolving or linking one tag is
/// logged and the remaining names are still processed; links already made
/// stay in place. Only a failure to clear the existing links is returned.
pub fn reconcile_tags<S>(store: &S, item_id: &str, names: &[String]) -> Result<()>
where
    S: InventoryStore + ?Sized,
{
    let cleared = store.clear_item_tags(item_id)?;
    tracing::debug!(item_id, cleared, requested = names.len(), "reconciling tags");

    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        if let Err(e) = link_by_name(store, item_id, name) {
            tracing::warn!(item_id, tag = %name, error = %e, "Error processing tag");
        }
    }

    Ok(())
}

fn link_by_name<S>(store: &S, item_id: &str, name: &str) -> Result<()>
where
    S: InventoryStore + ?Sized,
{
    let tag_id = match store.find_tag(name)? {
        Some(id) => id,
        None => store.insert_tag(name)?,
    };
    store.link_tag(item_id, tag_id)
}
