//! Item writes: row insert/update followed by tag reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{now_timestamp, tag_names, ItemUpdate, NewItem, RequestedTag};
use crate::store::InventoryStore;
use crate::tags::reconcile_tags;

/// Body of an item create or update.
///
/// `id` and `createdAt` only matter on create. `tags` absent means "leave the
/// associations alone"; an empty list clears them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub bin_id: Option<i64>,
    #[serde(default)]
    pub shelf_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<RequestedTag>>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl ItemInput {
    fn to_update(&self) -> ItemUpdate {
        ItemUpdate {
            name: self.name.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            location_id: self.location_id,
            bin_id: self.bin_id,
            shelf_id: self.shelf_id,
        }
    }
}

/// Insert an item and reconcile its tags. Returns the id used.
///
/// Clients normally generate the id; a missing or empty one gets a fresh
/// UUID. A missing `createdAt` is stamped with the current time.
pub fn create_item<S>(store: &S, input: &ItemInput) -> Result<String>
where
    S: InventoryStore + ?Sized,
{
    let id = match input.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let row = NewItem {
        id: id.clone(),
        name: input.name.clone(),
        description: input.description.clone(),
        quantity: input.quantity,
        location_id: input.location_id,
        bin_id: input.bin_id,
        shelf_id: input.shelf_id,
        created_at: Some(input.created_at.clone().unwrap_or_else(now_timestamp)),
    };
    store.insert_item(&row)?;
    tracing::info!(item_id = %id, "created item");

    if let Some(tags) = &input.tags {
        reconcile_tags(store, &id, &tag_names(tags))?;
    }
    Ok(id)
}

/// Overwrite an item's mutable columns, stamp `updatedAt` and reconcile tags
/// when supplied. Returns the number of rows changed.
pub fn update_item<S>(store: &S, id: &str, input: &ItemInput) -> Result<usize>
where
    S: InventoryStore + ?Sized,
{
    let changed = store.update_item(id, &input.to_update(), &now_timestamp())?;
    tracing::debug!(item_id = id, changed, "updated item");

    if let Some(tags) = &input.tags {
        reconcile_tags(store, id, &tag_names(tags))?;
    }
    Ok(changed)
}
