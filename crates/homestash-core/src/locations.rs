//! Location and child (bin/shelf) writes.
//!
//! Creating a location also creates the bins and shelves named in the
//! request; updating one syncs its children against the desired lists.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::model::{Child, ChildKind, DesiredChild};
use crate::store::InventoryStore;
use crate::sync::sync_children;

const NAME_REQUIRED: &str = "Name is required";

/// Body of a location create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bins: Option<Vec<String>>,
    #[serde(default)]
    pub shelves: Option<Vec<String>>,
}

/// Body of a location update. Child lists carry ids for rows to keep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bins: Option<Vec<DesiredChild>>,
    #[serde(default)]
    pub shelves: Option<Vec<DesiredChild>>,
}

/// A written location echoed back with the child lists from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord<C> {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<Vec<C>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelves: Option<Vec<C>>,
}

/// Body of a flat bin/shelf create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location_id: Option<i64>,
}

fn required_name(name: Option<&str>) -> Result<&str> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(StoreError::Validation(NAME_REQUIRED.to_string())),
    }
}

/// Insert a location and its initial bins and shelves.
///
/// A child that fails to insert is logged and skipped; the location itself
/// is still reported as created.
pub fn create_location<S>(store: &S, input: &NewLocation) -> Result<LocationRecord<String>>
where
    S: InventoryStore + ?Sized,
{
    let name = required_name(input.name.as_deref())?;
    let id = store.insert_location(name, input.description.as_deref())?;
    tracing::info!(location_id = id, name, "created location");

    for (kind, names) in [
        (ChildKind::Bins, input.bins.as_deref()),
        (ChildKind::Shelves, input.shelves.as_deref()),
    ] {
        for child in names.unwrap_or_default() {
            if let Err(e) = store.insert_child(kind, child, Some(id)) {
                tracing::warn!(
                    location_id = id,
                    name = %child,
                    error = %e,
                    "Error inserting {}",
                    kind.noun()
                );
            }
        }
    }

    Ok(LocationRecord {
        id,
        name: name.to_string(),
        description: input.description.clone(),
        bins: input.bins.clone(),
        shelves: input.shelves.clone(),
    })
}

/// Update a location's columns, then sync its bins and then its shelves.
///
/// Any failing statement stops the update and is returned. Steps already
/// applied stay applied.
pub fn update_location<S>(
    store: &S,
    id: i64,
    input: &LocationUpdate,
) -> Result<LocationRecord<DesiredChild>>
where
    S: InventoryStore + ?Sized,
{
    let name = required_name(input.name.as_deref())?;
    let changed = store.update_location(id, name, input.description.as_deref())?;
    tracing::debug!(location_id = id, changed, "updated location");

    sync_children(store, ChildKind::Bins, id, input.bins.as_deref())?;
    sync_children(store, ChildKind::Shelves, id, input.shelves.as_deref())?;

    Ok(LocationRecord {
        id,
        name: name.to_string(),
        description: input.description.clone(),
        bins: input.bins.clone(),
        shelves: input.shelves.clone(),
    })
}

/// Insert a standalone bin or shelf.
pub fn create_child<S>(store: &S, kind: ChildKind, input: &ChildInput) -> Result<Child>
where
    S: InventoryStore + ?Sized,
{
    let name = required_name(input.name.as_deref())?;
    let id = store.insert_child(kind, name, input.location_id)?;
    Ok(Child {
        id,
        name: name.to_string(),
        location_id: input.location_id,
    })
}

/// Overwrite a bin's or shelf's name and location.
pub fn update_child<S>(store: &S, kind: ChildKind, id: i64, input: &ChildInput) -> Result<Child>
where
    S: InventoryStore + ?Sized,
{
    let name = required_name(input.name.as_deref())?;
    store.update_child(kind, id, name, input.location_id)?;
    Ok(Child {
        id,
        name: name.to_string(),
        location_id: input.location_id,
    })
}
