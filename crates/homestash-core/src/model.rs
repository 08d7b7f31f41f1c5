//! Inventory entities as they are stored and served.
//!
//! Field names follow the wire format used by the web client, so items keep
//! `location_id`, `createdAt` and friends verbatim.

use serde::{Deserialize, Serialize};

/// A place that holds bins, shelves and items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Which child table of a location an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Bins,
    Shelves,
}

impl ChildKind {
    /// Table name. Only these two literals ever reach SQL text.
    pub fn table(self) -> &'static str {
        match self {
            ChildKind::Bins => "bins",
            ChildKind::Shelves => "shelves",
        }
    }

    /// Singular noun for log lines
    pub fn noun(self) -> &'static str {
        match self {
            ChildKind::Bins => "bin",
            ChildKind::Shelves => "shelf",
        }
    }
}

impl std::fmt::Display for ChildKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A bin or a shelf. Both tables have the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub name: String,
    pub location_id: Option<i64>,
}

/// One entry of the desired child list sent on a location update.
///
/// An entry with an `id` keeps (and renames) that row; an entry without one
/// becomes a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredChild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl DesiredChild {
    pub fn existing(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A shared label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A tag as requested by a client: either a bare name or an object with one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestedTag {
    Name(String),
    Object {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl RequestedTag {
    pub fn name(&self) -> Option<&str> {
        match self {
            RequestedTag::Name(name) => Some(name),
            RequestedTag::Object { name, .. } => name.as_deref(),
        }
    }
}

/// Flatten requested tags into the names the reconciler works with.
///
/// Entries with no name become empty strings, which the reconciler skips.
pub fn tag_names(tags: &[RequestedTag]) -> Vec<String> {
    tags.iter()
        .map(|t| t.name().unwrap_or_default().to_string())
        .collect()
}

/// Column values for inserting an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub location_id: Option<i64>,
    pub bin_id: Option<i64>,
    pub shelf_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

/// Column values for updating an item. `updatedAt` is stamped by the store
/// caller, not taken from the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub location_id: Option<i64>,
    pub bin_id: Option<i64>,
    pub shelf_id: Option<i64>,
}

/// An item row with its aggregated tags, as returned by the query engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub location_id: Option<i64>,
    pub bin_id: Option<i64>,
    pub shelf_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    pub tags: Vec<Tag>,
}

/// Current time in the ISO-8601 form the client writes (`...T...Z`, millis).
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
