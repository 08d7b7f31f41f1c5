//! Homestash Core - home inventory model and storage
//!
//! This crate holds everything the HTTP server delegates to:
//!
//! - **Model**: locations, bins, shelves, items and tags as served to clients
//! - **Store**: the `InventoryStore` trait and its SQLite implementation
//! - **Tags**: delete-then-relink reconciliation of an item's tag set
//! - **Sync**: reconciling a location's bins/shelves with a desired list
//! - **Query**: filtered, sorted, paginated item listings
//! - **Config**: server configuration from TOML and environment
//!
//! # Consistency
//!
//! Every store call is a single statement. Multi-step operations issue their
//! statements in order without a transaction, so a failure part-way leaves
//! the steps already taken in place.

pub mod config;
pub mod error;
pub mod items;
pub mod locations;
pub mod model;
pub mod query;
pub mod schema;
pub mod store;
pub mod sync;
pub mod tags;

#[cfg(feature = "sqlite")]
mod sql_query;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use config::ServerConfig;
pub use error::{ConfigError, Result, StoreError};
pub use items::{create_item, update_item, ItemInput};
pub use locations::{
    create_child, create_location, update_child, update_location, ChildInput, LocationRecord,
    LocationUpdate, NewLocation,
};
pub use model::*;
pub use query::{
    query_items, total_pages, ItemPage, ItemQuery, ItemQueryParams, LocationFilter, SortDirection,
    SortKey, ALL_LOCATIONS,
};
pub use schema::Schema;
pub use store::InventoryStore;
pub use sync::{sync_children, SyncReport};
pub use tags::reconcile_tags;

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteInventoryStore;
