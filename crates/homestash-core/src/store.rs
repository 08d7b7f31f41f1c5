use crate::error::Result;
use crate::model::{Child, ChildKind, Item, ItemUpdate, Location, NewItem, Tag};
use crate::query::ItemQuery;

/// The trait that storage backends implement.
///
/// Every method is one statement against the store. Callers that need several
/// statements (tag reconciliation, child sync) issue them one by one, in
/// order, with no transaction around them.
pub trait InventoryStore: Send + Sync {
    // Locations

    fn list_locations(&self) -> Result<Vec<Location>>;

    /// Insert a location. Returns the new id.
    fn insert_location(&self, name: &str, description: Option<&str>) -> Result<i64>;

    /// Returns the number of rows changed.
    fn update_location(&self, id: i64, name: &str, description: Option<&str>) -> Result<usize>;

    /// Returns the number of rows removed. Children and items are not touched.
    fn delete_location(&self, id: i64) -> Result<usize>;

    // Bins and shelves

    fn list_children(&self, kind: ChildKind) -> Result<Vec<Child>>;

    /// Ids of every child of `kind` whose `location_id` is `location_id`.
    fn child_ids(&self, kind: ChildKind, location_id: i64) -> Result<Vec<i64>>;

    /// Insert a child row. Returns the new id.
    fn insert_child(&self, kind: ChildKind, name: &str, location_id: Option<i64>) -> Result<i64>;

    /// Set both name and location of a child.
    fn update_child(
        &self,
        kind: ChildKind,
        id: i64,
        name: &str,
        location_id: Option<i64>,
    ) -> Result<usize>;

    /// Set only the name of a child.
    fn rename_child(&self, kind: ChildKind, id: i64, name: &str) -> Result<usize>;

    fn delete_child(&self, kind: ChildKind, id: i64) -> Result<usize>;

    // Tags

    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Look up a tag by exact name.
    fn find_tag(&self, name: &str) -> Result<Option<i64>>;

    /// Insert a tag. Returns the new id.
    fn insert_tag(&self, name: &str) -> Result<i64>;

    /// Remove every tag association of an item.
    fn clear_item_tags(&self, item_id: &str) -> Result<usize>;

    /// Associate a tag with an item.
    fn link_tag(&self, item_id: &str, tag_id: i64) -> Result<()>;

    // Items

    fn insert_item(&self, item: &NewItem) -> Result<()>;

    /// Overwrite every mutable column and stamp `updatedAt`.
    fn update_item(&self, id: &str, update: &ItemUpdate, updated_at: &str) -> Result<usize>;

    /// Returns the number of rows removed. Tag associations cascade.
    fn delete_item(&self, id: &str) -> Result<usize>;

    /// Count items matching the query's filters, ignoring paging.
    fn count_items(&self, q: &ItemQuery) -> Result<u64>;

    /// Fetch one page of items matching the query, sorted, with tags.
    fn list_items(&self, q: &ItemQuery) -> Result<Vec<Item>>;
}
