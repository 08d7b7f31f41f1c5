use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;

use crate::error::{Result, StoreError};
use crate::model::{Child, ChildKind, Item, ItemUpdate, Location, NewItem, Tag};
use crate::query::ItemQuery;
use crate::schema::Schema;
use crate::sql_query::compile_query;
use crate::store::InventoryStore;

const ITEM_COLUMNS: &str = "i.id, i.name, i.description, i.quantity, i.location_id, i.bin_id, \
                            i.shelf_id, i.createdAt, i.updatedAt";

/// SQLite-backed implementation of the InventoryStore trait.
///
/// One connection serves the whole process. The lock is held for a single
/// statement, so statements from concurrent requests can interleave.
pub struct SqliteInventoryStore {
    conn: Mutex<Connection>,
}

impl SqliteInventoryStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let conn = Connection::open(path)?;
        tracing::info!("Opened inventory database at {}", path.display());
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        conn.execute_batch(Schema::pragmas())?;
        conn.execute_batch(Schema::create_tables())?;
        tracing::debug!("Inventory tables ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::storage(format!("connection lock poisoned: {}", e)))
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Item, Option<String>)> {
        let item = Item {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            quantity: row.get(3)?,
            location_id: row.get(4)?,
            bin_id: row.get(5)?,
            shelf_id: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            tags: Vec::new(),
        };
        let tags_json: Option<String> = row.get(9)?;
        Ok((item, tags_json))
    }
}

/// Name of the SQL function used for case-insensitive search.
pub(crate) const FOLD_CASE_FN: &str = "fold_case";

/// Register `fold_case(text)`, a Unicode lowercase. SQLite's own `LIKE` and
/// `lower()` only fold ASCII.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

/// One element of the `json_group_array` tag aggregate. Items without tags
/// aggregate to a single element whose fields are both null.
#[derive(Deserialize)]
struct AggregatedTag {
    id: Option<i64>,
    name: Option<String>,
}

/// Parse the tag aggregate, dropping the null placeholder of an empty join.
pub(crate) fn parse_tag_aggregate(json: Option<&str>) -> Result<Vec<Tag>> {
    let Some(json) = json else {
        return Ok(Vec::new());
    };
    let raw: Vec<AggregatedTag> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .filter_map(|t| match (t.id, t.name) {
            (Some(id), Some(name)) => Some(Tag { id, name }),
            _ => None,
        })
        .collect())
}

impl InventoryStore for SqliteInventoryStore {
    fn list_locations(&self) -> Result<Vec<Location>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, description FROM locations ORDER BY id")?;
        let locations = stmt
            .query_map([], |row| {
                Ok(Location {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    fn insert_location(&self, name: &str, description: Option<&str>) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO locations (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_location(&self, id: i64, name: &str, description: Option<&str>) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE locations SET name = ?1, description = ?2 WHERE id = ?3",
            params![name, description, id],
        )?;
        Ok(changed)
    }

    fn delete_location(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM locations WHERE id = ?1", params![id])?;
        Ok(removed)
    }

    fn list_children(&self, kind: ChildKind) -> Result<Vec<Child>> {
        let conn = self.conn()?;
        let sql = format!("SELECT id, name, location_id FROM {} ORDER BY id", kind.table());
        let mut stmt = conn.prepare(&sql)?;
        let children = stmt
            .query_map([], |row| {
                Ok(Child {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    location_id: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(children)
    }

    fn child_ids(&self, kind: ChildKind, location_id: i64) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT id FROM {} WHERE location_id = ?1 ORDER BY id",
            kind.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params![location_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn insert_child(&self, kind: ChildKind, name: &str, location_id: Option<i64>) -> Result<i64> {
        let conn = self.conn()?;
        let sql = format!(
            "INSERT INTO {} (name, location_id) VALUES (?1, ?2)",
            kind.table()
        );
        conn.execute(&sql, params![name, location_id])?;
        Ok(conn.last_insert_rowid())
    }

    fn update_child(
        &self,
        kind: ChildKind,
        id: i64,
        name: &str,
        location_id: Option<i64>,
    ) -> Result<usize> {
        let conn = self.conn()?;
        let sql = format!(
            "UPDATE {} SET name = ?1, location_id = ?2 WHERE id = ?3",
            kind.table()
        );
        Ok(conn.execute(&sql, params![name, location_id, id])?)
    }

    fn rename_child(&self, kind: ChildKind, id: i64, name: &str) -> Result<usize> {
        let conn = self.conn()?;
        let sql = format!("UPDATE {} SET name = ?1 WHERE id = ?2", kind.table());
        Ok(conn.execute(&sql, params![name, id])?)
    }

    fn delete_child(&self, kind: ChildKind, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        Ok(conn.execute(&sql, params![id])?)
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM tags")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn find_tag(&self, name: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id: Option<i64> = conn
            .query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    fn insert_tag(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO tags (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    fn clear_item_tags(&self, item_id: &str) -> Result<usize> {
        let conn = self.conn()?;
        Ok(conn.execute("DELETE FROM item_tags WHERE item_id = ?1", params![item_id])?)
    }

    fn link_tag(&self, item_id: &str, tag_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO item_tags (item_id, tag_id) VALUES (?1, ?2)",
            params![item_id, tag_id],
        )?;
        Ok(())
    }

    fn insert_item(&self, item: &NewItem) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO items (id, name, description, quantity, location_id, bin_id, shelf_id, createdAt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                item.id,
                item.name,
                item.description,
                item.quantity,
                item.location_id,
                item.bin_id,
                item.shelf_id,
                item.created_at,
            ],
        )?;
        Ok(())
    }

    fn update_item(&self, id: &str, update: &ItemUpdate, updated_at: &str) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE items SET name = ?1, description = ?2, quantity = ?3, location_id = ?4,
                    bin_id = ?5, shelf_id = ?6, updatedAt = ?7
             WHERE id = ?8",
            params![
                update.name,
                update.description,
                update.quantity,
                update.location_id,
                update.bin_id,
                update.shelf_id,
                updated_at,
                id,
            ],
        )?;
        Ok(changed)
    }

    fn delete_item(&self, id: &str) -> Result<usize> {
        let conn = self.conn()?;
        // item_tags rows go with it via ON DELETE CASCADE
        Ok(conn.execute("DELETE FROM items WHERE id = ?1", params![id])?)
    }

    fn count_items(&self, q: &ItemQuery) -> Result<u64> {
        let conn = self.conn()?;
        let compiled = compile_query(q);

        let sql = format!("SELECT COUNT(*) FROM items i {}", compiled.where_clause);
        let params_ref: Vec<&dyn ToSql> =
            compiled.params.iter().map(|p| p as &dyn ToSql).collect();

        let count: i64 = conn.query_row(&sql, params_ref.as_slice(), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn list_items(&self, q: &ItemQuery) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let compiled = compile_query(q);

        let sql = format!(
            "SELECT {ITEM_COLUMNS},
                    json_group_array(json_object('id', t.id, 'name', t.name)) AS tags
             FROM items i
             LEFT JOIN item_tags it ON i.id = it.item_id
             LEFT JOIN tags t ON it.tag_id = t.id
             {}
             GROUP BY i.id
             {}
             LIMIT ? OFFSET ?",
            compiled.where_clause, compiled.order_clause
        );

        let mut params_ref: Vec<&dyn ToSql> =
            compiled.params.iter().map(|p| p as &dyn ToSql).collect();
        params_ref.push(&compiled.limit);
        params_ref.push(&compiled.offset);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), Self::row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for (mut item, tags_json) in rows {
            item.tags = parse_tag_aggregate(tags_json.as_deref())?;
            items.push(item);
        }
        Ok(items)
    }
}
