//! SQLite schema for the inventory store

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Connection settings applied before the tables are created.
    ///
    /// Foreign keys must be on for the `item_tags` cascades to fire.
    pub fn pragmas() -> &'static str {
        "PRAGMA foreign_keys = ON;"
    }

    /// Get the complete schema SQL. Every statement is create-if-absent.
    pub fn create_tables() -> &'static str {
        r#"
-- Places
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT
);

-- Location children. location_id refers to locations(id) but is not
-- enforced: deleting a location leaves its children pointing at it.
CREATE TABLE IF NOT EXISTS bins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    location_id INTEGER
);

CREATE TABLE IF NOT EXISTS shelves (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    location_id INTEGER
);

CREATE INDEX IF NOT EXISTS idx_bins_location ON bins(location_id);
CREATE INDEX IF NOT EXISTS idx_shelves_location ON shelves(location_id);

-- Items keep client-generated ids; placement columns are lenient references
-- to locations, bins and shelves.
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    name TEXT,
    description TEXT,
    quantity INTEGER,
    location_id INTEGER,
    bin_id INTEGER,
    shelf_id INTEGER,
    createdAt TEXT,
    updatedAt TEXT
);

CREATE INDEX IF NOT EXISTS idx_items_location ON items(location_id);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS item_tags (
    item_id TEXT NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (item_id, tag_id),
    FOREIGN KEY (item_id) REFERENCES items(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_item_tags_tag ON item_tags(tag_id);
"#
    }
}
