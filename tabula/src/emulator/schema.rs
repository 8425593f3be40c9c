//! SQL schema and statement constants for the local store emulator.
//!
//! The emulator keeps every emulated table in two real SQLite tables:
//! a catalog of table names with their lifecycle status, and one items
//! table keyed by (table, partition key, sort key).

/// SQL statement to create the table catalog.
pub const CREATE_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS store_tables (
        name TEXT PRIMARY KEY NOT NULL,
        status TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the items table.
///
/// The primary key mirrors the store's two-part key schema, scoped by
/// the emulated table name. Attributes are stored as a JSON document.
pub const CREATE_ITEMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS store_items (
        table_name TEXT NOT NULL,
        partition_key TEXT NOT NULL,
        sort_key TEXT NOT NULL,
        attributes TEXT NOT NULL,
        PRIMARY KEY (table_name, partition_key, sort_key)
    )";

/// SQL statement to create an index for partition queries.
pub const CREATE_PARTITION_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_store_items_partition
    ON store_items(table_name, partition_key)";

/// SQL statement to select a table's status from the catalog.
pub const SELECT_TABLE_STATUS: &str = "SELECT status FROM store_tables WHERE name = ?";

/// SQL statement to register a table; an existing entry is kept as-is,
/// making create-if-absent safe under race.
pub const INSERT_TABLE: &str = r"
    INSERT OR IGNORE INTO store_tables (name, status, created_at)
    VALUES (?, ?, ?)
";

/// SQL statement to remove a table from the catalog.
pub const DELETE_TABLE: &str = "DELETE FROM store_tables WHERE name = ?";

/// SQL statement to remove all items of a table.
pub const DELETE_TABLE_ITEMS: &str = "DELETE FROM store_items WHERE table_name = ?";

/// SQL statement to insert or replace an item.
pub const UPSERT_ITEM: &str = r"
    INSERT OR REPLACE INTO store_items
    (table_name, partition_key, sort_key, attributes)
    VALUES (?, ?, ?, ?)
";

/// SQL statement to delete an item by key.
pub const DELETE_ITEM: &str = r"
    DELETE FROM store_items
    WHERE table_name = ? AND partition_key = ? AND sort_key = ?
";

/// SQL statement to fetch a partition's items ordered by sort key.
pub const SELECT_PARTITION: &str = r"
    SELECT partition_key, sort_key, attributes FROM store_items
    WHERE table_name = ? AND partition_key = ?
    ORDER BY sort_key
";
