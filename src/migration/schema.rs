//! DDL for the latest schema and small introspection helpers.

use rusqlite::{Connection, params};

/// Final shape of the `todos` table.
///
/// Column order matches what the migration path produces, so a migrated and a
/// fresh database are indistinguishable by `PRAGMA table_info`.
pub(crate) const TODOS_TABLE_SQL: &str = r#"
CREATE TABLE todos (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    title        TEXT NOT NULL,
    priority     TEXT NOT NULL,
    createdAt    INTEGER NOT NULL,
    dueDate      INTEGER,
    dueTime      TEXT,
    isDaily      INTEGER NOT NULL DEFAULT 0,
    dailyTime    TEXT,
    dailyEndDate INTEGER,
    completedAt  INTEGER
);
"#;

pub(crate) const DUE_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_todos_due ON todos(dueDate, dueTime);";

/// Create the latest schema on an empty database.
pub fn create_latest(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(TODOS_TABLE_SQL)?;
    conn.execute_batch(DUE_INDEX_SQL)
}

/// Whether a table named `name` exists.
pub fn has_table(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Column names of `table`, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map(params![table], |row| row.get(0))?;
    rows.collect()
}

/// Names of explicitly created indexes on `table`, sorted.
pub fn index_names(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'index' AND tbl_name = ?1 AND sql IS NOT NULL ORDER BY name",
    )?;
    let rows = stmt.query_map(params![table], |row| row.get(0))?;
    rows.collect()
}
