//! Table definition for the student store.

use crate::db::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Name of the single table owned by the store.
pub const ALUMNOS_TABLE: &str = "alumnos";

/// Creates the `alumnos` table when missing. Safe to run on every open.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether `table_name` exists in the connected database.
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
