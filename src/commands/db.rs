use rusqlite::{params, Connection, OptionalExtension, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const DB_SCHEMA_VERSION: i64 = 1;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    if version > DB_SCHEMA_VERSION {
        // Newer app wrote this file; the key-value layout is forward compatible.
        log::debug!("settings store schema v{version} is newer than v{DB_SCHEMA_VERSION}");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_settings_updated_at ON settings(updated_at);
        ",
    )
}

pub fn store_dir(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join(".cadence")
}

pub fn get_db_connection(data_dir: &str) -> std::result::Result<Connection, String> {
    let dir = store_dir(data_dir);
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create .cadence directory: {e}"))?;

    let conn = Connection::open(dir.join("state.db")).map_err(|e| format!("DB error: {e}"))?;
    initialize_schema(&conn).map_err(|e| format!("DB migration error: {e}"))?;
    Ok(conn)
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "
        INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        ",
        params![key, value, now],
    )?;
    Ok(())
}

pub fn delete_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
    Ok(())
}

/// All stored keys as one JSON object. Values that are not valid JSON are
/// kept as plain strings (legacy local-storage entries).
pub fn load_document(conn: &Connection) -> Result<Value> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key ASC")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>>>()?;

    let mut doc = Map::new();
    for (key, raw) in rows {
        let value = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
        doc.insert(key, value);
    }

    Ok(Value::Object(doc))
}

/// Replace the stored document with `doc`, one row per top-level key.
pub fn store_document(conn: &Connection, doc: &Value) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM settings", [])?;

    if let Some(obj) = doc.as_object() {
        for (key, value) in obj {
            set_value(&tx, key, &value.to_string())?;
        }
    }

    tx.commit()
}
