//! Database migrations
//!
//! Versioned schema changes tracked in `schema_migrations`.

use crate::core::error::Result;
use rusqlite::Connection;
use tracing::{info, warn};

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1)
const MIGRATION_V1: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user',
    must_change_password INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

-- Towers
CREATE TABLE IF NOT EXISTS torres (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    location TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Activo',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Servers
CREATE TABLE IF NOT EXISTS servidores (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    location TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Activo',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Equipment
CREATE TABLE IF NOT EXISTS equipos (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    kind TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Activo',
    price REAL NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Dashboard cards (references are plain ids, no foreign keys)
CREATE TABLE IF NOT EXISTS dashboard_cards (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL,
    action_type TEXT NOT NULL DEFAULT 'Detalle',
    data_value TEXT NOT NULL DEFAULT '',
    torre_id TEXT,
    servidor_id TEXT,
    equipo_ids TEXT NOT NULL DEFAULT '[]',
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Listing indexes (version 2)
const MIGRATION_V2: &str = r#"
CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
CREATE INDEX IF NOT EXISTS idx_torres_created_at ON torres(created_at);
CREATE INDEX IF NOT EXISTS idx_servidores_created_at ON servidores(created_at);
CREATE INDEX IF NOT EXISTS idx_equipos_created_at ON equipos(created_at);
CREATE INDEX IF NOT EXISTS idx_dashboard_cards_created_at ON dashboard_cards(created_at);
"#;

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute(MIGRATION_TABLE, [])?;

    let current_version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    info!("Current database schema version: {}", current_version);

    if current_version < 1 {
        info!("Applying migration v1: Initial schema");
        apply_migration(conn, 1, MIGRATION_V1)?;
    }

    if current_version < 2 {
        info!("Applying migration v2: Listing indexes");
        apply_migration(conn, 2, MIGRATION_V2)?;
    }

    Ok(())
}

/// Apply a single migration
fn apply_migration(conn: &mut Connection, version: i64, sql: &str) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(sql).map_err(|e| {
        warn!("Migration v{} failed: {}", version, e);
        e
    })?;

    tx.execute("INSERT INTO schema_migrations (version) VALUES (?)", [version])?;
    tx.commit()?;

    info!("Migration v{} applied successfully", version);
    Ok(())
}
