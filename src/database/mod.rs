//! SQLite persistence layer
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! All timestamps are written from Rust as RFC 3339 UTC text, never via
//! SQLite defaults, so they round-trip through the `chrono` feature.

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod cards;
pub mod inventory;
pub mod sessions;
pub mod users;

/// Shared database handle
pub type Db = Arc<Mutex<Connection>>;

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Initialize the database schema
///
/// Creates tables if they don't exist:
/// - `users`: anonymous users, one per device
/// - `auth_tokens`: hashed bearer tokens with expiry
/// - `cards`: deduplicated card catalog, unique on (set_code, collector_number)
/// - `inventory`: per-user quantity ledger, unique on (user_id, card_id)
/// - `scan_sessions`: aggregate counts per scan batch
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            device_id TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            last_seen TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS auth_tokens (
            token_hash TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE TABLE IF NOT EXISTS cards (
            id TEXT PRIMARY KEY,
            scryfall_id TEXT,
            name TEXT NOT NULL,
            set_code TEXT NOT NULL,
            collector_number TEXT NOT NULL,
            image_uri TEXT,
            oracle_text TEXT,
            type_line TEXT,
            mana_cost TEXT,
            rarity TEXT,
            created_at TEXT NOT NULL,
            UNIQUE (set_code, collector_number)
        );

        CREATE INDEX IF NOT EXISTS idx_cards_name ON cards(name);

        CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            card_id TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            added_at TEXT NOT NULL,
            UNIQUE (user_id, card_id),
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (card_id) REFERENCES cards(id)
        );

        CREATE INDEX IF NOT EXISTS idx_inventory_user ON inventory(user_id);

        CREATE TABLE IF NOT EXISTS scan_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            scan_type TEXT NOT NULL,
            cards_scanned INTEGER NOT NULL DEFAULT 0,
            successful_scans INTEGER NOT NULL DEFAULT 0,
            failed_scans INTEGER NOT NULL DEFAULT 0,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}
