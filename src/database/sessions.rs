//! Scan session store
//!
//! Sessions are created with zero counts when a scan batch starts and
//! finalized exactly once with the totals when it ends.

use crate::database::DbResult;
use crate::models::ScanSession;
use chrono::Utc;
use rusqlite::{params, Connection};

/// Create a scan session of the given type ("single" or "bulk")
///
/// Returns the generated session ID.
pub fn create_scan_session(conn: &Connection, user_id: &str, scan_type: &str) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO scan_sessions (user_id, scan_type, started_at)
         VALUES (?1, ?2, ?3)",
        params![user_id, scan_type, Utc::now()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Finalize a scan session with its final counts and completion time
pub fn finalize_scan_session(
    conn: &Connection,
    session_id: i64,
    cards_scanned: i64,
    successful: i64,
    failed: i64,
) -> DbResult<()> {
    conn.execute(
        "UPDATE scan_sessions
         SET cards_scanned = ?1, successful_scans = ?2, failed_scans = ?3, completed_at = ?4
         WHERE id = ?5",
        params![cards_scanned, successful, failed, Utc::now(), session_id],
    )?;
    Ok(())
}

/// Retrieve a scan session by ID
pub fn get_scan_session(conn: &Connection, session_id: i64) -> DbResult<Option<ScanSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, scan_type, cards_scanned, successful_scans, failed_scans,
                started_at, completed_at
         FROM scan_sessions WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![session_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(ScanSession {
            id: row.get(0)?,
            user_id: row.get(1)?,
            scan_type: row.get(2)?,
            cards_scanned: row.get(3)?,
            successful_scans: row.get(4)?,
            failed_scans: row.get(5)?,
            started_at: row.get(6)?,
            completed_at: row.get(7)?,
        })),
        None => Ok(None),
    }
}
