//! Inventory ledger store
//!
//! One row per (user_id, card_id); quantity is always positive. Rows that
//! would reach zero are deleted, never retained at quantity 0.

use crate::database::DbResult;
use crate::models::{Card, InventoryItem};
use chrono::Utc;
use rusqlite::{params, Connection};

/// Add a card to a user's inventory or increment its quantity
///
/// A single atomic upsert; the original `added_at` is preserved on
/// increment so it keeps meaning "first added".
pub fn add_to_inventory(
    conn: &Connection,
    user_id: &str,
    card_id: &str,
    quantity: i64,
) -> DbResult<()> {
    conn.execute(
        "INSERT INTO inventory (user_id, card_id, quantity, added_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (user_id, card_id)
         DO UPDATE SET quantity = quantity + excluded.quantity",
        params![user_id, card_id, quantity, Utc::now()],
    )?;
    Ok(())
}

/// Remove a card from a user's inventory or decrement its quantity
///
/// Deletes the row entirely when the current quantity is less than or
/// equal to the removal amount. Returns `Ok(false)` when the user has no
/// entry for this card; the read and the write run in one transaction.
pub fn remove_from_inventory(
    conn: &mut Connection,
    user_id: &str,
    card_id: &str,
    quantity: i64,
) -> DbResult<bool> {
    let tx = conn.transaction()?;

    let current: Option<i64> = {
        let mut stmt = tx.prepare_cached(
            "SELECT quantity FROM inventory WHERE user_id = ?1 AND card_id = ?2",
        )?;
        let mut rows = stmt.query(params![user_id, card_id])?;
        match rows.next()? {
            Some(row) => Some(row.get(0)?),
            None => None,
        }
    };

    let Some(current) = current else {
        return Ok(false);
    };

    if current <= quantity {
        tx.execute(
            "DELETE FROM inventory WHERE user_id = ?1 AND card_id = ?2",
            params![user_id, card_id],
        )?;
    } else {
        tx.execute(
            "UPDATE inventory SET quantity = quantity - ?1
             WHERE user_id = ?2 AND card_id = ?3",
            params![quantity, user_id, card_id],
        )?;
    }

    tx.commit()?;
    Ok(true)
}

/// List a user's inventory, most recently added first, joined with the catalog
pub fn get_user_inventory(conn: &Connection, user_id: &str) -> DbResult<Vec<InventoryItem>> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.id, i.user_id, i.card_id, i.quantity, i.added_at,
                c.id, c.scryfall_id, c.name, c.set_code, c.collector_number,
                c.image_uri, c.oracle_text, c.type_line, c.mana_cost, c.rarity, c.created_at
         FROM inventory i
         JOIN cards c ON i.card_id = c.id
         WHERE i.user_id = ?1
         ORDER BY i.added_at DESC, i.id DESC",
    )?;

    let results: DbResult<Vec<InventoryItem>> = stmt
        .query_map(params![user_id], |row| {
            Ok(InventoryItem {
                id: row.get(0)?,
                user_id: row.get(1)?,
                card_id: row.get(2)?,
                quantity: row.get(3)?,
                added_at: row.get(4)?,
                card: Card {
                    id: row.get(5)?,
                    scryfall_id: row.get(6)?,
                    name: row.get(7)?,
                    set_code: row.get(8)?,
                    collector_number: row.get(9)?,
                    image_uri: row.get(10)?,
                    oracle_text: row.get(11)?,
                    type_line: row.get(12)?,
                    mana_cost: row.get(13)?,
                    rarity: row.get(14)?,
                    created_at: row.get(15)?,
                },
            })
        })?
        .collect();
    results
}

/// Total number of cards a user owns, counting quantities
pub fn get_inventory_count(conn: &Connection, user_id: &str) -> DbResult<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(quantity), 0) FROM inventory WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
}

/// Number of distinct cards in a user's inventory
pub fn get_unique_card_count(conn: &Connection, user_id: &str) -> DbResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM inventory WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
}
