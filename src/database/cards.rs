//! Card catalog store
//!
//! The catalog is append-only from this layer's point of view: cards are
//! created on first resolution and never updated or deleted. Uniqueness on
//! (set_code, collector_number) is enforced by the schema; callers decide
//! how to treat a constraint violation.

use crate::database::DbResult;
use crate::models::Card;
use rusqlite::{params, Connection, Row};

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        scryfall_id: row.get(1)?,
        name: row.get(2)?,
        set_code: row.get(3)?,
        collector_number: row.get(4)?,
        image_uri: row.get(5)?,
        oracle_text: row.get(6)?,
        type_line: row.get(7)?,
        mana_cost: row.get(8)?,
        rarity: row.get(9)?,
        created_at: row.get(10)?,
    })
}

const CARD_COLUMNS: &str = "id, scryfall_id, name, set_code, collector_number, \
     image_uri, oracle_text, type_line, mana_cost, rarity, created_at";

/// Insert a new card into the catalog
///
/// Fails with a constraint violation if a card with the same
/// (set_code, collector_number) already exists.
pub fn create_card(conn: &Connection, card: &Card) -> DbResult<()> {
    conn.execute(
        "INSERT INTO cards
         (id, scryfall_id, name, set_code, collector_number,
          image_uri, oracle_text, type_line, mana_cost, rarity, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            card.id,
            card.scryfall_id,
            card.name,
            card.set_code,
            card.collector_number,
            card.image_uri,
            card.oracle_text,
            card.type_line,
            card.mana_cost,
            card.rarity,
            card.created_at,
        ],
    )?;
    Ok(())
}

/// Look up a card by its composite (set_code, collector_number) identity
pub fn get_card_by_set_and_number(
    conn: &Connection,
    set_code: &str,
    collector_number: &str,
) -> DbResult<Option<Card>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE set_code = ?1 AND collector_number = ?2"
    ))?;
    let mut rows = stmt.query(params![set_code, collector_number])?;
    match rows.next()? {
        Some(row) => Ok(Some(card_from_row(row)?)),
        None => Ok(None),
    }
}

/// Look up a card by its internal ID
pub fn get_card_by_id(conn: &Connection, id: &str) -> DbResult<Option<Card>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(card_from_row(row)?)),
        None => Ok(None),
    }
}

/// Search catalogued cards by name (case-insensitive substring match)
pub fn search_cards_by_name(conn: &Connection, name: &str, limit: usize) -> DbResult<Vec<Card>> {
    let pattern = format!("%{}%", name);
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CARD_COLUMNS} FROM cards
         WHERE name LIKE ?1 COLLATE NOCASE
         ORDER BY name
         LIMIT ?2"
    ))?;
    let results: DbResult<Vec<Card>> = stmt
        .query_map(params![pattern, limit], card_from_row)?
        .collect();
    results
}

/// Build a catalog card for tests
#[cfg(test)]
pub(crate) fn make_card(set_code: &str, collector_number: &str, name: &str) -> Card {
    Card {
        id: uuid::Uuid::new_v4().to_string(),
        scryfall_id: Some(uuid::Uuid::new_v4().to_string()),
        name: name.to_string(),
        set_code: set_code.to_string(),
        collector_number: collector_number.to_string(),
        image_uri: Some("https://cards.example/normal.jpg".to_string()),
        oracle_text: None,
        type_line: Some("Instant".to_string()),
        mana_cost: Some("{R}".to_string()),
        rarity: Some("common".to_string()),
        created_at: chrono::Utc::now(),
    }
}
