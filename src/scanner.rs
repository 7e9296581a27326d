//! Scan Resolution Engine
//!
//! Resolves a scan request to a canonical card: local catalog first, then
//! the external resolver on a miss, persisting newly resolved cards back
//! into the catalog.

use crate::database::{cards, Db};
use crate::error::{Result, ScanError};
use crate::models::{Card, ScanRequest};
use crate::scryfall::CardResolver;
use std::sync::Arc;

/// True for the unique/primary-key violations raised when another writer
/// already inserted the same card identity
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

pub struct ScanService {
    db: Db,
    resolver: Arc<dyn CardResolver>,
}

impl ScanService {
    pub fn new(db: Db, resolver: Arc<dyn CardResolver>) -> Self {
        Self { db, resolver }
    }

    /// Resolve a scan request to a card
    ///
    /// Catalogued (set, collector number) identities are answered locally
    /// without touching the resolver or its rate limiter. On a local miss
    /// the resolved card is inserted into the catalog; losing an insert
    /// race to a concurrent resolution of the same identity is fine, the
    /// row exists either way.
    pub async fn scan_card(&self, req: &ScanRequest) -> Result<Card> {
        let set_number = req
            .set_code
            .as_deref()
            .filter(|s| !s.is_empty())
            .zip(req.collector_number.as_deref().filter(|n| !n.is_empty()));

        if let Some((set_code, collector_number)) = set_number {
            // Catalogued set codes are uppercase; accept any case on input
            let local = {
                let conn = self.db.lock().unwrap();
                cards::get_card_by_set_and_number(
                    &conn,
                    &set_code.to_uppercase(),
                    collector_number,
                )?
            };
            if let Some(card) = local {
                log::debug!("Catalog hit for {}/{}", set_code, collector_number);
                return Ok(card);
            }
        }

        let card = match (set_number, req.card_name.as_deref().filter(|n| !n.is_empty())) {
            (Some((set_code, collector_number)), _) => {
                self.resolver
                    .resolve_by_set_number(set_code, collector_number)
                    .await?
            }
            (None, Some(name)) => {
                let set_code = req.set_code.as_deref().filter(|s| !s.is_empty());
                self.resolver.resolve_by_name(name, set_code).await?
            }
            (None, None) => return Err(ScanError::InsufficientScanData),
        };

        let conn = self.db.lock().unwrap();
        match cards::create_card(&conn, &card) {
            Ok(()) => {}
            Err(e) if is_constraint_violation(&e) => {
                // Another request stored this card concurrently
                log::debug!(
                    "Card {}/{} already catalogued, keeping resolved copy",
                    card.set_code,
                    card.collector_number
                );
            }
            Err(e) => return Err(e.into()),
        }

        Ok(card)
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
