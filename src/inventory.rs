//! Inventory Reconciliation Service
//!
//! Drives single and bulk scan flows: opens a scan session, resolves each
//! request through the Scan Resolution Engine, records ledger updates, and
//! finalizes the session with aggregate counts. Resolution and ledger
//! failures become structured per-item results; they are never raised to
//! the caller as hard errors.

use crate::database::{cards, inventory, sessions, Db};
use crate::error::{Result, ScanError};
use crate::models::{
    BulkScanResponse, InventoryItem, InventoryStats, ScanRequest, ScanResponse,
};
use crate::scanner::ScanService;

pub struct InventoryService {
    db: Db,
    scanner: ScanService,
}

impl InventoryService {
    pub fn new(db: Db, scanner: ScanService) -> Self {
        Self { db, scanner }
    }

    /// Process one scan: resolve, add quantity 1 to the ledger, record the
    /// session as (1 scanned, 1/0 success, 0/1 failed)
    ///
    /// The only hard failure is session creation; without a session there
    /// is nothing to report results against.
    pub async fn process_single_scan(
        &self,
        user_id: &str,
        req: &ScanRequest,
    ) -> Result<ScanResponse> {
        let session_id = {
            let conn = self.db.lock().unwrap();
            sessions::create_scan_session(&conn, user_id, "single")?
        };

        let result = self.scan_and_record(user_id, req).await;
        let response = match result {
            Ok(response) => {
                self.finalize_session(session_id, 1, 1, 0);
                response
            }
            Err(e) => {
                self.finalize_session(session_id, 1, 0, 1);
                ScanResponse::failure(e)
            }
        };
        Ok(response)
    }

    /// Process a batch of scans sequentially, in input order
    ///
    /// Each item is independent: a failure is recorded in its slot of the
    /// result list and the batch continues. The result list mirrors the
    /// input order exactly, failed items included.
    pub async fn process_bulk_scan(
        &self,
        user_id: &str,
        scans: &[ScanRequest],
    ) -> Result<BulkScanResponse> {
        if scans.is_empty() {
            return Err(ScanError::EmptyBatch);
        }

        let session_id = {
            let conn = self.db.lock().unwrap();
            sessions::create_scan_session(&conn, user_id, "bulk")?
        };

        let mut results = Vec::with_capacity(scans.len());
        let mut successful = 0;
        let mut failed = 0;

        for req in scans {
            match self.scan_and_record(user_id, req).await {
                Ok(response) => {
                    successful += 1;
                    results.push(response);
                }
                Err(e) => {
                    failed += 1;
                    results.push(ScanResponse::failure(e));
                }
            }
        }

        self.finalize_session(session_id, scans.len() as i64, successful, failed);

        Ok(BulkScanResponse {
            session_id,
            total_scanned: scans.len(),
            successful_scans: successful as usize,
            failed_scans: failed as usize,
            results,
        })
    }

    /// Resolve one request and record it in the user's ledger
    ///
    /// A ledger failure after a successful resolution leaves the catalog
    /// row in place: the catalog is a shared cache of public card data,
    /// not part of the user's state.
    async fn scan_and_record(&self, user_id: &str, req: &ScanRequest) -> Result<ScanResponse> {
        let card = self.scanner.scan_card(req).await?;

        {
            let conn = self.db.lock().unwrap();
            inventory::add_to_inventory(&conn, user_id, &card.id, 1)?;
        }

        Ok(ScanResponse::success(card))
    }

    /// List a user's inventory, most recently added first
    pub fn get_inventory(&self, user_id: &str) -> Result<Vec<InventoryItem>> {
        let conn = self.db.lock().unwrap();
        Ok(inventory::get_user_inventory(&conn, user_id)?)
    }

    /// Remove `quantity` of a card from a user's inventory
    pub fn remove_from_inventory(
        &self,
        user_id: &str,
        card_id: &str,
        quantity: i64,
    ) -> Result<()> {
        let mut conn = self.db.lock().unwrap();
        if inventory::remove_from_inventory(&mut conn, user_id, card_id, quantity)? {
            Ok(())
        } else {
            Err(ScanError::NotInInventory(card_id.to_string()))
        }
    }

    /// Summary counters for a user's inventory
    pub fn get_inventory_stats(&self, user_id: &str) -> Result<InventoryStats> {
        let conn = self.db.lock().unwrap();
        let total_cards = inventory::get_inventory_count(&conn, user_id)?;
        let unique_cards = inventory::get_unique_card_count(&conn, user_id)?;
        Ok(InventoryStats {
            total_cards,
            unique_cards,
        })
    }

    /// Look up a catalogued card by its internal ID
    pub fn get_card(&self, card_id: &str) -> Result<Option<crate::models::Card>> {
        let conn = self.db.lock().unwrap();
        Ok(cards::get_card_by_id(&conn, card_id)?)
    }

    /// Session finalization is best-effort: the scan outcome stands even
    /// if the bookkeeping write fails
    fn finalize_session(&self, session_id: i64, total: i64, successful: i64, failed: i64) {
        let conn = self.db.lock().unwrap();
        if let Err(e) =
            sessions::finalize_scan_session(&conn, session_id, total, successful, failed)
        {
            log::warn!("Failed to finalize scan session {}: {}", session_id, e);
        }
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
