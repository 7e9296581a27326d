//! Domain and wire models
//!
//! Field names follow the mobile client's JSON contract, so renames here
//! are breaking changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An anonymous user, bound 1:1 to a device identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// A canonical Magic: The Gathering card record
///
/// Identity is the (set_code, collector_number) pair; `scryfall_id` is the
/// stable external key. Identity fields are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scryfall_id: Option<String>,
    pub name: String,
    pub set_code: String,
    pub collector_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A card in a user's inventory, joined with its catalog record
#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub id: i64,
    pub user_id: String,
    pub card_id: String,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
    pub card: Card,
}

/// Aggregate record of one scan operation's outcome counts
#[derive(Debug, Clone, Serialize)]
pub struct ScanSession {
    pub id: i64,
    pub user_id: String,
    pub scan_type: String,
    pub cards_scanned: i64,
    pub successful_scans: i64,
    pub failed_scans: i64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A card scan request: a structured lookup key, not pixel data
///
/// Either (set_code, collector_number) or card_name must be present.
/// `barcode` is accepted but unused by the current resolution logic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub card_name: Option<String>,
    #[serde(default)]
    pub set_code: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
}

/// Result of a single scan (also the per-item shape within a bulk result)
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResponse {
    pub fn success(card: Card) -> Self {
        Self {
            success: true,
            card: Some(card),
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            card: None,
            error: Some(error.to_string()),
        }
    }
}

/// Wire shape for a bulk scan request body
#[derive(Debug, Deserialize)]
pub struct BulkScanRequest {
    pub scans: Vec<ScanRequest>,
}

/// Result of a bulk scan: session totals plus per-item results in input order
#[derive(Debug, Serialize)]
pub struct BulkScanResponse {
    pub session_id: i64,
    pub total_scanned: usize,
    pub successful_scans: usize,
    pub failed_scans: usize,
    pub results: Vec<ScanResponse>,
}

/// Authentication response: the user's ID and a bearer token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: String,
    pub token: String,
}

/// Inventory summary counters
#[derive(Debug, Serialize)]
pub struct InventoryStats {
    pub total_cards: i64,
    pub unique_cards: i64,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
