//! Tests for the Scryfall client
//!
//! Note: Some tests require network access and are marked with #[ignore]

use crate::scryfall::{primary_image, CardImagery, ScryfallCard};

fn parse(json: &str) -> ScryfallCard {
    serde_json::from_str(json).unwrap()
}

#[test]
fn single_faced_card_uses_normal_image() {
    let card = parse(
        r#"{
        "id": "aaaa",
        "name": "Black Lotus",
        "set": "lea",
        "collector_number": "232",
        "image_uris": {
            "small": "https://example.com/small.jpg",
            "normal": "https://example.com/normal.jpg",
            "large": "https://example.com/large.jpg"
        }
    }"#,
    );

    assert!(matches!(card.imagery(), CardImagery::SingleFaced { .. }));
    assert_eq!(
        primary_image(&card.imagery()).as_deref(),
        Some("https://example.com/normal.jpg")
    );
}

#[test]
fn single_faced_card_falls_back_to_large() {
    let card = parse(
        r#"{
        "id": "aaaa",
        "name": "Black Lotus",
        "set": "lea",
        "collector_number": "232",
        "image_uris": {
            "small": "https://example.com/small.jpg",
            "normal": null,
            "large": "https://example.com/large.jpg"
        }
    }"#,
    );

    assert_eq!(
        primary_image(&card.imagery()).as_deref(),
        Some("https://example.com/large.jpg")
    );
}

#[test]
fn double_faced_card_uses_front_face() {
    let card = parse(
        r#"{
        "id": "bbbb",
        "name": "Delver of Secrets // Insectile Aberration",
        "set": "isd",
        "collector_number": "51",
        "card_faces": [
            {
                "name": "Delver of Secrets",
                "image_uris": { "small": null, "normal": "https://example.com/front.jpg", "large": null }
            },
            {
                "name": "Insectile Aberration",
                "image_uris": { "small": null, "normal": "https://example.com/back.jpg", "large": null }
            }
        ]
    }"#,
    );

    assert!(matches!(card.imagery(), CardImagery::MultiFaced { .. }));
    assert_eq!(
        primary_image(&card.imagery()).as_deref(),
        Some("https://example.com/front.jpg")
    );
}

#[test]
fn card_without_images_has_none() {
    let card = parse(
        r#"{
        "id": "cccc",
        "name": "Test Card",
        "set": "tst",
        "collector_number": "1"
    }"#,
    );

    assert!(matches!(card.imagery(), CardImagery::Missing));
    assert_eq!(primary_image(&card.imagery()), None);
}

#[test]
fn empty_card_faces_is_treated_as_missing() {
    let card = parse(
        r#"{
        "id": "cccc",
        "name": "Test Card",
        "set": "tst",
        "collector_number": "1",
        "card_faces": []
    }"#,
    );

    assert!(matches!(card.imagery(), CardImagery::Missing));
}

#[test]
fn into_card_normalizes_set_code_and_keeps_metadata() {
    let card = parse(
        r#"{
        "id": "dddd",
        "name": "Lightning Bolt",
        "set": "clu",
        "collector_number": "141",
        "type_line": "Instant",
        "mana_cost": "{R}",
        "rarity": "uncommon",
        "oracle_text": "Lightning Bolt deals 3 damage to any target.",
        "image_uris": { "small": null, "normal": "https://example.com/normal.jpg", "large": null }
    }"#,
    );

    let card = card.into_card();
    assert_eq!(card.set_code, "CLU");
    assert_eq!(card.collector_number, "141");
    assert_eq!(card.scryfall_id.as_deref(), Some("dddd"));
    assert_eq!(card.image_uri.as_deref(), Some("https://example.com/normal.jpg"));
    assert_eq!(card.type_line.as_deref(), Some("Instant"));
    assert_eq!(card.mana_cost.as_deref(), Some("{R}"));
    assert_eq!(card.rarity.as_deref(), Some("uncommon"));
    assert!(!card.id.is_empty());
}

#[test]
fn into_card_assigns_distinct_internal_ids() {
    let json = r#"{
        "id": "dddd",
        "name": "Lightning Bolt",
        "set": "clu",
        "collector_number": "141"
    }"#;
    let a = parse(json).into_card();
    let b = parse(json).into_card();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn client_requests_pass_through_the_shared_limiter() {
    use crate::rate_limit::RateLimiter;
    use crate::scryfall::{CardResolver, ScryfallClient};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    // Share one limiter between the client and this test. The lookup
    // itself fails (nothing listens on this port), but it must still
    // consume a limiter slot before sending.
    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(200)));
    let client = ScryfallClient::with_base_url("http://127.0.0.1:1", Arc::clone(&limiter));

    let _ = client.resolve_by_set_number("LEA", "161").await;

    let start = Instant::now();
    limiter.acquire().await;
    assert!(
        start.elapsed() >= Duration::from_millis(50),
        "limiter slot was not consumed by the client call"
    );
}

// Integration tests (require network access)

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn resolve_by_name_integration() {
    use crate::rate_limit::RateLimiter;
    use crate::scryfall::{CardResolver, ScryfallClient, DEFAULT_RATE_LIMIT};
    use std::sync::Arc;

    let client = ScryfallClient::new(Arc::new(RateLimiter::new(DEFAULT_RATE_LIMIT)));
    let card = client
        .resolve_by_name("Lightning Bolt", None)
        .await
        .unwrap();
    assert!(card.name.to_lowercase().contains("lightning"));
    assert!(card.image_uri.is_some());
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn resolve_unknown_card_integration() {
    use crate::error::ScanError;
    use crate::rate_limit::RateLimiter;
    use crate::scryfall::{CardResolver, ScryfallClient, DEFAULT_RATE_LIMIT};
    use std::sync::Arc;

    let client = ScryfallClient::new(Arc::new(RateLimiter::new(DEFAULT_RATE_LIMIT)));
    let result = client
        .resolve_by_name("ThisCardDoesNotExistXYZ123", None)
        .await;
    assert!(matches!(result, Err(ScanError::CardNotFound(_))));
}
