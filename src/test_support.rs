//! Shared test helpers: a mock card resolver with a call counter and
//! catalog-card builders.

use crate::error::ScanError;
use crate::models::Card;
use crate::scryfall::CardResolver;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Resolver that serves cards from a fixed list and counts every call
pub(crate) struct MockResolver {
    cards: Vec<Card>,
    calls: AtomicUsize,
}

impl MockResolver {
    pub(crate) fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardResolver for MockResolver {
    async fn resolve_by_set_number(
        &self,
        set_code: &str,
        collector_number: &str,
    ) -> crate::error::Result<Card> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cards
            .iter()
            .find(|c| {
                c.set_code.eq_ignore_ascii_case(set_code)
                    && c.collector_number == collector_number
            })
            .cloned()
            .ok_or_else(|| ScanError::CardNotFound(format!("{}/{}", set_code, collector_number)))
    }

    async fn resolve_by_name(
        &self,
        name: &str,
        _set_code: Option<&str>,
    ) -> crate::error::Result<Card> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cards
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| ScanError::CardNotFound(name.to_string()))
    }
}

/// Build a card the way the resolver would return it
pub(crate) fn remote_card(set_code: &str, collector_number: &str, name: &str) -> Card {
    Card {
        id: Uuid::new_v4().to_string(),
        scryfall_id: Some(Uuid::new_v4().to_string()),
        name: name.to_string(),
        set_code: set_code.to_string(),
        collector_number: collector_number.to_string(),
        image_uri: Some("https://cards.example/normal.jpg".to_string()),
        oracle_text: None,
        type_line: None,
        mana_cost: None,
        rarity: None,
        created_at: Utc::now(),
    }
}
