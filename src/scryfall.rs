//! Scryfall API client
//!
//! The external card resolver. Every outbound request passes through a
//! shared [`RateLimiter`]; local catalog hits never reach this module.

use crate::error::{Result, ScanError};
use crate::models::Card;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const SCRYFALL_API_BASE: &str = "https://api.scryfall.com";
/// Scryfall rate limit guidance: 10 requests per second
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "CardScanner/1.0";

/// Resolves a scan key to a canonical card via an external service
#[async_trait]
pub trait CardResolver: Send + Sync {
    /// Resolve by exact (set code, collector number) identity
    async fn resolve_by_set_number(&self, set_code: &str, collector_number: &str)
        -> Result<Card>;

    /// Resolve by fuzzy name match, optionally constrained to a set
    async fn resolve_by_name(&self, name: &str, set_code: Option<&str>) -> Result<Card>;
}

/// Scryfall card response
#[derive(Debug, Clone, Deserialize)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    pub set: String,
    pub collector_number: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// Where a card's images live: single-faced cards carry them directly,
/// double-faced cards nest them per face
#[derive(Debug, Clone)]
pub enum CardImagery {
    SingleFaced { images: ImageUris },
    MultiFaced { faces: Vec<CardFace> },
    Missing,
}

/// Pick the canonical image reference: the primary face's "normal" size,
/// falling back to "large" if absent
pub fn primary_image(imagery: &CardImagery) -> Option<String> {
    fn pick(images: &ImageUris) -> Option<String> {
        images.normal.clone().or_else(|| images.large.clone())
    }

    match imagery {
        CardImagery::SingleFaced { images } => pick(images),
        CardImagery::MultiFaced { faces } => faces
            .first()
            .and_then(|face| face.image_uris.as_ref())
            .and_then(pick),
        CardImagery::Missing => None,
    }
}

impl ScryfallCard {
    pub fn imagery(&self) -> CardImagery {
        if let Some(images) = &self.image_uris {
            return CardImagery::SingleFaced {
                images: images.clone(),
            };
        }
        match &self.card_faces {
            Some(faces) if !faces.is_empty() => CardImagery::MultiFaced {
                faces: faces.clone(),
            },
            _ => CardImagery::Missing,
        }
    }

    /// Normalize into a canonical catalog record
    pub fn into_card(self) -> Card {
        let image_uri = primary_image(&self.imagery());
        Card {
            id: Uuid::new_v4().to_string(),
            scryfall_id: Some(self.id),
            name: self.name,
            set_code: self.set.to_uppercase(),
            collector_number: self.collector_number,
            image_uri,
            oracle_text: self.oracle_text,
            type_line: self.type_line,
            mana_cost: self.mana_cost,
            rarity: self.rarity,
            created_at: Utc::now(),
        }
    }
}

/// Rate-limited HTTP client for the Scryfall API
///
/// The limiter is injected so it can be shared (and observed) by the
/// caller; the client itself never constructs one.
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl ScryfallClient {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self::with_base_url(SCRYFALL_API_BASE, limiter)
    }

    /// Client against an alternate base URL (tests, mirrors)
    pub fn with_base_url(base_url: impl Into<String>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            limiter,
        }
    }

    async fn fetch_card(&self, url: String, lookup: &str) -> Result<Card> {
        self.limiter.acquire().await;
        log::debug!("Fetching card from Scryfall: {}", url);

        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ScanError::CardNotFound(lookup.to_string()));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ScanError::ExternalService {
                status: Some(status.as_u16()),
                detail,
            });
        }

        let card = response.json::<ScryfallCard>().await?;
        Ok(card.into_card())
    }
}

#[async_trait]
impl CardResolver for ScryfallClient {
    async fn resolve_by_set_number(
        &self,
        set_code: &str,
        collector_number: &str,
    ) -> Result<Card> {
        let url = format!(
            "{}/cards/{}/{}",
            self.base_url,
            urlencoding::encode(&set_code.to_lowercase()),
            urlencoding::encode(collector_number)
        );
        self.fetch_card(url, &format!("{}/{}", set_code, collector_number))
            .await
    }

    async fn resolve_by_name(&self, name: &str, set_code: Option<&str>) -> Result<Card> {
        let mut url = format!(
            "{}/cards/named?fuzzy={}",
            self.base_url,
            urlencoding::encode(name)
        );
        if let Some(set) = set_code {
            url.push_str(&format!("&set={}", urlencoding::encode(set)));
        }
        self.fetch_card(url, name).await
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
