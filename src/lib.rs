//! Card Scanner - MTG card scanning backend
//!
//! Resolves card scans against a local catalog (falling back to Scryfall
//! under a shared rate limit) and tracks per-user inventory with scan
//! session bookkeeping.

pub mod auth;
pub mod database;
pub mod error;
pub mod inventory;
pub mod models;
pub mod rate_limit;
pub mod scanner;
pub mod scryfall;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

pub use database::{init_schema, Db};
pub use error::{Result, ScanError};
