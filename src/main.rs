//! Card Scanner - MTG card scanning backend
//!
//! Authenticates anonymous device-bound users, resolves card scans against
//! a local catalog with Scryfall fallback, and tracks per-user inventory.

use card_scanner::auth::AuthService;
use card_scanner::inventory::InventoryService;
use card_scanner::rate_limit::RateLimiter;
use card_scanner::scanner::ScanService;
use card_scanner::scryfall::ScryfallClient;
use card_scanner::web::{self, AppState};
use card_scanner::{init_schema, Db};
use clap::Parser;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// MTG card scanner backend server
#[derive(Parser, Debug)]
#[command(name = "card_scanner")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Minimum spacing between Scryfall calls, in milliseconds
    #[arg(long, default_value_t = 100)]
    rate_limit_ms: u64,

    /// Auth token lifetime in days
    #[arg(long, default_value_t = 365)]
    token_ttl_days: i64,
}

/// Returns the default database path: ~/.local/share/card_scanner/cards.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card_scanner")
        .join("cards.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    log::info!("Starting card_scanner...");
    log::info!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let conn = match Connection::open(&db_path) {
        Ok(conn) => {
            log::info!("Opened database: {}", db_path.display());
            conn
        }
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_schema(&conn) {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    let db: Db = Arc::new(Mutex::new(conn));

    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(args.rate_limit_ms)));
    let resolver = Arc::new(ScryfallClient::new(limiter));
    let scanner = ScanService::new(Arc::clone(&db), resolver);
    let state = AppState {
        auth: Arc::new(AuthService::new(Arc::clone(&db), args.token_ttl_days)),
        inventory: Arc::new(InventoryService::new(Arc::clone(&db), scanner)),
    };

    if let Err(e) = web::serve(state, args.port).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
