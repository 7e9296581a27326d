//! HTTP API
//!
//! REST surface consumed by the mobile client. Scan endpoints return
//! structured success/failure bodies; transport-level errors are reserved
//! for auth problems and storage failures with no partial result.

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::AuthService;
use crate::error::ScanError;
use crate::inventory::InventoryService;
use crate::models::{BulkScanRequest, ErrorResponse, ScanRequest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub inventory: Arc<InventoryService>,
}

/// Authenticated user ID, inserted by the auth middleware
#[derive(Clone)]
struct AuthUser(String);

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    let message = message.into();
    (
        status,
        Json(ErrorResponse {
            error: message.clone(),
            message: Some(message),
        }),
    )
}

/// Bearer-token middleware for the protected routes
async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return api_error(StatusCode::UNAUTHORIZED, "user not authenticated").into_response();
    };

    match state.auth.validate_token(token) {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            next.run(req).await
        }
        Err(_) => api_error(StatusCode::UNAUTHORIZED, "user not authenticated").into_response(),
    }
}

/// GET /health
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct AnonymousAuthRequest {
    #[serde(default)]
    device_id: String,
}

/// POST /api/v1/auth/anonymous
async fn anonymous_auth_handler(
    State(state): State<AppState>,
    Json(req): Json<AnonymousAuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.device_id.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "device_id is required"));
    }

    match state.auth.authenticate_device(&req.device_id) {
        Ok(resp) => Ok(Json(resp)),
        Err(e) => {
            log::error!("Authentication failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to authenticate",
            ))
        }
    }
}

/// POST /api/v1/cards/scan
async fn single_scan_handler(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<ScanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match state.inventory.process_single_scan(&user_id, &req).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            log::error!("Single scan failed for user {}: {}", user_id, e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// POST /api/v1/cards/scan/bulk
async fn bulk_scan_handler(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<BulkScanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match state.inventory.process_bulk_scan(&user_id, &req.scans).await {
        Ok(result) => Ok(Json(result)),
        Err(ScanError::EmptyBatch) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "scans array cannot be empty",
        )),
        Err(e) => {
            log::error!("Bulk scan failed for user {}: {}", user_id, e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// GET /api/v1/inventory
async fn inventory_handler(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    match state.inventory.get_inventory(&user_id) {
        Ok(items) => Ok(Json(serde_json::json!({
            "count": items.len(),
            "inventory": items,
        }))),
        Err(e) => {
            log::error!("Failed to retrieve inventory for user {}: {}", user_id, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to retrieve inventory",
            ))
        }
    }
}

/// GET /api/v1/inventory/stats
async fn inventory_stats_handler(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    match state.inventory.get_inventory_stats(&user_id) {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            log::error!("Failed to compute stats for user {}: {}", user_id, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to retrieve inventory stats",
            ))
        }
    }
}

#[derive(Deserialize)]
struct RemoveParams {
    #[serde(default = "default_remove_quantity")]
    quantity: i64,
}

fn default_remove_quantity() -> i64 {
    1
}

/// DELETE /api/v1/inventory/{card_id}?quantity=N
async fn remove_inventory_handler(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(card_id): Path<String>,
    Query(params): Query<RemoveParams>,
) -> Result<impl IntoResponse, ApiError> {
    match state
        .inventory
        .remove_from_inventory(&user_id, &card_id, params.quantity)
    {
        Ok(()) => Ok(Json(serde_json::json!({ "success": true }))),
        Err(ScanError::NotInInventory(_)) => Err(api_error(
            StatusCode::NOT_FOUND,
            "card not found in inventory",
        )),
        Err(e) => {
            log::error!("Failed to remove card for user {}: {}", user_id, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to remove from inventory",
            ))
        }
    }
}

#[derive(Deserialize)]
struct CardParams {
    id: String,
}

/// GET /api/v1/cards?id={card_id}
async fn get_card_handler(
    State(state): State<AppState>,
    Query(params): Query<CardParams>,
) -> Result<impl IntoResponse, ApiError> {
    match state.inventory.get_card(&params.id) {
        Ok(Some(card)) => Ok(Json(card)),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "card not found")),
        Err(e) => {
            log::error!("Failed to retrieve card {}: {}", params.id, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to retrieve card",
            ))
        }
    }
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/cards/scan", post(single_scan_handler))
        .route("/api/v1/cards/scan/bulk", post(bulk_scan_handler))
        .route("/api/v1/inventory", get(inventory_handler))
        .route("/api/v1/inventory/stats", get(inventory_stats_handler))
        .route("/api/v1/inventory/{card_id}", delete(remove_inventory_handler))
        .route("/api/v1/cards", get(get_card_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/auth/anonymous", post(anonymous_auth_handler))
        .merge(protected)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Start the API server
pub async fn serve(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
