// Currency Basics - API Server
// Serves the two currency list files as JSON

use crate::currency::{CurrencyCatalog, CurrencyRecord};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Currency list A
pub const CRYPTO_FILE: &str = "currencyListA.json";
/// Currency list B
pub const FIAT_FILE: &str = "currencyListB.json";

/// Shared application state
#[derive(Clone)]
struct AppState {
    data_dir: Arc<PathBuf>,
}

/// API Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    message: String,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

impl<T> ApiResponse<T> {
    fn ok(message: &str, data: T, count: usize) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
            count: Some(count),
        }
    }
}

/// 500 with an empty data array
fn failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse {
            success: false,
            message: message.to_string(),
            data: Vec::<CurrencyRecord>::new(),
            count: None,
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct ServerInfo {
    message: &'static str,
    version: &'static str,
    status: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: String,
}

/// On-disk list: either a bare array or wrapped in `{ "data": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CurrencyFile {
    Wrapped { data: Vec<CurrencyRecord> },
    Bare(Vec<CurrencyRecord>),
}

impl CurrencyFile {
    fn into_records(self) -> Vec<CurrencyRecord> {
        match self {
            CurrencyFile::Wrapped { data } => data,
            CurrencyFile::Bare(data) => data,
        }
    }
}

/// Read and parse one list file, logging why it failed
pub async fn read_currency_file(path: &Path) -> Option<Vec<CurrencyRecord>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error reading currency file");
            return None;
        }
    };

    match serde_json::from_str::<CurrencyFile>(&contents) {
        Ok(file) => Some(file.into_records()),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error parsing currency file");
            None
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Server info
async fn server_info() -> impl IntoResponse {
    Json(ServerInfo {
        message: "Currency API Server",
        version: crate::VERSION,
        status: "running",
    })
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        success: true,
        message: "Server is running",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/currencies/crypto - Currency list A
async fn get_crypto(State(state): State<AppState>) -> Response {
    match read_currency_file(&state.data_dir.join(CRYPTO_FILE)).await {
        Some(records) => {
            let count = records.len();
            Json(ApiResponse::ok("Crypto currencies retrieved successfully", records, count))
                .into_response()
        }
        None => failure("Failed to load crypto currencies"),
    }
}

/// GET /api/currencies/fiat - Currency list B
async fn get_fiat(State(state): State<AppState>) -> Response {
    match read_currency_file(&state.data_dir.join(FIAT_FILE)).await {
        Some(records) => {
            let count = records.len();
            Json(ApiResponse::ok("Fiat currencies retrieved successfully", records, count))
                .into_response()
        }
        None => failure("Failed to load fiat currencies"),
    }
}

/// GET /api/currencies/all - Both lists
async fn get_all(State(state): State<AppState>) -> Response {
    let crypto = read_currency_file(&state.data_dir.join(CRYPTO_FILE)).await;
    let fiat = read_currency_file(&state.data_dir.join(FIAT_FILE)).await;

    match (crypto, fiat) {
        (Some(crypto), Some(fiat)) => {
            let catalog = CurrencyCatalog::new(crypto, fiat);
            let count = catalog.len();
            Json(ApiResponse::ok("All currencies retrieved successfully", catalog, count))
                .into_response()
        }
        _ => failure("Failed to load currencies"),
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the full application router over a data directory
pub fn router(data_dir: impl Into<PathBuf>) -> Router {
    let state = AppState {
        data_dir: Arc::new(data_dir.into()),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/currencies/crypto", get(get_crypto))
        .route("/currencies/fiat", get(get_fiat))
        .route("/currencies/all", get(get_all))
        .with_state(state);

    Router::new()
        .route("/", get(server_info))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Check both list files up front; returns (crypto loaded, fiat loaded)
pub async fn probe_data_files(data_dir: &Path) -> (bool, bool) {
    let crypto = read_currency_file(&data_dir.join(CRYPTO_FILE)).await.is_some();
    let fiat = read_currency_file(&data_dir.join(FIAT_FILE)).await.is_some();

    info!(
        "Currency List A: {}",
        if crypto { "loaded" } else { "failed" }
    );
    info!("Currency List B: {}", if fiat { "loaded" } else { "failed" });

    (crypto, fiat)
}

/// Serve on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, data_dir: impl Into<PathBuf>) -> std::io::Result<()> {
    axum::serve(listener, router(data_dir)).await
}
