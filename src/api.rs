// Currency Basics - API Client
// HTTP client for the currency API server

use crate::currency::{CurrencyCatalog, CurrencyRecord};
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Default base URL of the API server
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

// Endpoints, relative to the base URL
pub const HEALTH_ENDPOINT: &str = "/health";
pub const CRYPTO_ENDPOINT: &str = "/currencies/crypto";
pub const FIAT_ENDPOINT: &str = "/currencies/fiat";
pub const ALL_ENDPOINT: &str = "/currencies/all";

/// Where the data source gets its catalog from
#[async_trait]
pub trait CurrencyFeed: Send + Sync {
    /// Fetch both lists in one go
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, ApiError>;

    /// Whether the remote side currently answers
    async fn is_available(&self) -> bool;
}

/// Response envelope as sent by the server.
///
/// `data` stays untyped until `success` has been checked, because failed
/// responses carry an empty array whatever the endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl Envelope {
    fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "API request failed".to_string()),
            ));
        }

        serde_json::from_value(self.data).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Result of `GET /health`
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// HTTP client for communicating with the currency API server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_envelope(&self, endpoint: &str) -> Result<Envelope, ApiError> {
        let start = Instant::now();
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "API request failed: network error");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "API request failed: bad status");
            return Err(ApiError::Status(status.as_u16()));
        }

        let envelope = response.json::<Envelope>().await.map_err(|e| {
            error!(error = %e, "API request failed: unreadable body");
            ApiError::Decode(e.to_string())
        })?;

        debug!(duration_ms = start.elapsed().as_millis(), "API request complete");
        Ok(envelope)
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.fetch_envelope(endpoint)
            .await?
            .into_data()
            .map_err(|e| {
                error!(endpoint, error = %e, "API request failed");
                e
            })
    }

    /// Currency list A
    pub async fn get_crypto(&self) -> Result<Vec<CurrencyRecord>, ApiError> {
        self.request(CRYPTO_ENDPOINT).await
    }

    /// Currency list B
    pub async fn get_fiat(&self) -> Result<Vec<CurrencyRecord>, ApiError> {
        self.request(FIAT_ENDPOINT).await
    }

    pub async fn get_all(&self) -> Result<CurrencyCatalog, ApiError> {
        self.request(ALL_ENDPOINT).await
    }

    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let envelope = self.fetch_envelope(HEALTH_ENDPOINT).await?;

        if !envelope.success {
            return Err(ApiError::Rejected(
                envelope.message.unwrap_or_else(|| "API request failed".to_string()),
            ));
        }

        let timestamp = envelope
            .extra
            .get("timestamp")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(HealthStatus {
            message: envelope.message.unwrap_or_default(),
            timestamp,
        })
    }

    pub async fn is_server_running(&self) -> bool {
        self.health_check().await.is_ok()
    }
}

#[async_trait]
impl CurrencyFeed for ApiClient {
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, ApiError> {
        self.get_all().await
    }

    async fn is_available(&self) -> bool {
        self.is_server_running().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_successful_envelope_yields_data() {
        let records: Vec<CurrencyRecord> = envelope(
            r#"{"success":true,"message":"ok","data":[{"id":"BTC","name":"Bitcoin","symbol":"BTC"}],"count":1}"#,
        )
        .into_data()
        .unwrap();

        assert_eq!(records, vec![CurrencyRecord::new("BTC", "Bitcoin", "BTC")]);
    }

    #[test]
    fn test_failed_envelope_carries_server_message() {
        let result: Result<CurrencyCatalog, _> =
            envelope(r#"{"success":false,"message":"Failed to load currencies","data":[]}"#).into_data();

        match result {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Failed to load currencies"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_envelope_without_message() {
        let result: Result<Vec<CurrencyRecord>, _> = envelope(r#"{"success":false}"#).into_data();

        match result {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "API request failed"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_data_shape_is_a_decode_error() {
        let result: Result<CurrencyCatalog, _> =
            envelope(r#"{"success":true,"data":[1,2,3]}"#).into_data();

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:3001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001/api");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_reported_offline() {
        // Port 9 (discard) on localhost is closed on any sane test machine
        let client = ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();

        assert!(!client.is_server_running().await);
        assert!(matches!(client.get_all().await, Err(ApiError::Network(_))));
    }
}
