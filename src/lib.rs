// Currency Basics - Core Library
// Shared by the terminal client, the API server and tests

pub mod api;
pub mod app;
pub mod config;
pub mod currency;
pub mod error;
pub mod filter;
pub mod list_view;
pub mod logging;
pub mod source;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use api::{ApiClient, CurrencyFeed, HealthStatus};
pub use app::{HomeAction, HomeScreen, Notice, ServerStatus};
pub use config::{ClientConfig, ServerArgs};
pub use currency::{CurrencyCatalog, CurrencyCategory, CurrencyRecord};
pub use error::{ApiError, CurrencyError, Result};
pub use filter::{filter_currencies, matches_query};
pub use list_view::{CurrencyListView, EmptyState};
pub use source::CurrencySource;
pub use store::SnapshotStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
