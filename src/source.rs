// Currency Basics - Data Source
// Fetches the catalog from a feed and keeps it in the snapshot store

use crate::api::CurrencyFeed;
use crate::currency::{CurrencyCatalog, CurrencyCategory, CurrencyRecord};
use crate::error::{CurrencyError, Result};
use crate::store::SnapshotStore;
use tracing::{info, warn};

/// The currency data the application works from.
///
/// Crypto and fiat lists are read back from the store on every call; the
/// combined list and the record count come from the in-memory copy.
pub struct CurrencySource<F> {
    store: SnapshotStore,
    feed: F,
    catalog: Option<CurrencyCatalog>,
}

impl<F: CurrencyFeed> CurrencySource<F> {
    /// Build a source, hydrating the in-memory copy from whatever is stored.
    ///
    /// A corrupt snapshot starts the source empty so it can still be cleared.
    pub fn open(store: SnapshotStore, feed: F) -> Result<Self> {
        let catalog = match store.load() {
            Ok(catalog) => catalog,
            Err(CurrencyError::CorruptSnapshot { key }) => {
                warn!(%key, "Ignoring corrupt currency snapshot");
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(ref catalog) = catalog {
            info!(records = catalog.len(), "Loaded stored currency snapshot");
        }

        Ok(Self { store, feed, catalog })
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Remove every record, in memory and on disk
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear()?;
        self.catalog = None;
        info!("Local currency data cleared");
        Ok(())
    }

    /// Fetch the full catalog and replace whatever was stored.
    ///
    /// Returns the new record count. A failed fetch leaves existing data alone.
    pub async fn insert_all(&mut self) -> Result<usize> {
        let catalog = self.feed.fetch_catalog().await?;

        self.store.save(&catalog)?;
        let count = catalog.len();
        self.catalog = Some(catalog);

        info!(records = count, "Currency data inserted");
        Ok(count)
    }

    pub fn crypto_list(&self) -> Result<Vec<CurrencyRecord>> {
        Ok(self.store.load()?.map(|c| c.crypto).unwrap_or_default())
    }

    pub fn fiat_list(&self) -> Result<Vec<CurrencyRecord>> {
        Ok(self.store.load()?.map(|c| c.fiat).unwrap_or_default())
    }

    /// Crypto followed by fiat
    pub fn combined_list(&self) -> Vec<CurrencyRecord> {
        self.catalog
            .as_ref()
            .map(CurrencyCatalog::combined)
            .unwrap_or_default()
    }

    pub fn list(&self, category: CurrencyCategory) -> Result<Vec<CurrencyRecord>> {
        match category {
            CurrencyCategory::Crypto => self.crypto_list(),
            CurrencyCategory::Fiat => self.fiat_list(),
            CurrencyCategory::All => Ok(self.combined_list()),
        }
    }

    pub fn record_count(&self) -> usize {
        self.catalog.as_ref().map(CurrencyCatalog::len).unwrap_or(0)
    }
}
