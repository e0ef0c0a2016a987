// Currency Basics - Snapshot Store
// The whole catalog persisted as a single versioned blob in SQLite (WAL)

use crate::currency::CurrencyCatalog;
use crate::error::{CurrencyError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, warn};

/// Key of the one snapshot row
pub const SNAPSHOT_KEY: &str = "all_data";

/// Bumped whenever the payload shape changes; older blobs are ignored
pub const SNAPSHOT_FORMAT_VERSION: i64 = 1;

/// SHA-256 of a stored payload, hex encoded
pub fn compute_checksum(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Create the snapshot table
pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            key TEXT PRIMARY KEY,
            format_version INTEGER NOT NULL,
            payload TEXT NOT NULL,
            checksum TEXT NOT NULL,
            saved_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Local persistent storage for the currency catalog.
///
/// Writes always replace the whole catalog; there is no per-record update.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) the database file, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                debug!(dir = %parent.display(), "Created database directory");
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(Self { conn })
    }

    /// Overwrite the stored catalog
    pub fn save(&self, catalog: &CurrencyCatalog) -> Result<()> {
        let payload = serde_json::to_string(catalog)?;
        let checksum = compute_checksum(&payload);

        self.conn.execute(
            "INSERT INTO snapshots (key, format_version, payload, checksum, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(key) DO UPDATE SET
                format_version = excluded.format_version,
                payload = excluded.payload,
                checksum = excluded.checksum,
                saved_at = excluded.saved_at",
            params![
                SNAPSHOT_KEY,
                SNAPSHOT_FORMAT_VERSION,
                payload,
                checksum,
                Utc::now().to_rfc3339(),
            ],
        )?;

        debug!(records = catalog.len(), "Snapshot saved");
        Ok(())
    }

    /// Read the stored catalog, `None` when nothing usable is stored
    pub fn load(&self) -> Result<Option<CurrencyCatalog>> {
        let row = self
            .conn
            .query_row(
                "SELECT format_version, payload, checksum FROM snapshots WHERE key = ?1",
                params![SNAPSHOT_KEY],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((format_version, payload, checksum)) = row else {
            return Ok(None);
        };

        if format_version != SNAPSHOT_FORMAT_VERSION {
            warn!(
                stored = format_version,
                expected = SNAPSHOT_FORMAT_VERSION,
                "Ignoring snapshot with unknown format version"
            );
            return Ok(None);
        }

        if compute_checksum(&payload) != checksum {
            return Err(CurrencyError::CorruptSnapshot {
                key: SNAPSHOT_KEY.to_string(),
            });
        }

        Ok(Some(serde_json::from_str(&payload)?))
    }

    /// Delete the stored catalog. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM snapshots WHERE key = ?1", params![SNAPSHOT_KEY])?;
        Ok(removed > 0)
    }

    /// When the current snapshot was written
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        let saved_at: Option<String> = self
            .conn
            .query_row(
                "SELECT saved_at FROM snapshots WHERE key = ?1",
                params![SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(saved_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Rewrite the stored payload without touching its checksum
    #[cfg(test)]
    pub(crate) fn corrupt_payload(&self) -> Result<()> {
        self.conn.execute(
            "UPDATE snapshots SET payload = ?1 WHERE key = ?2",
            params![r#"{"crypto":[],"fiat":[]}"#, SNAPSHOT_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyRecord;

    fn create_test_catalog() -> CurrencyCatalog {
        CurrencyCatalog::new(
            vec![
                CurrencyRecord::new("BTC", "Bitcoin", "BTC"),
                CurrencyRecord::new("ETH", "Ethereum", "ETH"),
            ],
            vec![CurrencyRecord::new("USD", "US Dollar", "$").with_code("USD")],
        )
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = SnapshotStore::open_in_memory().unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.saved_at().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let catalog = create_test_catalog();

        store.save(&catalog).unwrap();

        assert_eq!(store.load().unwrap(), Some(catalog));
        assert!(store.saved_at().unwrap().is_some());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let store = SnapshotStore::open_in_memory().unwrap();
        store.save(&create_test_catalog()).unwrap();

        let smaller = CurrencyCatalog::new(vec![CurrencyRecord::new("XRP", "Ripple", "XRP")], vec![]);
        store.save(&smaller).unwrap();

        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
            .unwrap();

        assert_eq!(rows, 1, "Only one snapshot row should ever exist");
        assert_eq!(store.load().unwrap(), Some(smaller));
    }

    #[test]
    fn test_clear() {
        let store = SnapshotStore::open_in_memory().unwrap();
        store.save(&create_test_catalog()).unwrap();

        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is harmless
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let store = SnapshotStore::open_in_memory().unwrap();
        store.save(&create_test_catalog()).unwrap();

        store.corrupt_payload().unwrap();

        match store.load() {
            Err(CurrencyError::CorruptSnapshot { key }) => assert_eq!(key, SNAPSHOT_KEY),
            other => panic!("expected corrupt snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_version_is_ignored() {
        let store = SnapshotStore::open_in_memory().unwrap();
        store.save(&create_test_catalog()).unwrap();

        store
            .connection()
            .execute(
                "UPDATE snapshots SET format_version = ?1",
                params![SNAPSHOT_FORMAT_VERSION + 1],
            )
            .unwrap();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("currencies.db");

        {
            let store = SnapshotStore::open(&path).unwrap();
            store.save(&create_test_catalog()).unwrap();
        }

        let reopened = SnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(create_test_catalog()));
    }

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(compute_checksum("abc"), compute_checksum("abc"));
        assert_ne!(compute_checksum("abc"), compute_checksum("abd"));
        assert_eq!(compute_checksum("").len(), 64);
    }
}
