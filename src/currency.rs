// Currency Basics - Currency Model
// Records, catalogs and the category selector shared by client and server

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RECORD
// ============================================================================

/// One entry of a currency list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    /// Stable identifier, unique within a list
    pub id: String,

    /// Display name ("Bitcoin Cash", "US Dollar")
    pub name: String,

    /// Short ticker ("BCH", "$")
    pub symbol: String,

    /// ISO 4217 code, only carried by fiat entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CurrencyRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Both currency lists, fetched and persisted as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCatalog {
    #[serde(default)]
    pub crypto: Vec<CurrencyRecord>,

    #[serde(default)]
    pub fiat: Vec<CurrencyRecord>,
}

impl CurrencyCatalog {
    pub fn new(crypto: Vec<CurrencyRecord>, fiat: Vec<CurrencyRecord>) -> Self {
        Self { crypto, fiat }
    }

    /// Total number of records across both lists
    pub fn len(&self) -> usize {
        self.crypto.len() + self.fiat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Crypto entries followed by fiat entries
    pub fn combined(&self) -> Vec<CurrencyRecord> {
        self.crypto.iter().chain(self.fiat.iter()).cloned().collect()
    }

    pub fn list(&self, category: CurrencyCategory) -> Vec<CurrencyRecord> {
        match category {
            CurrencyCategory::Crypto => self.crypto.clone(),
            CurrencyCategory::Fiat => self.fiat.clone(),
            CurrencyCategory::All => self.combined(),
        }
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyCategory {
    Crypto,
    Fiat,
    /// Everything purchasable: crypto followed by fiat
    All,
}

impl CurrencyCategory {
    /// Title of the list modal
    pub fn title(&self) -> &'static str {
        match self {
            CurrencyCategory::Crypto => "Currency List A - Crypto",
            CurrencyCategory::Fiat => "Currency List B - Fiat",
            CurrencyCategory::All => "Purchasable Currencies (A & B)",
        }
    }

    /// Message shown when loading this list fails
    pub fn load_error(&self) -> &'static str {
        match self {
            CurrencyCategory::Crypto => "Failed to load crypto currencies.",
            CurrencyCategory::Fiat => "Failed to load fiat currencies.",
            CurrencyCategory::All => "Failed to load purchasable currencies.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCategory::Crypto => "crypto",
            CurrencyCategory::Fiat => "fiat",
            CurrencyCategory::All => "all",
        }
    }
}

impl fmt::Display for CurrencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crypto" | "a" => Ok(CurrencyCategory::Crypto),
            "fiat" | "b" => Ok(CurrencyCategory::Fiat),
            "all" | "purchasable" => Ok(CurrencyCategory::All),
            other => Err(format!("unknown currency category '{}' (expected crypto, fiat or all)", other)),
        }
    }
}
