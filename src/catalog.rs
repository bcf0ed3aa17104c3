// 📇 Currency Catalog - Ordered list of codes + display names
//
// Source document: GET /json/names.json → { "USD": "United States Dollar", ... }
//
// Order matters: the first two entries become the default source/target pair,
// so the catalog is read with an order-preserving deserializer instead of a map.

use crate::error::{ConverterError, Result};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// CURRENCY CODE
// ============================================================================

/// Three-letter currency identifier, stored upper-cased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConverterError::InvalidCurrencyCode(input.to_string()));
        }

        Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ConverterError;

    fn try_from(value: String) -> Result<Self> {
        CurrencyCode::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        CurrencyCode::parse(s)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub code: CurrencyCode,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from entries in their intended order.
    ///
    /// Fails if two entries share a code.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.code.clone()) {
                return Err(ConverterError::DataParseFailed {
                    document: "currency catalog".to_string(),
                    reason: format!("duplicate currency code {}", entry.code),
                });
            }
        }

        Ok(Catalog { entries })
    }

    /// Parse the names document, keeping the key order of the JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConverterError::DataParseFailed {
            document: "currency catalog".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &CurrencyCode) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.code == code)
    }

    pub fn display_name(&self, code: &CurrencyCode) -> Option<&str> {
        self.get(code).map(|entry| entry.display_name.as_str())
    }

    pub fn position(&self, code: &CurrencyCode) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.code == code)
    }

    /// Entry `step` places away from `code`, wrapping at both ends.
    /// Unknown codes start from the first entry.
    pub fn cycle(&self, code: Option<&CurrencyCode>, step: isize) -> Option<&CurrencyCode> {
        if self.entries.is_empty() {
            return None;
        }

        let len = self.entries.len() as isize;
        let next = match code.and_then(|c| self.position(c)) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };

        Some(&self.entries[next as usize].code)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping currency codes to display names")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Catalog, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));

                while let Some((code, display_name)) = map.next_entry::<CurrencyCode, String>()? {
                    entries.push(CatalogEntry { code, display_name });
                }

                Catalog::new(entries).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
