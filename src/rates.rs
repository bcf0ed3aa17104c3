// 💱 Rate Table + Cross Rate Calculator
//
// Source document: GET /json/currencies.json
//   { "base": "USD", "rates": { "USD": 1, "EUR": 0.9, ... }, "timestamp": 1700000000 }
//
// Every rate is relative to `base`. Cross rates between two arbitrary codes go through it.

use crate::catalog::CurrencyCode;
use crate::error::{ConverterError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: CurrencyCode,
    pub rates: HashMap<CurrencyCode, f64>,

    /// Publication time (Unix seconds), when the document carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl RateTable {
    pub fn new(base: CurrencyCode, rates: HashMap<CurrencyCode, f64>) -> Self {
        RateTable {
            base,
            rates,
            timestamp: None,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConverterError::DataParseFailed {
            document: "rate table".to_string(),
            reason: e.to_string(),
        })
    }

    /// Stored rate for `code`. Missing, zero, negative or non-finite rates are unusable.
    pub fn rate(&self, code: &CurrencyCode) -> Result<f64> {
        match self.rates.get(code) {
            Some(&r) if r.is_finite() && r > 0.0 => Ok(r),
            _ => Err(ConverterError::RateUnavailable(code.to_string())),
        }
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rate(code).is_ok()
    }

    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// Cross rate from `source` to `target`: `(r(target) / r(source)) * r(base)`.
///
/// The table's own base rate is applied as stored, not assumed to be 1.
pub fn compute_rate(
    source: &CurrencyCode,
    target: &CurrencyCode,
    table: &RateTable,
) -> Result<f64> {
    let source_rate = table.rate(source)?;
    let target_rate = table.rate(target)?;
    let base_rate = table.rate(&table.base)?;

    let rate = (target_rate / source_rate) * base_rate;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(ConverterError::RateUnavailable(format!("{}/{}", source, target)));
    }

    Ok(rate)
}
