// ⚠️ Converter Errors
// One error type for the whole engine: loading, rate lookup, and input validation

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConverterError {
    /// Network failure or non-2xx response while fetching a document
    #[error("failed to fetch {url}: {reason}")]
    DataFetchFailed { url: String, reason: String },

    /// Response body is not valid JSON or not the expected shape
    #[error("failed to parse {document}: {reason}")]
    DataParseFailed { document: String, reason: String },

    /// Currency code missing from (or unusable in) the loaded rate table
    #[error("no exchange rate available for {0}")]
    RateUnavailable(String),

    /// User input that is not a positive amount with at most two decimals
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("invalid currency code {0:?}: expected three letters")]
    InvalidCurrencyCode(String),
}

impl ConverterError {
    /// Load failures end the session; everything else is recoverable by the next edit.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConverterError::DataFetchFailed { .. } | ConverterError::DataParseFailed { .. }
        )
    }

    pub(crate) fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        ConverterError::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
