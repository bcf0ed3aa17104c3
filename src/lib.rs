// Currency Converter - Core Library
// Exposes the conversion engine for use in the TUI, the one-shot CLI, the rates server, and tests
//
// Server routes and their tests sit behind the `server` feature:
//   cargo test --features full

pub mod error;
pub mod catalog;     // Ordered currency catalog (names.json)
pub mod rates;       // Rate table (currencies.json) + cross rate calculator
pub mod amount;      // Input validation + 2-decimal formatting
pub mod conversion;  // Linked source/target amounts
pub mod session;     // Loaded snapshots + conversion state
pub mod config;
pub mod loader;      // HTTP fetch of both documents

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use error::{ConverterError, Result};
pub use catalog::{Catalog, CatalogEntry, CurrencyCode};
pub use rates::{compute_rate, RateTable};
pub use amount::{format_amount, parse_amount, round2};
pub use conversion::{ConversionState, EditDirection, Side};
pub use session::{AmountRow, Session, SessionStatus};
pub use config::ConverterConfig;
pub use loader::DataLoader;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
