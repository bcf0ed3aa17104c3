// 📥 Data Loader - Fetch catalog + rate table, build a Session
//
// Both documents are requested concurrently and awaited independently.
// No retries: any failure ends the session and is reported to the caller.

use crate::catalog::Catalog;
use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::rates::RateTable;
use crate::session::Session;
use reqwest::Client;
use tracing::{debug, warn};

pub struct DataLoader {
    client: Client,
    config: ConverterConfig,
}

impl DataLoader {
    pub fn new(config: ConverterConfig) -> Self {
        DataLoader {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url, "fetching document");

        let fetch_failed = |reason: String| {
            warn!(url, %reason, "document fetch failed");
            ConverterError::DataFetchFailed {
                url: url.to_string(),
                reason,
            }
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(fetch_failed(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| fetch_failed(e.to_string()))
    }

    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let url = self.config.names_url();
        let text = self.fetch_text(&url).await?;
        Catalog::from_json(&text)
    }

    pub async fn fetch_rates(&self) -> Result<RateTable> {
        let url = self.config.currencies_url();
        let text = self.fetch_text(&url).await?;
        RateTable::from_json(&text)
    }

    /// Load both documents; a Session exists only if both succeed.
    pub async fn load_session(&self) -> Result<Session> {
        let (catalog, rates) = tokio::join!(self.fetch_catalog(), self.fetch_rates());

        let catalog = catalog?;
        let rates = rates?;
        debug!(
            currencies = catalog.len(),
            base = %rates.base,
            "session data loaded"
        );

        Ok(Session::new(catalog, rates))
    }
}
