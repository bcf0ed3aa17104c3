// ⚙️ Configuration - Where the two JSON documents come from

/// Environment variable consulted when no `--base-url` argument is given
pub const BASE_URL_ENV: &str = "CONVERTER_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub base_url: String,
}

impl ConverterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ConverterConfig {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// CLI argument first, then the environment, then the local default.
    pub fn resolve(cli_base_url: Option<String>) -> Self {
        let base_url = cli_base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        ConverterConfig::new(base_url)
    }

    pub fn names_url(&self) -> String {
        format!("{}/json/names.json", self.base_url)
    }

    pub fn currencies_url(&self) -> String {
        format!("{}/json/currencies.json", self.base_url)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig::new(DEFAULT_BASE_URL)
    }
}
