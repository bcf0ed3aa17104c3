// 🌐 Rates Server - Publishes the catalog + rate table documents
//
// GET /json/*      → static files under <data_dir>/json
// GET /currencies  → 302 /json/currencies.json
// GET /names       → 302 /json/names.json
// GET /            → plaintext liveness marker

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const DEFAULT_PORT: u16 = 8000;

pub const LIVENESS_MARKER: &str = "Currency rates server is running";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Port is the only startup option; the data directory is fixed relative to the working dir.
    pub fn from_port_arg(arg: Option<&str>) -> anyhow::Result<Self> {
        let port = match arg {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid port {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(ServerConfig {
            port,
            ..Default::default()
        })
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("data"),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - Liveness check
async fn liveness() -> impl IntoResponse {
    LIVENESS_MARKER
}

fn found(location: &'static str) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

/// GET /currencies - Redirect to the rate table
async fn currencies_redirect() -> impl IntoResponse {
    found("/json/currencies.json")
}

/// GET /names - Redirect to the catalog
async fn names_redirect() -> impl IntoResponse {
    found("/json/names.json")
}

pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/currencies", get(currencies_redirect))
        .route("/names", get(names_redirect))
        .nest_service("/json", ServeDir::new(config.data_dir.join("json")))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// Compiled only with the `server` feature: cargo test --features full
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = ServerConfig {
            port: 0,
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
        };
        router(&config)
    }

    async fn get_path(path: &str) -> axum::response::Response {
        test_router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = get_path("/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], LIVENESS_MARKER.as_bytes());
    }

    #[tokio::test]
    async fn test_redirects() {
        let response = get_path("/currencies").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/json/currencies.json"
        );

        let response = get_path("/names").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/json/names.json");
    }

    #[tokio::test]
    async fn test_serves_documents() {
        let response = get_path("/json/names.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let catalog = crate::Catalog::from_json(std::str::from_utf8(&body).unwrap()).unwrap();
        assert_eq!(catalog.entries()[0].code.as_str(), "USD");

        let response = get_path("/json/currencies.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rates = crate::RateTable::from_json(std::str::from_utf8(&body).unwrap()).unwrap();
        assert_eq!(rates.base.as_str(), "USD");
    }

    #[tokio::test]
    async fn test_unknown_document() {
        let response = get_path("/json/missing.json").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_port_argument() {
        assert_eq!(ServerConfig::from_port_arg(None).unwrap().port, 8000);
        assert_eq!(ServerConfig::from_port_arg(Some("9100")).unwrap().addr(), "0.0.0.0:9100");
        assert!(ServerConfig::from_port_arg(Some("http")).is_err());
    }
}
