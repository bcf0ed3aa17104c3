// Currency Converter - Rates Server
// Publishes names.json + currencies.json for the converter clients

use anyhow::{Context, Result};
use currency_converter::server::{router, ServerConfig};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "currency_converter=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🌐 Currency Converter - Rates Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_port_arg(args.get(1).map(String::as_str))?;

    let json_dir = config.data_dir.join("json");
    if !json_dir.exists() {
        eprintln!("❌ Data directory not found at {:?}", json_dir);
        eprintln!("   Run the server from the repository root.");
        std::process::exit(1);
    }
    println!("✓ Serving documents from {:?}", json_dir);

    let app = router(&config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!(%addr, "rates server listening");
    println!("\n🚀 Server running on http://localhost:{}", config.port);
    println!("   Names: http://localhost:{}/json/names.json", config.port);
    println!("   Rates: http://localhost:{}/json/currencies.json", config.port);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
