// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use std::env;

use currency_converter::{ConverterConfig, CurrencyCode, DataLoader, Side};

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = ConverterConfig::resolve(take_base_url(&mut args)?);

    if args.first().map(String::as_str) == Some("convert") {
        run_convert(config, &args[1..])?;
    } else {
        // UI mode (default)
        run_ui_mode(config)?;
    }

    Ok(())
}

/// Pull `--base-url <URL>` out of the argument list, leaving the rest in order.
fn take_base_url(args: &mut Vec<String>) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == "--base-url") else {
        return Ok(None);
    };

    if pos + 1 >= args.len() {
        bail!("--base-url needs a value");
    }

    let url = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(url))
}

fn run_convert(config: ConverterConfig, args: &[String]) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "currency_converter=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let [amount, from, to] = args else {
        bail!("usage: currency-converter convert <AMOUNT> <FROM> <TO> [--base-url URL]");
    };

    let from = CurrencyCode::parse(from)?;
    let to = CurrencyCode::parse(to)?;

    let loader = DataLoader::new(config);
    let runtime = tokio::runtime::Runtime::new()?;
    let mut session = runtime.block_on(loader.load_session())?;

    // Only the final pair has to be convertible
    let _ = session.set_currency(Side::Source, from.clone());
    session.set_currency(Side::Target, to.clone())?;
    session.edit(Side::Source, amount.as_str())?;

    let state = session.state();
    println!("{} {} = {} {}", amount, from, state.target_amount(), to);
    if let Some(rate) = state.current_rate() {
        println!("1 {} = {} {}", from, currency_converter::amount::format_rate(rate), to);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: ConverterConfig) -> Result<()> {
    use currency_converter::SessionStatus;

    let loader = DataLoader::new(config);
    println!("💱 Loading currency data from {}...\n", loader.config().base_url);
    let runtime = tokio::runtime::Runtime::new()?;
    let status = SessionStatus::from(runtime.block_on(loader.load_session()));

    match &status {
        SessionStatus::Ready(session) => {
            println!("✓ Loaded {} currencies", session.catalog().len());
            println!("Starting UI... (Press 'q' to quit)\n");
        }
        SessionStatus::Failed(err) => {
            eprintln!("❌ {}", err);
        }
    }

    let failed = status.error().is_some();

    // Load failures still open the UI so the error screen is visible
    let mut app = ui::App::new(status);
    ui::run_ui(&mut app)?;

    if failed {
        std::process::exit(1);
    }

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: ConverterConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use one-shot mode: currency-converter convert 100 USD EUR");
    std::process::exit(1);
}
