//! API Hub terminal demo.
//!
//! Reads commands from stdin and renders fetched resources to stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api_hub::Config;
use api_hub::coordinator::{CoordinatorConfig, RequestCoordinator};
use api_hub::resources::ResourceKind;
use api_hub::shell::{self, ApiDemo, Command, HELP, Presenter, RealtimeUpdates, TerminalPresenter};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("api_hub=info,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting API hub...");

    let config = Config::from_env();
    info!("Configuration loaded successfully");

    let coordinator = RequestCoordinator::new(CoordinatorConfig::from(&config))?;
    let presenter: Arc<dyn Presenter> = Arc::new(TerminalPresenter);
    let demo = ApiDemo::new(coordinator, config.endpoints.clone(), presenter.clone());
    let _loading = shell::forward_loading(demo.coordinator().loading(), presenter.clone());
    let updates = RealtimeUpdates::new();

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };

        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                presenter.show_notice(&e.to_string());
                continue;
            }
        };

        // Fetch failures are already shown by the presenter.
        match command {
            Command::Joke => {
                let _ = demo.fetch_joke().await;
            }
            Command::Weather => {
                let _ = demo.fetch_weather().await;
            }
            Command::Quote => {
                let _ = demo.fetch_quote().await;
            }
            Command::Fact => {
                let _ = demo.fetch_fact().await;
            }
            Command::Advice => {
                let _ = demo.fetch_advice().await;
            }
            Command::All => {
                let _ = demo.fetch_all().await;
            }
            Command::Batch => {
                if let Err(e) = demo.fetch_batch(&ResourceKind::ALL).await {
                    warn!("Batch fetch error: {}", e);
                }
            }
            Command::CacheInfo => {
                let _ = demo.cache_info();
            }
            Command::ClearCache => demo.clear_cache(),
            Command::Watch(period) => {
                if !updates.start(demo.clone(), period.unwrap_or(config.refresh_interval)) {
                    presenter.show_notice("Refresh interval must be greater than zero");
                }
            }
            Command::StopWatch => {
                if !updates.stop() {
                    presenter.show_notice("No periodic refresh running");
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    updates.stop();
    info!("Bye");

    Ok(())
}
