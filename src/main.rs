mod api;
mod chain;
mod config;
mod domain;
mod scanner;
mod venues;

use std::env;
use std::sync::Arc;

use api::AppState;
use chain::{AptosRestClient, ChainClient};
use config::Config;
use scanner::Scanner;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = parse_config_path();
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    init_tracing(config.app.log_level.as_deref());

    let scanner = match Scanner::from_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!(error = %e, "Failed to create scanner");
            return;
        }
    };

    let chain: Option<Arc<dyn ChainClient>> = match config.chain {
        Some(ref chain_config) => match AptosRestClient::new(chain_config) {
            Ok(client) => {
                info!(node = %chain_config.node_url, "Chain client ready");
                Some(Arc::new(client))
            }
            Err(e) => {
                error!(error = %e, "Failed to create chain client");
                return;
            }
        },
        None => {
            warn!("No chain configured, account and transaction endpoints are disabled");
            None
        }
    };

    let app = api::create_router(AppState {
        scanner: scanner.clone(),
        chain,
    });

    let addr = config.server.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind");
            return;
        }
    };

    info!(
        app = %config.app.name,
        env = %config.app.env,
        addr = %addr,
        venues = ?scanner.venues(),
        "Gateway listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
    }

    let stats = scanner.stats().await;
    info!(
        scans = stats.scans,
        opportunities = stats.opportunities_reported,
        venue_failures = stats.venue_failures,
        "Gateway stopped"
    );
}
