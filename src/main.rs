mod app;
mod config;
mod constants;
mod data;
mod error;
mod state;
mod ui;
mod widgets;
mod worker;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::MarketDashboard;
use crate::config::DashboardConfig;

/// Interactive S&P 500 snapshot dashboard
#[derive(Debug, Parser)]
#[command(name = "sp500-dashboard", version, about)]
struct Cli {
    /// Snapshot CSV to open instead of the configured one
    data: Option<PathBuf>,

    /// Settings file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Settings named on the command line, with the positional snapshot path on top
fn resolve_config(cli: &Cli) -> DashboardConfig {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            DashboardConfig::default()
        }),
        None => DashboardConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    config
}

fn main() -> eframe::Result {
    init_tracing();
    let cli = Cli::parse();

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = {
        puffin::set_scopes_on(true);
        puffin_http::Server::new(&format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT)).ok()
    };

    let config = resolve_config(&cli);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "S&P 500 Market Dashboard",
        options,
        Box::new(|_| Ok(Box::new(MarketDashboard::new(config)))),
    )
}
