// flow-backtest: an options flow backtester written in Rust
// Copyright (C) 2024 Harrison
//
// This program is part of flow-backtest and is released under the GNU GPL v3
// or later. See the LICENSE file for details.

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use flow_core::config::Settings;
use flow_server::{ApiServer, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Application starting...");

    let settings = Settings::new()?;
    let state = AppState::from_settings(&settings);
    if settings.backtest.seed.is_some() {
        tracing::info!("Backtests use a fixed seed");
    }

    ApiServer::new(state, settings.server.allowed_origins.clone())
        .serve(&settings.bind_address())
        .await
}
