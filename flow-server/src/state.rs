use std::sync::Arc;

use flow_core::{config::Settings, service::BacktestService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BacktestService>,
}

impl AppState {
    pub fn new(service: BacktestService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(BacktestService::default().with_seed(settings.backtest.seed))
    }
}
