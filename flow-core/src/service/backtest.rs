use std::sync::Arc;

use flow_common::{BacktestRequest, BacktestResult, ComparisonResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use super::ServiceError;
use crate::backtest::{compare_strategies, BacktestEngine};
use crate::scenario::{HistoricalScenarios, ScenarioSource};

/// Entry point for running and comparing backtests from caller requests.
///
/// Holds only immutable collaborators. Every call builds its own engine and
/// random generator, so one service can be shared across request handlers.
pub struct BacktestService {
    scenarios: Arc<dyn ScenarioSource>,
    default_seed: Option<u64>,
}

impl Default for BacktestService {
    fn default() -> Self {
        Self::new(Arc::new(HistoricalScenarios::new()))
    }
}

impl BacktestService {
    pub fn new(scenarios: Arc<dyn ScenarioSource>) -> Self {
        Self {
            scenarios,
            default_seed: None,
        }
    }

    /// Seed used when a request does not carry its own.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.default_seed = seed;
        self
    }

    /// Run a single-direction backtest. Direction defaults to puts.
    pub fn run(&self, request: &BacktestRequest) -> Result<BacktestResult, ServiceError> {
        let direction = request.direction.unwrap_or_default();
        let (engine, mut rng) = self.prepare(request)?;
        Ok(engine.run(direction, &mut rng))
    }

    /// Run the three-variant strategy comparison.
    pub fn compare(&self, request: &BacktestRequest) -> Result<ComparisonResult, ServiceError> {
        if request.direction.is_some() {
            debug!("Direction is ignored for comparisons");
        }
        let (engine, mut rng) = self.prepare(request)?;
        Ok(compare_strategies(&engine, &mut rng))
    }

    fn prepare(&self, request: &BacktestRequest) -> Result<(BacktestEngine, ChaCha8Rng), ServiceError> {
        let engine = BacktestEngine::new(request.parameters()).map_err(|e| {
            warn!("Rejected backtest parameters: {}", e);
            e
        })?;

        let scenario = match request.date.as_deref() {
            Some(date) => Some(self.scenarios.daily_scenario(date)?),
            None => None,
        };

        let rng = match request.seed.or(self.default_seed) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok((engine.with_scenario(scenario), rng))
    }
}
