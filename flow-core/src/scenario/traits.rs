// scenario/traits.rs

use super::{DailyScenario, ScenarioError};

/// Source of per-date market conditions used to bias a backtest.
pub trait ScenarioSource: Send + Sync {
    /// Look up or derive the scenario for a `YYYY-MM-DD` date.
    fn daily_scenario(&self, date: &str) -> Result<DailyScenario, ScenarioError>;
}
