// flow-common/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::params::{BacktestParameters, Direction, ParameterOverrides};
use crate::scenario::DailyScenario;

/// Outcome of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    Win,
    Loss,
}

/// One accepted and executed trade. Values are rounded for reporting:
/// ratios to 4 places, percentages to 1-2, currency to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_num: usize,
    pub direction: Direction,
    pub put_call_ratio: f64,
    pub volume_spike: f64,
    pub iv_percentile: f64,
    pub timeframe_aligned: bool,
    /// Volume concentration in percent.
    pub volume_conc: f64,
    pub result: TradeOutcome,
    /// Return on the position in percent.
    pub percent_return: f64,
    pub profit: Decimal,
    /// Running capital after this trade.
    pub capital: Decimal,
    /// Drawdown from peak capital in percent.
    pub drawdown: f64,
    /// Win probability used for the outcome draw, in percent.
    pub win_prob: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.result == TradeOutcome::Win
    }
}

/// Attempts abandoned at each gate. Sums to `trades_filtered`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub entry: u64,
    pub volume_spike: u64,
    pub iv: u64,
    pub timeframe: u64,
}

impl RejectionCounts {
    pub fn total(&self) -> u64 {
        self.entry + self.volume_spike + self.iv + self.timeframe
    }
}

/// Aggregate statistics over every accepted trade of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_trades: usize,
    pub trades_attempted: u64,
    pub trades_filtered: u64,
    pub filter_rate: f64,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_profit: Decimal,
    pub final_capital: Decimal,
    pub return_percent: f64,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub expectancy: Decimal,
}

/// Market regime bias applied to candidate generation for a dated run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBias {
    pub trend: f64,
    pub volatility: f64,
    pub pc_ratio_avg: f64,
}

/// Result of simulating one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub direction: Direction,
    pub params: BacktestParameters,
    /// The most recent trades only; see `all_trades_count`.
    pub trades: Vec<Trade>,
    pub all_trades_count: usize,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
    pub rejections: RejectionCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_bias: Option<ScenarioBias>,
    /// Trading day the bias was resolved from, for dated runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<DailyScenario>,
    pub timestamp: DateTime<Utc>,
}

/// Display names of the three compared strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyLabel {
    #[serde(rename = "Advanced Puts")]
    AdvancedPuts,
    #[serde(rename = "Basic Puts")]
    BasicPuts,
    #[serde(rename = "Advanced Calls")]
    AdvancedCalls,
}

impl StrategyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyLabel::AdvancedPuts => "Advanced Puts",
            StrategyLabel::BasicPuts => "Basic Puts",
            StrategyLabel::AdvancedCalls => "Advanced Calls",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEfficiency {
    pub advanced_puts_filter_rate: f64,
    /// Expectancy gained per trade by filtering puts.
    pub trades_quality_improvement: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub win_rate_improvement: f64,
    pub profit_factor_improvement: f64,
    pub puts_vs_calls_win_rate: f64,
    pub best_strategy: StrategyLabel,
    pub best_profit_factor: f64,
    pub filter_efficiency: FilterEfficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub advanced_puts: BacktestResult,
    pub basic_puts: BacktestResult,
    pub advanced_calls: BacktestResult,
    pub comparison: ComparisonSummary,
}

/// Request envelope shared by the HTTP layer and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    /// Trading date (`YYYY-MM-DD`) whose scenario biases the simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Direction for single runs. Comparisons always run all three variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub overrides: ParameterOverrides,
}

impl BacktestRequest {
    pub fn parameters(&self) -> BacktestParameters {
        BacktestParameters::default().apply_overrides(&self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_splits_envelope_from_parameters() {
        let request: BacktestRequest = serde_json::from_str(
            r#"{"date": "2025-12-18", "seed": 7, "direction": "calls", "put_call_threshold": 1.3, "position_size": 250}"#,
        )
        .unwrap();

        assert_eq!(request.date.as_deref(), Some("2025-12-18"));
        assert_eq!(request.seed, Some(7));
        assert_eq!(request.direction, Some(Direction::Calls));

        let params = request.parameters();
        assert_eq!(params.put_call_threshold, 1.3);
        assert_eq!(params.position_size, dec!(250));
        assert_eq!(params.num_trades, 1000);
    }

    #[test]
    fn test_empty_request_uses_defaults() {
        let request: BacktestRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.parameters(), BacktestParameters::default());
        assert!(request.date.is_none());
    }

    #[test]
    fn test_strategy_label_serializes_display_name() {
        assert_eq!(
            serde_json::to_string(&StrategyLabel::AdvancedCalls).unwrap(),
            "\"Advanced Calls\""
        );
        assert_eq!(StrategyLabel::BasicPuts.as_str(), "Basic Puts");
    }

    #[test]
    fn test_rejection_total() {
        let counts = RejectionCounts { entry: 3, volume_spike: 2, iv: 1, timeframe: 0 };
        assert_eq!(counts.total(), 6);
    }
}
