// flow-core/src/backtest/engine.rs

use chrono::Utc;
use flow_common::utils::{decimal_from_f64, round_to};
use flow_common::{
    BacktestParameters, BacktestResult, DailyScenario, Direction, RejectionCounts, ScenarioBias,
    Trade, TradeOutcome, ValidationError,
};
use rand::Rng;
use tracing::{debug, info};

use super::candidate::TradeCandidate;
use super::filters::{self, EntrySignal};
use super::ledger::Ledger;
use super::metrics::MetricsCalculator;
use super::validation::validate;

/// Number of most recent trades kept on a result.
pub const RECENT_TRADES: usize = 50;

/// Attempts allowed per requested trade, bounding the loop when filters
/// reject most candidates.
pub const ATTEMPT_MULTIPLIER: usize = 3;

const TARGET_HIT_PROBABILITY: f64 = 0.35;
const STOP_HIT_PROBABILITY: f64 = 0.40;

/// Simulates synthetic trades for one validated parameter set.
///
/// The engine holds no random state; every run draws from the generator the
/// caller passes in, so concurrent runs never share state.
pub struct BacktestEngine {
    params: BacktestParameters,
    bias: Option<ScenarioBias>,
    scenario: Option<DailyScenario>,
    metrics_calculator: MetricsCalculator,
}

impl BacktestEngine {
    pub fn new(params: BacktestParameters) -> Result<Self, ValidationError> {
        validate(&params)?;

        Ok(Self {
            params,
            bias: None,
            scenario: None,
            metrics_calculator: MetricsCalculator::new(),
        })
    }

    pub fn with_bias(mut self, bias: Option<ScenarioBias>) -> Self {
        self.bias = bias;
        self
    }

    /// Bias the run with a trading day's regime and report the day on the result.
    pub fn with_scenario(mut self, scenario: Option<DailyScenario>) -> Self {
        self.bias = scenario.as_ref().map(DailyScenario::bias);
        self.scenario = scenario;
        self
    }

    /// Same parameters and bias with every optional filter switched off.
    pub fn without_filters(&self) -> Self {
        Self {
            params: self.params.clone().with_filters(false),
            bias: self.bias,
            scenario: self.scenario.clone(),
            metrics_calculator: MetricsCalculator::new(),
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, direction: Direction, rng: &mut R) -> BacktestResult {
        let quota = self.params.trade_quota();
        let max_attempts = quota * ATTEMPT_MULTIPLIER;

        info!(
            "Starting {} backtest: {} trades, threshold {}, scenario bias {}",
            direction,
            quota,
            self.params.put_call_threshold,
            if self.bias.is_some() { "on" } else { "off" }
        );

        let mut ledger = Ledger::new(self.params.initial_capital);
        let mut trades: Vec<Trade> = Vec::with_capacity(quota);
        let mut rejections = RejectionCounts::default();
        let mut trades_attempted: u64 = 0;

        for _ in 0..max_attempts {
            if trades.len() >= quota {
                break;
            }
            trades_attempted += 1;

            let candidate = TradeCandidate::draw(rng, self.bias.as_ref());
            let signal = match filters::evaluate(&candidate, &self.params, direction) {
                Ok(signal) => signal,
                Err(rejection) => {
                    rejection.record(&mut rejections);
                    continue;
                }
            };

            let trade = self.execute(direction, &candidate, &signal, &mut ledger, trades.len() + 1, rng);
            trades.push(trade);
        }

        debug!("Rejections by stage: {:?}", rejections);

        let metrics = self.metrics_calculator.calculate(
            &trades,
            &ledger,
            trades_attempted,
            rejections.total(),
        );

        info!(
            "Backtest completed: {} trades from {} attempts, win rate {}%, profit {}",
            metrics.total_trades, trades_attempted, metrics.win_rate, metrics.total_profit
        );

        let all_trades_count = trades.len();
        let recent = trades.split_off(all_trades_count.saturating_sub(RECENT_TRADES));

        BacktestResult {
            direction,
            params: self.params.clone(),
            trades: recent,
            all_trades_count,
            metrics,
            rejections,
            scenario_bias: self.bias,
            scenario: self.scenario.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Draw the outcome of an accepted candidate and book it. Dollar profit is
    /// rounded to cents before it touches capital.
    fn execute<R: Rng + ?Sized>(
        &self,
        direction: Direction,
        candidate: &TradeCandidate,
        signal: &EntrySignal,
        ledger: &mut Ledger,
        trade_num: usize,
        rng: &mut R,
    ) -> Trade {
        let is_win = rng.gen::<f64>() < signal.win_probability;

        let (result, percent_return) = if is_win {
            let r = if rng.gen::<f64>() < TARGET_HIT_PROBABILITY {
                self.params.profit_target
            } else {
                0.05 + rng.gen::<f64>() * 0.15
            };
            (TradeOutcome::Win, r)
        } else {
            let r = if rng.gen::<f64>() < STOP_HIT_PROBABILITY {
                self.params.stop_loss
            } else {
                -0.10 - rng.gen::<f64>() * 0.40
            };
            (TradeOutcome::Loss, r)
        };

        let profit = (self.params.position_size * decimal_from_f64(percent_return)).round_dp(2);
        let drawdown = ledger.record(result, profit);

        Trade {
            trade_num,
            direction,
            put_call_ratio: round_to(candidate.put_call_ratio, 4),
            volume_spike: round_to(candidate.volume_spike, 2),
            iv_percentile: round_to(candidate.iv_percentile, 1),
            timeframe_aligned: candidate.timeframe_aligned,
            volume_conc: round_to(candidate.volume_concentration * 100.0, 1),
            result,
            percent_return: round_to(percent_return * 100.0, 2),
            profit,
            capital: ledger.capital(),
            drawdown: round_to(drawdown, 2),
            win_prob: round_to(signal.win_probability * 100.0, 1),
        }
    }
}
