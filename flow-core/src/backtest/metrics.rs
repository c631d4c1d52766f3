// flow-core/src/backtest/metrics.rs

use flow_common::utils::{decimal_to_f64, round_to};
use flow_common::{PerformanceMetrics, Trade};
use rust_decimal::Decimal;

use super::ledger::Ledger;

pub struct MetricsCalculator {
    /// Periods per year used to annualize the Sharpe ratio.
    periods_per_year: f64,
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self { periods_per_year: 252.0 }
    }

    /// Aggregate every recorded trade of a run. Degenerate inputs (no trades,
    /// no losers, zero variance) produce zero rather than failing.
    pub fn calculate(
        &self,
        trades: &[Trade],
        ledger: &Ledger,
        trades_attempted: u64,
        trades_filtered: u64,
    ) -> PerformanceMetrics {
        let wins = ledger.wins();
        let losses = ledger.losses();
        let total_trades = ledger.total_trades();

        let gross_win: Decimal = trades.iter().filter(|t| t.is_win()).map(|t| t.profit).sum();
        let gross_loss: Decimal = trades.iter().filter(|t| !t.is_win()).map(|t| t.profit).sum();
        let returns: Vec<f64> = trades.iter().map(|t| t.percent_return).collect();

        PerformanceMetrics {
            total_trades,
            trades_attempted,
            trades_filtered,
            filter_rate: round_to(self.calculate_filter_rate(trades_filtered, trades_attempted), 1),
            wins,
            losses,
            win_rate: round_to(self.calculate_win_rate(wins, total_trades), 2),
            total_profit: ledger.total_profit().round_dp(2),
            final_capital: ledger.capital().round_dp(2),
            return_percent: round_to(
                self.calculate_return_percent(ledger.initial_capital(), ledger.capital()),
                2,
            ),
            avg_win: self.calculate_average(gross_win, wins).round_dp(2),
            avg_loss: self.calculate_average(gross_loss, losses).round_dp(2),
            profit_factor: round_to(self.calculate_profit_factor(gross_win, gross_loss, losses), 2),
            max_drawdown: round_to(ledger.max_drawdown(), 2),
            sharpe_ratio: round_to(self.calculate_sharpe_ratio(&returns), 2),
            max_consecutive_wins: ledger.max_consecutive_wins(),
            max_consecutive_losses: ledger.max_consecutive_losses(),
            expectancy: self.calculate_average(ledger.total_profit(), total_trades).round_dp(2),
        }
    }

    fn calculate_win_rate(&self, wins: usize, total_trades: usize) -> f64 {
        if total_trades == 0 {
            return 0.0;
        }
        wins as f64 / total_trades as f64 * 100.0
    }

    fn calculate_average(&self, total: Decimal, count: usize) -> Decimal {
        if count == 0 {
            return Decimal::ZERO;
        }
        total / Decimal::from(count)
    }

    /// |avg_win * wins / (avg_loss * losses)|, i.e. gross winnings over gross
    /// losses.
    fn calculate_profit_factor(&self, gross_win: Decimal, gross_loss: Decimal, losses: usize) -> f64 {
        if losses == 0 || gross_loss.is_zero() {
            return 0.0;
        }
        decimal_to_f64((gross_win / gross_loss).abs())
    }

    /// Annualized mean over population standard deviation of per-trade
    /// percent returns.
    fn calculate_sharpe_ratio(&self, returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }

        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
        let std_dev = variance.sqrt();

        if std_dev == 0.0 {
            return 0.0;
        }

        mean / std_dev * self.periods_per_year.sqrt()
    }

    fn calculate_return_percent(&self, initial_capital: Decimal, final_capital: Decimal) -> f64 {
        if initial_capital.is_zero() {
            return 0.0;
        }
        decimal_to_f64((final_capital - initial_capital) / initial_capital * Decimal::ONE_HUNDRED)
    }

    fn calculate_filter_rate(&self, trades_filtered: u64, trades_attempted: u64) -> f64 {
        if trades_attempted == 0 {
            return 0.0;
        }
        trades_filtered as f64 / trades_attempted as f64 * 100.0
    }
}
