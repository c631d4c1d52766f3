// flow-core/src/backtest/comparison.rs

use flow_common::utils::round_to;
use flow_common::{
    BacktestResult, ComparisonResult, ComparisonSummary, Direction, FilterEfficiency,
    StrategyLabel,
};
use rand::Rng;
use tracing::info;

use super::engine::BacktestEngine;

/// Run filtered puts, unfiltered puts and filtered calls from one parameter
/// set and compare them.
pub fn compare_strategies<R: Rng + ?Sized>(engine: &BacktestEngine, rng: &mut R) -> ComparisonResult {
    let advanced_puts = engine.run(Direction::Puts, rng);
    let basic_puts = engine.without_filters().run(Direction::Puts, rng);
    let advanced_calls = engine.run(Direction::Calls, rng);

    let comparison = summarize(&advanced_puts, &basic_puts, &advanced_calls);
    info!(
        "Strategy comparison complete: best {} (profit factor {})",
        comparison.best_strategy.as_str(),
        comparison.best_profit_factor
    );

    ComparisonResult {
        advanced_puts,
        basic_puts,
        advanced_calls,
        comparison,
    }
}

pub fn summarize(
    advanced_puts: &BacktestResult,
    basic_puts: &BacktestResult,
    advanced_calls: &BacktestResult,
) -> ComparisonSummary {
    let (best_strategy, best_profit_factor) = best_by_profit_factor([
        (StrategyLabel::AdvancedPuts, advanced_puts.metrics.profit_factor),
        (StrategyLabel::BasicPuts, basic_puts.metrics.profit_factor),
        (StrategyLabel::AdvancedCalls, advanced_calls.metrics.profit_factor),
    ]);

    ComparisonSummary {
        win_rate_improvement: round_to(advanced_puts.metrics.win_rate - basic_puts.metrics.win_rate, 2),
        profit_factor_improvement: round_to(
            advanced_puts.metrics.profit_factor - basic_puts.metrics.profit_factor,
            2,
        ),
        puts_vs_calls_win_rate: round_to(
            advanced_puts.metrics.win_rate - advanced_calls.metrics.win_rate,
            2,
        ),
        best_strategy,
        best_profit_factor,
        filter_efficiency: FilterEfficiency {
            advanced_puts_filter_rate: advanced_puts.metrics.filter_rate,
            trades_quality_improvement: (advanced_puts.metrics.expectancy
                - basic_puts.metrics.expectancy)
                .round_dp(2),
        },
    }
}

/// Highest profit factor; ties go to the earliest entry.
fn best_by_profit_factor(candidates: [(StrategyLabel, f64); 3]) -> (StrategyLabel, f64) {
    let [first, rest @ ..] = candidates;
    rest.into_iter()
        .fold(first, |best, next| if next.1 > best.1 { next } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_common::BacktestParameters;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rust_decimal_macros::dec;

    fn sample_result(profit_factor: f64, win_rate: f64) -> BacktestResult {
        let params = BacktestParameters::default().with_num_trades(10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut result = BacktestEngine::new(params).unwrap().run(Direction::Puts, &mut rng);
        result.metrics.profit_factor = profit_factor;
        result.metrics.win_rate = win_rate;
        result
    }

    #[test]
    fn test_best_strategy_tie_goes_to_first() {
        assert_eq!(
            best_by_profit_factor([
                (StrategyLabel::AdvancedPuts, 1.2),
                (StrategyLabel::BasicPuts, 1.2),
                (StrategyLabel::AdvancedCalls, 1.2),
            ]),
            (StrategyLabel::AdvancedPuts, 1.2)
        );
        assert_eq!(
            best_by_profit_factor([
                (StrategyLabel::AdvancedPuts, 0.9),
                (StrategyLabel::BasicPuts, 1.4),
                (StrategyLabel::AdvancedCalls, 1.4),
            ]),
            (StrategyLabel::BasicPuts, 1.4)
        );
    }

    #[test]
    fn test_summary_deltas() {
        let mut advanced = sample_result(1.5, 60.0);
        let mut basic = sample_result(1.1, 48.5);
        let calls = sample_result(1.7, 52.25);
        advanced.metrics.expectancy = dec!(4.10);
        basic.metrics.expectancy = dec!(-1.25);
        advanced.metrics.filter_rate = 88.4;

        let summary = summarize(&advanced, &basic, &calls);

        assert_eq!(summary.win_rate_improvement, 11.5);
        assert_eq!(summary.profit_factor_improvement, 0.4);
        assert_eq!(summary.puts_vs_calls_win_rate, 7.75);
        assert_eq!(summary.best_strategy, StrategyLabel::AdvancedCalls);
        assert_eq!(summary.best_profit_factor, 1.7);
        assert_eq!(summary.filter_efficiency.advanced_puts_filter_rate, 88.4);
        assert_eq!(summary.filter_efficiency.trades_quality_improvement, dec!(5.35));
    }

    #[test]
    fn test_compare_runs_three_variants() {
        let params = BacktestParameters::default().with_num_trades(200);
        let engine = BacktestEngine::new(params).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let result = compare_strategies(&engine, &mut rng);

        assert_eq!(result.advanced_puts.direction, Direction::Puts);
        assert_eq!(result.basic_puts.direction, Direction::Puts);
        assert_eq!(result.advanced_calls.direction, Direction::Calls);
        assert!(result.advanced_puts.params.use_iv_filter);
        assert!(!result.basic_puts.params.use_volume_spike);
        assert!(!result.basic_puts.params.use_iv_filter);
        assert!(!result.basic_puts.params.use_multi_timeframe);
        assert!(result.advanced_calls.params.use_multi_timeframe);

        for r in [&result.advanced_puts, &result.basic_puts, &result.advanced_calls] {
            assert!(r.metrics.total_trades <= 200);
        }
        // unfiltered puts pass roughly four candidates in five
        assert_eq!(result.basic_puts.metrics.total_trades, 200);
        assert!(result.advanced_puts.metrics.filter_rate > result.basic_puts.metrics.filter_rate);
    }
}
