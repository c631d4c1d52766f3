// flow-core/src/backtest/filters.rs

use flow_common::{BacktestParameters, Direction, RejectionCounts};

use super::candidate::TradeCandidate;

pub const VOLUME_SPIKE_BONUS: f64 = 0.05;
pub const IV_BONUS: f64 = 0.04;
pub const TIMEFRAME_BONUS: f64 = 0.06;
pub const CONCENTRATION_BONUS: f64 = 0.03;

/// IV percentile at or above which the IV filter rejects.
pub const IV_CEILING: f64 = 70.0;
pub const CONCENTRATION_LEVEL: f64 = 0.7;

/// The gate that abandoned an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Entry,
    VolumeSpike,
    ImpliedVolatility,
    Timeframe,
}

impl Rejection {
    pub fn record(self, counts: &mut RejectionCounts) {
        match self {
            Rejection::Entry => counts.entry += 1,
            Rejection::VolumeSpike => counts.volume_spike += 1,
            Rejection::ImpliedVolatility => counts.iv += 1,
            Rejection::Timeframe => counts.timeframe += 1,
        }
    }
}

/// An accepted candidate and the probability its trade wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntrySignal {
    pub edge_bonus: f64,
    pub win_probability: f64,
}

/// Run the entry gate and the enabled filters in order. The first failing
/// gate rejects the attempt; each passed filter adds its edge bonus.
///
/// The win probability is left unclamped. Its ceiling is 0.52 + 0.18.
pub fn evaluate(
    candidate: &TradeCandidate,
    params: &BacktestParameters,
    direction: Direction,
) -> Result<EntrySignal, Rejection> {
    if !direction.should_enter(candidate.put_call_ratio, params.put_call_threshold) {
        return Err(Rejection::Entry);
    }

    let mut edge_bonus = 0.0;

    if params.use_volume_spike {
        if candidate.volume_spike > params.volume_spike_threshold {
            edge_bonus += VOLUME_SPIKE_BONUS;
        } else {
            return Err(Rejection::VolumeSpike);
        }
    }

    if params.use_iv_filter {
        if params.iv_threshold < candidate.iv_percentile && candidate.iv_percentile < IV_CEILING {
            edge_bonus += IV_BONUS;
        } else {
            return Err(Rejection::ImpliedVolatility);
        }
    }

    if params.use_multi_timeframe {
        if candidate.timeframe_aligned {
            edge_bonus += TIMEFRAME_BONUS;
        } else {
            return Err(Rejection::Timeframe);
        }
    }

    if candidate.volume_concentration > CONCENTRATION_LEVEL {
        edge_bonus += CONCENTRATION_BONUS;
    }

    Ok(EntrySignal {
        edge_bonus,
        win_probability: direction.base_win_probability(candidate.put_call_ratio) + edge_bonus,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> TradeCandidate {
        TradeCandidate {
            put_call_ratio: 1.2,
            volume_concentration: 0.5,
            volume_spike: 1.8,
            iv_percentile: 50.0,
            timeframe_aligned: true,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_all_filters_pass() {
        let signal = evaluate(&candidate(), &BacktestParameters::default(), Direction::Puts).unwrap();
        assert_close(signal.edge_bonus, 0.15);
        assert_close(signal.win_probability, 0.60);
    }

    #[test]
    fn test_entry_gate_runs_first() {
        let mut c = candidate();
        c.put_call_ratio = 1.0;
        c.volume_spike = 0.1;
        let result = evaluate(&c, &BacktestParameters::default(), Direction::Puts);
        assert_eq!(result, Err(Rejection::Entry));
    }

    #[test]
    fn test_filters_reject_in_order() {
        let params = BacktestParameters::default();

        let mut c = candidate();
        c.volume_spike = 1.5;
        c.iv_percentile = 90.0;
        assert_eq!(evaluate(&c, &params, Direction::Puts), Err(Rejection::VolumeSpike));

        let mut c = candidate();
        c.iv_percentile = 70.0;
        assert_eq!(evaluate(&c, &params, Direction::Puts), Err(Rejection::ImpliedVolatility));

        let mut c = candidate();
        c.iv_percentile = 30.0;
        assert_eq!(evaluate(&c, &params, Direction::Puts), Err(Rejection::ImpliedVolatility));

        let mut c = candidate();
        c.timeframe_aligned = false;
        assert_eq!(evaluate(&c, &params, Direction::Puts), Err(Rejection::Timeframe));
    }

    #[test]
    fn test_disabled_filters_neither_gate_nor_add_edge() {
        let params = BacktestParameters::default().with_filters(false);
        let c = TradeCandidate {
            volume_spike: 0.6,
            iv_percentile: 95.0,
            timeframe_aligned: false,
            ..candidate()
        };

        let signal = evaluate(&c, &params, Direction::Puts).unwrap();
        assert_close(signal.edge_bonus, 0.0);
        assert_close(signal.win_probability, 0.45);
    }

    #[test]
    fn test_concentration_bonus_applies_without_filters() {
        let params = BacktestParameters::default().with_filters(false);
        let c = TradeCandidate { volume_concentration: 0.9, ..candidate() };

        let signal = evaluate(&c, &params, Direction::Puts).unwrap();
        assert_close(signal.edge_bonus, CONCENTRATION_BONUS);
    }

    #[test]
    fn test_extreme_reading_replaces_base_rate() {
        let params = BacktestParameters::default().with_filters(false);

        let c = TradeCandidate { put_call_ratio: 1.6, ..candidate() };
        assert_close(evaluate(&c, &params, Direction::Puts).unwrap().win_probability, 0.52);

        let c = TradeCandidate { put_call_ratio: 0.85, ..candidate() };
        assert_close(evaluate(&c, &params, Direction::Calls).unwrap().win_probability, 0.50);
    }

    #[test]
    fn test_maximum_win_probability() {
        let c = TradeCandidate {
            put_call_ratio: 2.0,
            volume_concentration: 0.95,
            ..candidate()
        };
        let signal = evaluate(&c, &BacktestParameters::default(), Direction::Puts).unwrap();
        assert_close(signal.win_probability, 0.70);
    }

    #[test]
    fn test_rejection_record() {
        let mut counts = RejectionCounts::default();
        Rejection::Entry.record(&mut counts);
        Rejection::Entry.record(&mut counts);
        Rejection::Timeframe.record(&mut counts);
        assert_eq!(counts.entry, 2);
        assert_eq!(counts.timeframe, 1);
        assert_eq!(counts.total(), 3);
    }
}
