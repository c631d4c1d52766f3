// flow-core/src/backtest/validation.rs

use flow_common::{BacktestParameters, ValidationError};
use rust_decimal::Decimal;

pub const MAX_TRADES: i64 = 100_000;

/// Upper bound on starting capital. Keeps a full-length run with the largest
/// allowed profit target well inside `Decimal` range.
pub const MAX_INITIAL_CAPITAL: i64 = 1_000_000_000_000_000;

/// Check every parameter constraint and collect all violations.
pub fn validate(params: &BacktestParameters) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if params.num_trades <= 0 {
        violations.push("Number of trades must be greater than 0".to_string());
    }
    if params.num_trades > MAX_TRADES {
        violations.push("Number of trades cannot exceed 100,000".to_string());
    }
    if params.initial_capital <= Decimal::ZERO {
        violations.push("Initial capital must be greater than 0".to_string());
    }
    if params.initial_capital > Decimal::from(MAX_INITIAL_CAPITAL) {
        violations.push("Initial capital cannot exceed 1,000,000,000,000,000".to_string());
    }
    if params.position_size <= Decimal::ZERO {
        violations.push("Position size must be greater than 0".to_string());
    }
    if params.position_size > params.initial_capital {
        violations.push("Position size cannot exceed initial capital".to_string());
    }
    // Negated comparisons so NaN fails every range check.
    if !(params.profit_target > 0.0 && params.profit_target <= 10.0) {
        violations.push("Profit target must be between 0% and 1000%".to_string());
    }
    if !(params.stop_loss >= -1.0 && params.stop_loss < 0.0) {
        violations.push("Stop loss must be between -100% and 0%".to_string());
    }
    if !(params.put_call_threshold > 0.0) {
        violations.push("Put/Call threshold must be greater than 0".to_string());
    }
    if !(params.volume_spike_threshold > 0.0) {
        violations.push("Volume spike threshold must be greater than 0".to_string());
    }
    if !(params.iv_threshold >= 0.0 && params.iv_threshold <= 100.0) {
        violations.push("IV threshold must be between 0 and 100".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&BacktestParameters::default()).is_ok());
    }

    #[test]
    fn test_trade_count_bounds() {
        let at_limit = BacktestParameters::default().with_num_trades(100_000);
        assert!(validate(&at_limit).is_ok());

        let over = BacktestParameters::default().with_num_trades(100_001);
        let err = validate(&over).unwrap_err();
        assert!(err.mentions("cannot exceed 100,000"));

        let zero = BacktestParameters::default().with_num_trades(0);
        assert!(validate(&zero).unwrap_err().mentions("Number of trades must be greater than 0"));

        assert!(validate(&BacktestParameters::default().with_num_trades(1)).is_ok());
    }

    #[test]
    fn test_position_larger_than_capital() {
        let params = BacktestParameters::default().with_capital(dec!(1000), dec!(1500));
        let err = validate(&params).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.mentions("Position size"));
    }

    #[test]
    fn test_position_equal_to_capital_is_allowed() {
        let params = BacktestParameters::default().with_capital(dec!(1000), dec!(1000));
        assert!(validate(&params).is_ok());
    }

    #[test]
    fn test_capital_upper_bound() {
        let at_limit = BacktestParameters::default()
            .with_capital(dec!(1000000000000000), dec!(1000000000000000));
        assert!(validate(&at_limit).is_ok());

        let over = BacktestParameters::default()
            .with_capital(dec!(1000000000000000.01), dec!(100));
        assert!(validate(&over).unwrap_err().mentions("Initial capital cannot exceed"));

        let huge = dec!(10000000000000000000000000000);
        let huge = BacktestParameters::default().with_capital(huge, huge);
        let err = validate(&huge).unwrap_err();
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn test_range_edges() {
        let mut params = BacktestParameters::default();
        params.profit_target = 10.0;
        params.stop_loss = -1.0;
        params.iv_threshold = 0.0;
        assert!(validate(&params).is_ok());

        params.iv_threshold = 100.0;
        assert!(validate(&params).is_ok());

        params.stop_loss = 0.0;
        assert!(validate(&params).unwrap_err().mentions("Stop loss"));
    }

    #[test]
    fn test_collects_every_violation() {
        let params = BacktestParameters {
            put_call_threshold: 0.0,
            num_trades: 0,
            initial_capital: dec!(-1),
            position_size: dec!(0),
            profit_target: 11.0,
            stop_loss: 0.1,
            volume_spike_threshold: -2.0,
            iv_threshold: 101.0,
            ..BacktestParameters::default()
        };

        let err = validate(&params).unwrap_err();

        // position 0 > capital -1 also trips the capital comparison
        assert_eq!(err.violations().len(), 9);
        assert!(err.to_string().starts_with("Invalid parameters: "));
        assert_eq!(err.to_string().matches("; ").count(), 8);
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut params = BacktestParameters::default();
        params.put_call_threshold = f64::NAN;
        assert!(validate(&params).unwrap_err().mentions("Put/Call threshold"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let params = BacktestParameters::default()
            .with_num_trades(100_001)
            .with_capital(dec!(50), dec!(75));

        let first = validate(&params).unwrap_err();
        let second = validate(&params).unwrap_err();

        assert_eq!(first.to_string(), second.to_string());
    }
}
