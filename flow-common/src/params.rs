// flow-common/src/params.rs

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the flow a backtest trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Puts,
    Calls,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Puts => "puts",
            Direction::Calls => "calls",
        }
    }

    /// Entry gate on the put/call ratio. Calls mirror the threshold around 1.0.
    pub fn should_enter(&self, put_call_ratio: f64, threshold: f64) -> bool {
        match self {
            Direction::Puts => put_call_ratio > threshold,
            Direction::Calls => put_call_ratio < 2.0 - threshold,
        }
    }

    /// Win probability before filter bonuses. Extreme readings replace the base
    /// rate rather than adding to it.
    pub fn base_win_probability(&self, put_call_ratio: f64) -> f64 {
        match self {
            Direction::Puts if put_call_ratio > 1.5 => 0.52,
            Direction::Puts if put_call_ratio > 1.3 => 0.48,
            Direction::Puts => 0.45,
            Direction::Calls if put_call_ratio < 0.9 => 0.50,
            Direction::Calls => 0.43,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "puts" | "put" => Ok(Direction::Puts),
            "calls" | "call" => Ok(Direction::Calls),
            other => Err(format!("Unknown direction '{}', expected 'puts' or 'calls'", other)),
        }
    }
}

/// Configuration for one backtest run.
///
/// Built from [`BacktestParameters::default`] plus caller overrides and
/// checked by the core validator before any simulation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestParameters {
    pub put_call_threshold: f64,
    /// Signed so that out-of-range requests reach validation intact.
    pub num_trades: i64,
    pub initial_capital: Decimal,
    pub position_size: Decimal,
    /// Winning exit as a fraction, e.g. 0.20 = +20%.
    pub profit_target: f64,
    /// Losing exit as a negative fraction, e.g. -0.50 = -50%.
    pub stop_loss: f64,
    pub volume_spike_threshold: f64,
    pub iv_threshold: f64,
    pub use_volume_spike: bool,
    pub use_iv_filter: bool,
    pub use_multi_timeframe: bool,
}

impl Default for BacktestParameters {
    fn default() -> Self {
        Self {
            put_call_threshold: 1.1,
            num_trades: 1000,
            initial_capital: Decimal::from(10_000),
            position_size: Decimal::from(100),
            profit_target: 0.20,
            stop_loss: -0.50,
            volume_spike_threshold: 1.5,
            iv_threshold: 30.0,
            use_volume_spike: true,
            use_iv_filter: true,
            use_multi_timeframe: true,
        }
    }
}

impl BacktestParameters {
    /// Merge caller-supplied values over these parameters. Caller values win.
    pub fn apply_overrides(mut self, overrides: &ParameterOverrides) -> Self {
        if let Some(v) = overrides.put_call_threshold {
            self.put_call_threshold = v;
        }
        if let Some(v) = overrides.num_trades {
            self.num_trades = v;
        }
        if let Some(v) = overrides.initial_capital {
            self.initial_capital = v;
        }
        if let Some(v) = overrides.position_size {
            self.position_size = v;
        }
        if let Some(v) = overrides.profit_target {
            self.profit_target = v;
        }
        if let Some(v) = overrides.stop_loss {
            self.stop_loss = v;
        }
        if let Some(v) = overrides.volume_spike_threshold {
            self.volume_spike_threshold = v;
        }
        if let Some(v) = overrides.iv_threshold {
            self.iv_threshold = v;
        }
        if let Some(v) = overrides.use_volume_spike {
            self.use_volume_spike = v;
        }
        if let Some(v) = overrides.use_iv_filter {
            self.use_iv_filter = v;
        }
        if let Some(v) = overrides.use_multi_timeframe {
            self.use_multi_timeframe = v;
        }
        self
    }

    pub fn with_num_trades(mut self, num_trades: i64) -> Self {
        self.num_trades = num_trades;
        self
    }

    pub fn with_put_call_threshold(mut self, threshold: f64) -> Self {
        self.put_call_threshold = threshold;
        self
    }

    pub fn with_capital(mut self, initial_capital: Decimal, position_size: Decimal) -> Self {
        self.initial_capital = initial_capital;
        self.position_size = position_size;
        self
    }

    /// Enable or disable all three optional entry filters at once.
    pub fn with_filters(mut self, enabled: bool) -> Self {
        self.use_volume_spike = enabled;
        self.use_iv_filter = enabled;
        self.use_multi_timeframe = enabled;
        self
    }

    /// Trade quota as a count. Validation guarantees it is positive.
    pub fn trade_quota(&self) -> usize {
        usize::try_from(self.num_trades).unwrap_or(0)
    }
}

/// Partial parameter set as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_call_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_trades: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_capital: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_spike_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_volume_spike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_iv_filter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_multi_timeframe: Option<bool>,
}
