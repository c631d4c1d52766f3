// =================================================================
// scenario.rs - Market regimes and daily scenarios
// =================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ScenarioBias;

/// Broad market regime a trading day is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    BullRun,
    BearMarket,
    HighVol,
    LowVol,
    Choppy,
}

impl MarketRegime {
    pub const ALL: [MarketRegime; 5] = [
        MarketRegime::BullRun,
        MarketRegime::BearMarket,
        MarketRegime::HighVol,
        MarketRegime::LowVol,
        MarketRegime::Choppy,
    ];

    pub fn bias(&self) -> ScenarioBias {
        let (trend, volatility, pc_ratio_avg) = match self {
            MarketRegime::BullRun => (0.6, 0.8, 0.85),
            MarketRegime::BearMarket => (-0.6, 1.4, 1.45),
            MarketRegime::HighVol => (0.0, 2.0, 1.25),
            MarketRegime::LowVol => (0.1, 0.5, 0.95),
            MarketRegime::Choppy => (0.0, 1.2, 1.10),
        };
        ScenarioBias { trend, volatility, pc_ratio_avg }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MarketRegime::BullRun => "Bull Run",
            MarketRegime::BearMarket => "Bear Market",
            MarketRegime::HighVol => "High Vol",
            MarketRegime::LowVol => "Low Vol",
            MarketRegime::Choppy => "Choppy",
        }
    }
}

/// Shape of volume through the trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntradayPattern {
    Rally,
    Selloff,
    Choppy,
    Drift,
    Reversal,
    Whipsaw,
    Volatile,
    Flat,
    GrindHigher,
}

impl IntradayPattern {
    /// Patterns assigned to days without a known event.
    pub const GENERATED: [IntradayPattern; 5] = [
        IntradayPattern::Rally,
        IntradayPattern::Selloff,
        IntradayPattern::Choppy,
        IntradayPattern::Drift,
        IntradayPattern::Reversal,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeFrequency {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Everything known about one trading day's conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScenario {
    pub date: NaiveDate,
    pub regime: MarketRegime,
    pub event: String,
    pub description: String,
    pub intraday_pattern: IntradayPattern,
    pub vol_spike_frequency: SpikeFrequency,
}

impl DailyScenario {
    pub fn bias(&self) -> ScenarioBias {
        self.regime.bias()
    }
}
