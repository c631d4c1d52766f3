// flow-core/src/backtest/candidate.rs

use flow_common::ScenarioBias;
use rand::Rng;

/// Trailing average volume the spike ratio is measured against.
pub const AVERAGE_VOLUME: f64 = 100_000.0;

/// Half-width of the noise applied to each timeframe's ratio, paired with the
/// maximum deviation that still counts as aligned. Ordered 5m, 10m, 30m.
const TIMEFRAME_BANDS: [(f64, f64); 3] = [(0.05, 0.1), (0.075, 0.15), (0.1, 0.2)];

/// Snapshot of simulated market conditions for one trade attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeCandidate {
    pub put_call_ratio: f64,
    /// 0..1 share of volume concentrated in the traded side.
    pub volume_concentration: f64,
    /// Current volume over the trailing average.
    pub volume_spike: f64,
    pub iv_percentile: f64,
    pub timeframe_aligned: bool,
}

impl TradeCandidate {
    /// Draw a fresh candidate. A scenario bias pulls the ratio toward the
    /// regime's average, scales volume by its volatility and recentres IV.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, bias: Option<&ScenarioBias>) -> Self {
        let raw_ratio = 0.8 + rng.gen::<f64>() * 1.5;
        let volume_concentration = rng.gen::<f64>();
        let raw_volume = 50_000.0 + rng.gen::<f64>() * 150_000.0;
        let iv_roll = rng.gen::<f64>();

        let (put_call_ratio, current_volume, iv_percentile) = match bias {
            Some(bias) => {
                let skewed = raw_ratio * (1.0 + bias.trend * 0.05);
                let ratio = (skewed * 0.7 + bias.pc_ratio_avg * 0.3).clamp(0.5, 2.5);
                let iv_base = if bias.volatility > 1.5 { 45.0 } else { 35.0 };
                let iv = (iv_base + (iv_roll * 30.0 - 15.0)).clamp(10.0, 90.0);
                (ratio, raw_volume * bias.volatility, iv)
            }
            None => (raw_ratio, raw_volume, iv_roll * 100.0),
        };

        let timeframe_aligned = TIMEFRAME_BANDS.iter().all(|&(noise, tolerance)| {
            let timeframe_ratio = put_call_ratio + (rng.gen::<f64>() - 0.5) * noise * 2.0;
            (timeframe_ratio - put_call_ratio).abs() < tolerance
        });

        Self {
            put_call_ratio,
            volume_concentration,
            volume_spike: current_volume / AVERAGE_VOLUME,
            iv_percentile,
            timeframe_aligned,
        }
    }
}
