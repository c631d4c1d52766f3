// scenario/mod.rs
pub mod errors;
pub mod historical;
pub mod traits;

// Re-export main interfaces for easy access
pub use errors::ScenarioError;
pub use flow_common::scenario::{DailyScenario, IntradayPattern, MarketRegime, SpikeFrequency};
pub use historical::HistoricalScenarios;
pub use traits::ScenarioSource;
