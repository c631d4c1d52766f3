pub mod candidate;
pub mod comparison;
pub mod engine;
pub mod filters;
pub mod ledger;
pub mod metrics;
pub mod validation;

pub use comparison::compare_strategies;
pub use engine::{BacktestEngine, ATTEMPT_MULTIPLIER, RECENT_TRADES};
pub use metrics::MetricsCalculator;
pub use validation::{validate, MAX_INITIAL_CAPITAL};
