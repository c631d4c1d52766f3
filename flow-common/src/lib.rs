pub mod errors;
pub mod params;
pub mod scenario;
pub mod types;
pub mod utils;

// Re-export main interfaces
pub use errors::ValidationError;
pub use params::{BacktestParameters, Direction, ParameterOverrides};
pub use scenario::DailyScenario;
pub use types::*;
