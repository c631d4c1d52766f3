pub mod backtest;
pub mod errors;

// Re-export main interfaces
pub use backtest::BacktestService;
pub use errors::ServiceError;
