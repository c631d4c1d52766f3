pub mod backtest;
pub mod config;
pub mod scenario;
pub mod service;
