use thiserror::Error;

/// Error types for scenario lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
