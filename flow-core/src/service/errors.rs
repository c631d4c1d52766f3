use flow_common::ValidationError;
use thiserror::Error;

use crate::scenario::ScenarioError;

/// Service layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Task error: {0}")]
    Task(String),
}

impl ServiceError {
    /// Whether the caller's input caused the failure
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Validation(_) => true,
            ServiceError::Scenario(_) => true,
            ServiceError::Task(_) => false,
        }
    }
}
