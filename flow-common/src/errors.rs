use thiserror::Error;

/// Every constraint a parameter set violated, reported together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid parameters: {}", .violations.join("; "))]
pub struct ValidationError {
    violations: Vec<String>,
}

impl ValidationError {
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.violations.iter().any(|v| v.contains(needle))
    }
}
