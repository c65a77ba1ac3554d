//! Controller-specific error types.
//!
//! This module defines error types specific to the ALB controller
//! that are not covered by upstream library errors.

use elbv2_client::Elbv2Error;
use thiserror::Error;

/// Errors that can occur in the ALB controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// ELBv2 API error
    #[error("ELBv2 error: {0}")]
    Elbv2(#[from] Elbv2Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Desired attributes file could not be parsed
    #[error("Invalid desired attributes: {0}")]
    DesiredState(#[from] serde_yaml::Error),

    /// Desired attributes file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ControllerError {
    /// Whether the next pass may succeed without operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            ControllerError::Elbv2(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_is_transient() {
        let err = ControllerError::from(Elbv2Error::Throttled("Rate exceeded".to_string()));
        assert!(err.is_transient());
    }

    #[test]
    fn test_permanent_errors_are_not_transient() {
        assert!(!ControllerError::from(Elbv2Error::Authentication("SignatureDoesNotMatch".to_string())).is_transient());
        assert!(!ControllerError::InvalidConfig("CLUSTER_NAME is empty".to_string()).is_transient());
    }
}
