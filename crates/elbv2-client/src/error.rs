//! ELBv2 client errors

use thiserror::Error;

/// Errors that can occur when interacting with the ELBv2 Query API
#[derive(Debug, Error)]
pub enum Elbv2Error {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// ELBv2 API returned an error
    #[error("ELBv2 API error: {0}")]
    Api(String),

    /// XML response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] quick_xml::DeError),

    /// Request was rejected by the signing proxy or by AWS (bad or expired credentials)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Load balancer not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request was throttled by the API
    #[error("Throttled: {0}")]
    Throttled(String),

    /// Invalid request (e.g., missing ARN)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Elbv2Error {
    /// Whether retrying the same call on a later tick may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Elbv2Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Elbv2Error::Throttled(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttled_is_transient() {
        assert!(Elbv2Error::Throttled("Rate exceeded".to_string()).is_transient());
    }

    #[test]
    fn test_not_found_is_not_transient() {
        assert!(!Elbv2Error::NotFound("arn".to_string()).is_transient());
        assert!(!Elbv2Error::Authentication("403".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = Elbv2Error::Api("boom".to_string());
        assert_eq!(err.to_string(), "ELBv2 API error: boom");
    }
}
