use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("gateway configuration error: {message}")]
    Configuration { message: String },

    #[error("gateway request failed: {message}")]
    Network { message: String },

    #[error("gateway rejected the request: {message}")]
    Rejected { message: String },

    #[error("unparsable gateway response: {message}")]
    InvalidResponse { message: String },
}

impl GatewayError {
    /// Timeouts and transport failures may succeed on retry; a rejected or
    /// malformed payment request will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_flags_are_set() {
        assert!(GatewayError::Network {
            message: "timeout".to_string()
        }
        .is_retryable());
        assert!(!GatewayError::Rejected {
            message: "invalid amount".to_string()
        }
        .is_retryable());
        assert!(!GatewayError::InvalidResponse {
            message: "<html>".to_string()
        }
        .is_retryable());
    }
}
