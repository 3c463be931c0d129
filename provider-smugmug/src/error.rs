//! Error types for the SmugMug provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// SmugMug provider errors
#[derive(Error, Debug)]
pub enum SmugMugError {
    /// API request returned a non-success status
    #[error("SmugMug API error (status {status}) for {url}")]
    ApiError { status: u16, url: String },

    /// Failed to parse API response
    #[error("Failed to parse response from {url}: {reason}")]
    ParseError { url: String, reason: String },

    /// Request could not be signed
    #[error(transparent)]
    Auth(#[from] core_auth::AuthError),

    /// Raw response could not be captured
    #[error("Failed to capture response {label}: {reason}")]
    CaptureFailed { label: String, reason: String },

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for SmugMug operations
pub type Result<T> = std::result::Result<T, SmugMugError>;

impl From<SmugMugError> for BridgeError {
    fn from(error: SmugMugError) -> Self {
        match error {
            SmugMugError::ApiError { status, url } => BridgeError::HttpStatus { status, url },
            SmugMugError::BridgeError(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
