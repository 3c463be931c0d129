use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(
        "Credential file {path} unavailable: {reason}. Expected a JSON object like \
         {{\"key\": \"<api key>\", \"secret\": \"<api secret>\"}}"
    )]
    CredentialsUnavailable { path: String, reason: String },

    #[error("Credential file {path} could not be written: {reason}")]
    CredentialsNotSaved { path: String, reason: String },

    #[error("Token endpoint {url} returned {status}: {body}")]
    TokenEndpoint {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed token response from {url}: {reason}")]
    MalformedTokenResponse { url: String, reason: String },

    #[error("Cannot sign request for {url}: {reason}")]
    Signing { url: String, reason: String },

    #[error("Authorization was not completed: {0}")]
    AuthorizationAborted(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Not authenticated")]
    NotAuthenticated,
}

impl From<BridgeError> for AuthError {
    fn from(err: BridgeError) -> Self {
        AuthError::NetworkError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
