//! User Interaction Abstraction
//!
//! The credential handshake needs a human to open a URL and type back a
//! verifier code. Hosts decide how that conversation happens.

use async_trait::async_trait;

use crate::error::Result;

/// Asks the user to authorize the application out-of-band
#[async_trait]
pub trait VerifierPrompt: Send + Sync {
    /// Show `authorize_url` and return the verifier code the user entered
    ///
    /// Implementations return the code trimmed of surrounding whitespace.
    async fn request_verifier(&self, authorize_url: &str) -> Result<String>;
}
