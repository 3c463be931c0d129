//! # Authentication Manager
//!
//! Turns the credential file into a ready-to-use request signer, running the
//! interactive handshake when no access token has been stored yet.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::AuthManager;
//! use std::sync::Arc;
//! # use bridge_traits::{FileSystemAccess, HttpClient, VerifierPrompt};
//! # async fn example(
//! #     http_client: Arc<dyn HttpClient>,
//! #     fs: Arc<dyn FileSystemAccess>,
//! #     prompt: &dyn VerifierPrompt,
//! # ) -> core_auth::Result<()> {
//! let manager = AuthManager::new(http_client, fs, "config.json");
//! let signer = manager.authenticate(prompt).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::oauth::{OAuth1Endpoints, OAuth1FlowManager};
use crate::signer::OAuth1Signer;
use crate::token_store::CredentialStore;
use crate::types::{AccessToken, ConsumerCredentials};
use bridge_traits::{FileSystemAccess, HttpClient, VerifierPrompt};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct AuthManager {
    store: CredentialStore,
    http_client: Arc<dyn HttpClient>,
    endpoints: OAuth1Endpoints,
}

impl AuthManager {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        file_system: Arc<dyn FileSystemAccess>,
        credentials_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store: CredentialStore::new(file_system, credentials_path),
            http_client,
            endpoints: OAuth1Endpoints::default(),
        }
    }

    /// Overrides the handshake endpoints (e.g. for a non-default API origin).
    pub fn with_endpoints(mut self, endpoints: OAuth1Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.store
    }

    /// Returns a signer for API traffic.
    ///
    /// Uses the stored access token when there is one; otherwise runs the
    /// handshake through `prompt` and persists the new token first.
    #[instrument(skip(self, prompt))]
    pub async fn authenticate(&self, prompt: &dyn VerifierPrompt) -> Result<OAuth1Signer> {
        let credentials = self.store.load().await?;

        let access = match credentials.access {
            Some(access) => {
                info!("Using stored access token");
                access
            }
            None => self.handshake(&credentials.consumer, prompt).await?,
        };

        Ok(OAuth1Signer::with_access_token(credentials.consumer, &access))
    }

    /// Runs the handshake even if a token is already stored, replacing it.
    #[instrument(skip(self, prompt))]
    pub async fn reauthorize(&self, prompt: &dyn VerifierPrompt) -> Result<OAuth1Signer> {
        let credentials = self.store.load().await?;
        let access = self.handshake(&credentials.consumer, prompt).await?;
        Ok(OAuth1Signer::with_access_token(credentials.consumer, &access))
    }

    async fn handshake(
        &self,
        consumer: &ConsumerCredentials,
        prompt: &dyn VerifierPrompt,
    ) -> Result<AccessToken> {
        info!("No access token stored, starting authorization");

        let flow = OAuth1FlowManager::with_endpoints(
            consumer.clone(),
            self.endpoints.clone(),
            Arc::clone(&self.http_client),
        );

        let request_token = flow.request_token().await?;
        let authorize_url = flow.authorize_url(&request_token)?;

        let verifier = prompt
            .request_verifier(&authorize_url)
            .await
            .map_err(|e| AuthError::AuthorizationAborted(e.to_string()))?;

        let access = flow.exchange_verifier(&request_token, &verifier).await?;
        self.store.save_access_token(&access).await?;

        Ok(access)
    }
}
