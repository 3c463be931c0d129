//! Credential File Storage
//!
//! The consumer key/secret and the access token live together in one JSON
//! file (default `config.json`):
//!
//! ```json
//! {
//!   "key": "<api key>",
//!   "secret": "<api secret>",
//!   "access-token": "<token>",
//!   "access-token-secret": "<token secret>"
//! }
//! ```
//!
//! The two token entries are absent until the handshake has completed once.
//! Unknown entries are preserved when the file is rewritten.

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, ConsumerCredentials, Credentials};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// On-disk layout of the credential file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    key: String,
    secret: String,
    #[serde(
        rename = "access-token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    access_token: Option<String>,
    #[serde(
        rename = "access-token-secret",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    access_token_secret: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads and updates the credential file through the file system bridge.
#[derive(Clone)]
pub struct CredentialStore {
    file_system: Arc<dyn FileSystemAccess>,
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(file_system: Arc<dyn FileSystemAccess>, path: impl Into<PathBuf>) -> Self {
        Self {
            file_system,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> AuthError {
        AuthError::CredentialsUnavailable {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    async fn read_raw(&self) -> Result<CredentialFile> {
        let exists = self
            .file_system
            .exists(&self.path)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;
        if !exists {
            return Err(self.unavailable("file not found"));
        }

        let data = self
            .file_system
            .read_file(&self.path)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        let raw: CredentialFile =
            serde_json::from_slice(&data).map_err(|e| self.unavailable(e.to_string()))?;

        if raw.key.trim().is_empty() || raw.secret.trim().is_empty() {
            return Err(self.unavailable("\"key\" and \"secret\" must not be empty"));
        }

        Ok(raw)
    }

    /// Loads consumer credentials and, when present, the access token.
    ///
    /// A token without its secret (or the reverse) counts as no token.
    pub async fn load(&self) -> Result<Credentials> {
        let raw = self.read_raw().await?;
        let access = match (raw.access_token, raw.access_token_secret) {
            (Some(token), Some(secret)) if !token.is_empty() && !secret.is_empty() => {
                Some(AccessToken { token, secret })
            }
            _ => None,
        };

        debug!(
            path = %self.path.display(),
            has_access_token = access.is_some(),
            "Loaded credentials"
        );

        Ok(Credentials {
            consumer: ConsumerCredentials::new(raw.key, raw.secret),
            access,
        })
    }

    /// Writes `token` into the credential file, keeping every other entry.
    ///
    /// The file is replaced through a temporary sibling and a rename.
    pub async fn save_access_token(&self, token: &AccessToken) -> Result<()> {
        let mut raw = self.read_raw().await?;
        raw.access_token = Some(token.token.clone());
        raw.access_token_secret = Some(token.secret.clone());

        let not_saved = |reason: String| AuthError::CredentialsNotSaved {
            path: self.path.display().to_string(),
            reason,
        };

        let json = serde_json::to_vec_pretty(&raw).map_err(|e| not_saved(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        self.file_system
            .write_file(&tmp, Bytes::from(json))
            .await
            .map_err(|e| not_saved(e.to_string()))?;
        self.file_system
            .rename(&tmp, &self.path)
            .await
            .map_err(|e| not_saved(e.to_string()))?;

        info!(path = %self.path.display(), "Stored access token");
        Ok(())
    }
}
