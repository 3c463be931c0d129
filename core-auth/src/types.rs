use serde::{Deserialize, Serialize};
use std::fmt;

/// Application identity issued by the photo service.
///
/// # Examples
///
/// ```
/// use core_auth::ConsumerCredentials;
///
/// let consumer = ConsumerCredentials::new("my-key", "my-secret");
/// assert_eq!(consumer.key(), "my-key");
/// // Debug output never contains the secret
/// assert!(!format!("{:?}", consumer).contains("my-secret"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCredentials {
    key: String,
    secret: String,
}

impl ConsumerCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Temporary token from the first handshake leg.
///
/// Only meaningful until it is exchanged for an [`AccessToken`].
#[derive(Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
    /// Whether the server acknowledged the `oob` callback
    pub callback_confirmed: bool,
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestToken")
            .field("token", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("callback_confirmed", &self.callback_confirmed)
            .finish()
    }
}

/// Long-lived token authorizing API requests on the user's behalf.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Everything loaded from the credential file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer: ConsumerCredentials,
    /// `None` until the handshake has completed once
    pub access: Option<AccessToken>,
}

impl Credentials {
    pub fn is_authorized(&self) -> bool {
        self.access.is_some()
    }
}
