//! # Authentication Module
//!
//! OAuth 1.0a credentials for the photo service.
//!
//! ## Overview
//!
//! - [`CredentialStore`] reads the consumer key/secret and the access token
//!   from the JSON credential file and writes newly issued tokens back.
//! - [`OAuth1FlowManager`] runs the out-of-band three-legged handshake.
//! - [`OAuth1Signer`] adds HMAC-SHA1 `Authorization` headers to requests.
//! - [`AuthManager`] ties them together: load, authorize if needed, sign.

pub mod error;
pub mod manager;
pub mod oauth;
pub mod signer;
pub mod token_store;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use oauth::{OAuth1Endpoints, OAuth1FlowManager};
pub use signer::OAuth1Signer;
pub use token_store::CredentialStore;
pub use types::{AccessToken, ConsumerCredentials, Credentials, RequestToken};
