//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1)
//!
//! Every API request and token-endpoint call carries an `Authorization: OAuth
//! ...` header computed from the consumer credentials, the current token (if
//! any), a fresh nonce and timestamp, and the request's own query parameters.

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, ConsumerCredentials, RequestToken};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bridge_traits::http::{HttpMethod, HttpRequest};
use core_runtime::logging::redact_if_sensitive;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::fmt;
use tracing::trace;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// RFC 3986 percent-encoding: everything except `A-Z a-z 0-9 - . _ ~`.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Signs outgoing requests with consumer credentials and an optional token.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer: ConsumerCredentials,
    token: Option<(String, String)>,
}

impl fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Signer")
            .field("consumer_key", &self.consumer.key())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl OAuth1Signer {
    /// Signer for the request-token leg (no token yet).
    pub fn new(consumer: ConsumerCredentials) -> Self {
        Self {
            consumer,
            token: None,
        }
    }

    /// Signer for regular API traffic.
    pub fn with_access_token(consumer: ConsumerCredentials, token: &AccessToken) -> Self {
        Self {
            consumer,
            token: Some((token.token.clone(), token.secret.clone())),
        }
    }

    /// Signer for the access-token leg.
    pub fn with_request_token(consumer: ConsumerCredentials, token: &RequestToken) -> Self {
        Self {
            consumer,
            token: Some((token.token.clone(), token.secret.clone())),
        }
    }

    pub fn consumer(&self) -> &ConsumerCredentials {
        &self.consumer
    }

    /// Adds the `Authorization` header to `request`.
    pub fn sign(&self, request: HttpRequest) -> Result<HttpRequest> {
        self.sign_with_oauth_params(request, &[])
    }

    /// Like [`sign`](Self::sign), with extra protocol parameters such as
    /// `oauth_callback` or `oauth_verifier` folded into the signature and
    /// header.
    pub fn sign_with_oauth_params(
        &self,
        request: HttpRequest,
        extra: &[(&str, &str)],
    ) -> Result<HttpRequest> {
        let header = self.authorization_header(
            request.method,
            &request.url,
            extra,
            &generate_nonce(),
            chrono::Utc::now().timestamp(),
        )?;
        trace!(
            method = request.method.as_str(),
            url = %request.url,
            authorization = %redact_if_sensitive("authorization", &header),
            "Signed request"
        );
        Ok(request.header("Authorization", header))
    }

    /// Computes the full `Authorization` header value for fixed nonce and
    /// timestamp.
    pub fn authorization_header(
        &self,
        method: HttpMethod,
        url: &str,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer.key().into()),
            ("oauth_nonce".into(), nonce.into()),
            ("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
            ("oauth_timestamp".into(), timestamp),
            ("oauth_version".into(), OAUTH_VERSION.into()),
        ];
        if let Some((token, _)) = &self.token {
            oauth_params.push(("oauth_token".into(), token.clone()));
        }
        oauth_params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let token_secret = self.token.as_ref().map(|(_, s)| s.as_str()).unwrap_or("");
        let signature = compute_signature(
            method,
            url,
            &oauth_params,
            self.consumer.secret(),
            token_secret,
        )?;
        oauth_params.push(("oauth_signature".into(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();

        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Builds the signature base string: method, base URI and the normalized
/// parameter list (query parameters of `url` merged with `params`).
pub fn signature_base_string(
    method: HttpMethod,
    url: &str,
    params: &[(String, String)],
) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| AuthError::Signing {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| AuthError::Signing {
        url: url.to_string(),
        reason: "URL has no host".to_string(),
    })?;
    let base_uri = match parsed.port() {
        Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, parsed.path()),
        None => format!("{}://{}{}", parsed.scheme(), host, parsed.path()),
    };

    let mut encoded: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .chain(
            params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(&base_uri),
        percent_encode(&normalized)
    ))
}

/// HMAC-SHA1 over the base string, base64 encoded.
pub fn compute_signature(
    method: HttpMethod,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let base = signature_base_string(method, url, params)?;
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| AuthError::Signing {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    mac.update(base.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
