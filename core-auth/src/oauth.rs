//! OAuth 1.0a Three-Legged Handshake
//!
//! Implements the out-of-band ("oob") flavour of RFC 5849 used by desktop
//! tools that cannot receive a browser redirect.
//!
//! # Overview
//!
//! 1. [`OAuth1FlowManager::request_token`] obtains a temporary token.
//! 2. [`OAuth1FlowManager::authorize_url`] builds the page the user visits;
//!    the service shows a six-digit verifier code.
//! 3. [`OAuth1FlowManager::exchange_verifier`] trades the temporary token and
//!    the verifier for a long-lived [`AccessToken`].
//!
//! Token endpoints answer with `application/x-www-form-urlencoded` bodies.
//! Secrets and verifiers are never logged.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{ConsumerCredentials, OAuth1FlowManager};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let flow = OAuth1FlowManager::new(
//!     ConsumerCredentials::new("key", "secret"),
//!     http_client,
//! );
//! let request_token = flow.request_token().await?;
//! println!("Visit: {}", flow.authorize_url(&request_token)?);
//! let access = flow.exchange_verifier(&request_token, "123456").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::signer::OAuth1Signer;
use crate::types::{AccessToken, ConsumerCredentials, RequestToken};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_runtime::logging::redact_if_sensitive;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Handshake endpoint locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth1Endpoints {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
}

impl OAuth1Endpoints {
    /// Endpoints under `origin`, laid out the way SmugMug serves them.
    pub fn smugmug(origin: &str) -> Self {
        let base = format!("{}/services/oauth/1.0a", origin.trim_end_matches('/'));
        Self {
            request_token_url: format!("{}/getRequestToken", base),
            authorize_url: format!("{}/authorize", base),
            access_token_url: format!("{}/getAccessToken", base),
        }
    }
}

impl Default for OAuth1Endpoints {
    fn default() -> Self {
        Self::smugmug("https://api.smugmug.com")
    }
}

/// Form-encoded token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    oauth_token: String,
    oauth_token_secret: String,
    #[serde(default)]
    oauth_callback_confirmed: Option<String>,
}

/// Runs the three legs of the handshake.
pub struct OAuth1FlowManager {
    consumer: ConsumerCredentials,
    endpoints: OAuth1Endpoints,
    http_client: Arc<dyn HttpClient>,
}

impl OAuth1FlowManager {
    pub fn new(consumer: ConsumerCredentials, http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(consumer, OAuth1Endpoints::default(), http_client)
    }

    pub fn with_endpoints(
        consumer: ConsumerCredentials,
        endpoints: OAuth1Endpoints,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            consumer,
            endpoints,
            http_client,
        }
    }

    pub fn endpoints(&self) -> &OAuth1Endpoints {
        &self.endpoints
    }

    /// First leg: obtain a temporary token with an `oob` callback.
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> Result<RequestToken> {
        let signer = OAuth1Signer::new(self.consumer.clone());
        let url = self.endpoints.request_token_url.clone();
        let request = signer.sign_with_oauth_params(
            HttpRequest::get(url.clone()),
            &[("oauth_callback", "oob")],
        )?;

        let token = self.call_token_endpoint(&url, request).await?;
        let callback_confirmed = token.oauth_callback_confirmed.as_deref() == Some("true");
        if !callback_confirmed {
            warn!("Request token endpoint did not confirm the oob callback");
        }

        debug!(
            oauth_token = %redact_if_sensitive("oauth_token", &token.oauth_token),
            callback_confirmed,
            "Obtained request token"
        );
        Ok(RequestToken {
            token: token.oauth_token,
            secret: token.oauth_token_secret,
            callback_confirmed,
        })
    }

    /// Second leg: the page where the user grants full access and reads the
    /// verifier code.
    pub fn authorize_url(&self, request_token: &RequestToken) -> Result<String> {
        let mut url = Url::parse(&self.endpoints.authorize_url).map_err(|e| {
            AuthError::Signing {
                url: self.endpoints.authorize_url.clone(),
                reason: format!("Invalid authorize URL: {}", e),
            }
        })?;

        url.query_pairs_mut()
            .append_pair("oauth_token", &request_token.token)
            .append_pair("access", "Full")
            .append_pair("permissions", "Modify");

        Ok(url.to_string())
    }

    /// Third leg: trade the request token and verifier for an access token.
    #[instrument(skip(self, request_token, verifier))]
    pub async fn exchange_verifier(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken> {
        let verifier = verifier.trim();
        if verifier.is_empty() {
            return Err(AuthError::AuthorizationAborted(
                "empty verifier code".to_string(),
            ));
        }

        let signer = OAuth1Signer::with_request_token(self.consumer.clone(), request_token);
        let url = self.endpoints.access_token_url.clone();
        let request = signer.sign_with_oauth_params(
            HttpRequest::get(url.clone()),
            &[("oauth_verifier", verifier)],
        )?;

        let token = self.call_token_endpoint(&url, request).await?;
        info!(
            oauth_token = %redact_if_sensitive("oauth_token", &token.oauth_token),
            "Exchanged verifier for access token"
        );

        Ok(AccessToken {
            token: token.oauth_token,
            secret: token.oauth_token_secret,
        })
    }

    async fn call_token_endpoint(&self, url: &str, request: HttpRequest) -> Result<TokenResponse> {
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!(status = response.status, url = %url, "Token endpoint rejected request");
            return Err(AuthError::TokenEndpoint {
                url: url.to_string(),
                status: response.status,
                body,
            });
        }

        parse_token_response(url, &response)
    }
}

fn parse_token_response(url: &str, response: &HttpResponse) -> Result<TokenResponse> {
    let token: TokenResponse =
        serde_urlencoded::from_bytes(&response.body).map_err(|e| {
            AuthError::MalformedTokenResponse {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

    if token.oauth_token.is_empty() || token.oauth_token_secret.is_empty() {
        return Err(AuthError::MalformedTokenResponse {
            url: url.to_string(),
            reason: "token or token secret is empty".to_string(),
        });
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::ByteStream;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(&self, request: HttpRequest) -> BridgeResult<ByteStream>;
        }
    }

    fn form_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn consumer() -> ConsumerCredentials {
        ConsumerCredentials::new("consumer-key", "consumer-secret")
    }

    fn request_token() -> RequestToken {
        RequestToken {
            token: "req-token".to_string(),
            secret: "req-secret".to_string(),
            callback_confirmed: true,
        }
    }

    #[test]
    fn test_smugmug_endpoints() {
        let endpoints = OAuth1Endpoints::default();
        assert_eq!(
            endpoints.request_token_url,
            "https://api.smugmug.com/services/oauth/1.0a/getRequestToken"
        );
        assert_eq!(
            endpoints.access_token_url,
            "https://api.smugmug.com/services/oauth/1.0a/getAccessToken"
        );

        let local = OAuth1Endpoints::smugmug("http://127.0.0.1:9000/");
        assert_eq!(
            local.authorize_url,
            "http://127.0.0.1:9000/services/oauth/1.0a/authorize"
        );
    }

    #[test]
    fn test_authorize_url_requests_full_access() {
        let flow = OAuth1FlowManager::new(consumer(), Arc::new(MockHttpClient::new()));
        let url = flow.authorize_url(&request_token()).unwrap();

        assert!(url.starts_with("https://api.smugmug.com/services/oauth/1.0a/authorize?"));
        assert!(url.contains("oauth_token=req-token"));
        assert!(url.contains("access=Full"));
        assert!(url.contains("permissions=Modify"));
    }

    #[tokio::test]
    async fn test_request_token_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                req.url.ends_with("/getRequestToken")
                    && req
                        .headers
                        .get("Authorization")
                        .is_some_and(|h| h.contains("oauth_callback=\"oob\""))
            })
            .times(1)
            .returning(|_| {
                Ok(form_response(
                    200,
                    "oauth_token=req-token&oauth_token_secret=req-secret&oauth_callback_confirmed=true",
                ))
            });

        let flow = OAuth1FlowManager::new(consumer(), Arc::new(mock_http));
        let token = flow.request_token().await.unwrap();

        assert_eq!(token.token, "req-token");
        assert_eq!(token.secret, "req-secret");
        assert!(token.callback_confirmed);
    }

    #[tokio::test]
    async fn test_exchange_verifier_signs_with_request_token() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                let header = req.headers.get("Authorization").cloned().unwrap_or_default();
                req.url.ends_with("/getAccessToken")
                    && header.contains("oauth_token=\"req-token\"")
                    && header.contains("oauth_verifier=\"123456\"")
            })
            .times(1)
            .returning(|_| {
                Ok(form_response(
                    200,
                    "oauth_token=access-token&oauth_token_secret=access-secret",
                ))
            });

        let flow = OAuth1FlowManager::new(consumer(), Arc::new(mock_http));
        let access = flow
            .exchange_verifier(&request_token(), " 123456\n")
            .await
            .unwrap();

        assert_eq!(access, AccessToken::new("access-token", "access-secret"));
    }

    #[tokio::test]
    async fn test_exchange_rejects_empty_verifier() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(0);

        let flow = OAuth1FlowManager::new(consumer(), Arc::new(mock_http));
        let result = flow.exchange_verifier(&request_token(), "   ").await;

        assert!(matches!(result, Err(AuthError::AuthorizationAborted(_))));
    }

    #[tokio::test]
    async fn test_token_endpoint_failure_is_reported() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(form_response(401, "oauth_problem=signature_invalid")));

        let flow = OAuth1FlowManager::new(consumer(), Arc::new(mock_http));
        let result = flow.request_token().await;

        match result {
            Err(AuthError::TokenEndpoint { status, body, url }) => {
                assert_eq!(status, 401);
                assert!(body.contains("signature_invalid"));
                assert!(url.ends_with("/getRequestToken"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_token_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(form_response(200, "unexpected=1")));

        let flow = OAuth1FlowManager::new(consumer(), Arc::new(mock_http));
        let result = flow.request_token().await;

        assert!(matches!(
            result,
            Err(AuthError::MalformedTokenResponse { .. })
        ));
    }
}
