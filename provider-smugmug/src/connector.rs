//! SmugMug API connector implementation
//!
//! Implements the `PhotoLibrary` trait for SmugMug API v2.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{ByteStream, HttpClient, HttpRequest};
use bridge_traits::library::{
    ImageSizes, PhotoLibrary, RemoteAlbum, RemoteImage, RemoteNode, RemoteUser,
};
use core_auth::OAuth1Signer;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::capture::ResponseCapture;
use crate::error::SmugMugError;
use crate::types::{
    AlbumImagesResponse, AlbumResponse, ChildNodesResponse, Envelope, ImageSizesResponse,
    NodeResponse, UserResponse,
};

/// SmugMug API origin
pub const DEFAULT_API_ORIGIN: &str = "https://api.smugmug.com";

/// Path of the authenticated-user lookup
const AUTH_USER_PATH: &str = "/api/v2!authuser";

/// SmugMug API connector
///
/// Relative API paths are joined to the configured origin; absolute URLs
/// (rendition downloads) are used as given. Every request is signed. Each
/// call makes exactly one attempt per page.
///
/// # Example
///
/// ```ignore
/// use provider_smugmug::SmugMugConnector;
/// use bridge_traits::library::PhotoLibrary;
///
/// let connector = SmugMugConnector::new(http_client, signer);
/// let user = connector.authenticated_user().await?;
/// ```
pub struct SmugMugConnector {
    http_client: Arc<dyn HttpClient>,
    signer: OAuth1Signer,
    api_origin: String,
    capture: Option<ResponseCapture>,
}

impl SmugMugConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, signer: OAuth1Signer) -> Self {
        Self {
            http_client,
            signer,
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            capture: None,
        }
    }

    pub fn with_api_origin(mut self, origin: impl Into<String>) -> Self {
        self.api_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Records every JSON response through `capture`.
    pub fn with_capture(mut self, capture: ResponseCapture) -> Self {
        self.capture = Some(capture);
        self
    }

    fn resolve(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("{}{}", self.api_origin, uri)
        }
    }

    /// Signed GET of `uri`, returning the resolved URL and the raw JSON body.
    #[instrument(skip(self))]
    async fn fetch(&self, uri: &str) -> std::result::Result<(String, Value), SmugMugError> {
        let url = self.resolve(uri);
        let request = self.signer.sign(HttpRequest::get(url.clone()).accept_json())?;

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            warn!(status = response.status, url = %url, "API request failed");
            return Err(SmugMugError::ApiError {
                status: response.status,
                url,
            });
        }

        let value: Value =
            serde_json::from_slice(&response.body).map_err(|e| SmugMugError::ParseError {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        debug!(url = %url, "API request succeeded");
        Ok((url, value))
    }

    async fn record_capture(
        &self,
        label: &str,
        value: &Value,
    ) -> std::result::Result<(), SmugMugError> {
        match &self.capture {
            Some(capture) => capture.record(label, value).await,
            None => Ok(()),
        }
    }

    /// Fetch, capture under `label`, and unwrap the response envelope.
    async fn get_json<T: DeserializeOwned>(
        &self,
        uri: &str,
        label: &str,
    ) -> std::result::Result<T, SmugMugError> {
        let (url, value) = self.fetch(uri).await?;
        self.record_capture(label, &value).await?;
        decode(&url, value)
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: Value) -> std::result::Result<T, SmugMugError> {
    let envelope: Envelope<T> =
        serde_json::from_value(value).map_err(|e| SmugMugError::ParseError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(envelope.response)
}

#[async_trait]
impl PhotoLibrary for SmugMugConnector {
    async fn authenticated_user(&self) -> Result<RemoteUser> {
        let response: UserResponse = self.get_json(AUTH_USER_PATH, "user").await?;
        Ok(response.user.into())
    }

    async fn get_node(&self, uri: &str) -> Result<RemoteNode> {
        let (url, value) = self.fetch(uri).await?;
        let response: NodeResponse = decode(&url, value.clone())?;
        let label = if response.node.node_type == "Album" {
            "album_node"
        } else {
            "folder_node"
        };
        self.record_capture(label, &value).await?;
        Ok(response.node.into())
    }

    async fn list_child_nodes(&self, uri: &str) -> Result<Vec<RemoteNode>> {
        let mut nodes = Vec::new();
        let mut next = Some(uri.to_string());

        while let Some(page_uri) = next {
            let page: ChildNodesResponse = self.get_json(&page_uri, "child_nodes").await?;
            nodes.extend(page.nodes.into_iter().map(RemoteNode::from));
            next = page.pages.and_then(|p| p.next_page);
        }

        debug!(uri = uri, count = nodes.len(), "Listed child nodes");
        Ok(nodes)
    }

    async fn get_album(&self, uri: &str) -> Result<RemoteAlbum> {
        let response: AlbumResponse = self.get_json(uri, "album").await?;
        Ok(response.album.into())
    }

    async fn list_album_images(&self, uri: &str) -> Result<Vec<RemoteImage>> {
        let mut images = Vec::new();
        let mut next = Some(uri.to_string());

        while let Some(page_uri) = next {
            let page: AlbumImagesResponse = self.get_json(&page_uri, "album_images").await?;
            images.extend(page.images.into_iter().map(RemoteImage::from));
            next = page.pages.and_then(|p| p.next_page);
        }

        debug!(uri = uri, count = images.len(), "Listed album images");
        Ok(images)
    }

    async fn get_image_sizes(&self, uri: &str) -> Result<ImageSizes> {
        let response: ImageSizesResponse = self.get_json(uri, "image_sizes").await?;
        Ok(response.image_sizes.into())
    }

    async fn download(&self, url: &str) -> Result<ByteStream> {
        let request = self
            .signer
            .sign(HttpRequest::get(self.resolve(url)))
            .map_err(SmugMugError::from)?;
        self.http_client.download_stream(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::TokioFileSystem;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use core_auth::{AccessToken, ConsumerCredentials};
    use mockall::mock;
    use std::collections::HashMap;
    use tokio::io::AsyncReadExt;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(&self, request: HttpRequest) -> BridgeResult<ByteStream>;
        }
    }

    fn signer() -> OAuth1Signer {
        OAuth1Signer::with_access_token(
            ConsumerCredentials::new("k", "s"),
            &AccessToken::new("t", "ts"),
        )
    }

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn child_page(ids: &[&str], next: Option<&str>) -> String {
        let nodes: Vec<Value> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "NodeID": id,
                    "Name": id,
                    "UrlName": id,
                    "Type": "Album",
                    "IsRoot": false,
                    "Uri": format!("/api/v2/node/{}", id),
                    "Uris": {"Album": {"Uri": format!("/api/v2/album/{}", id)}}
                })
            })
            .collect();
        let mut response = serde_json::json!({"Node": nodes});
        if let Some(next) = next {
            response["Pages"] = serde_json::json!({"NextPage": next});
        }
        serde_json::json!({"Response": response}).to_string()
    }

    #[tokio::test]
    async fn test_authenticated_user() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                req.url == "https://api.smugmug.com/api/v2!authuser"
                    && req.headers.get("Accept").map(String::as_str) == Some("application/json")
                    && req.headers.contains_key("Authorization")
            })
            .times(1)
            .returning(|_| {
                Ok(json_response(
                    200,
                    r#"{"Response": {"User": {"Name": "jane",
                        "Uris": {"Node": {"Uri": "/api/v2/node/root1"}}}}}"#,
                ))
            });

        let connector = SmugMugConnector::new(Arc::new(mock_http), signer());
        let user = connector.authenticated_user().await.unwrap();

        assert_eq!(user.name, "jane");
        assert_eq!(user.node_uri, "/api/v2/node/root1");
    }

    #[tokio::test]
    async fn test_child_listing_follows_pages() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url.ends_with("/api/v2/node/f!children"))
            .times(1)
            .returning(|_| {
                Ok(json_response(
                    200,
                    &child_page(&["a", "b"], Some("/api/v2/node/f!children?start=3&count=2")),
                ))
            });
        mock_http
            .expect_execute()
            .withf(|req| req.url.ends_with("start=3&count=2"))
            .times(1)
            .returning(|_| Ok(json_response(200, &child_page(&["c"], None))));

        let connector = SmugMugConnector::new(Arc::new(mock_http), signer());
        let nodes = connector
            .list_child_nodes("/api/v2/node/f!children")
            .await
            .unwrap();

        let ids: Vec<&str> = nodes.iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(nodes[2].album_uri.as_deref(), Some("/api/v2/album/c"));
    }

    #[tokio::test]
    async fn test_empty_album_listing() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{"Response": {"Uri": "/api/v2/album/x!images", "Pages": {"Total": 0}}}"#,
            ))
        });

        let connector = SmugMugConnector::new(Arc::new(mock_http), signer());
        let images = connector
            .list_album_images("/api/v2/album/x!images")
            .await
            .unwrap();

        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_names_url() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(404, r#"{"Code": 404}"#)));

        let connector = SmugMugConnector::new(Arc::new(mock_http), signer())
            .with_api_origin("http://127.0.0.1:9000/");
        let result = connector.get_node("/api/v2/node/missing").await;

        match result {
            Err(BridgeError::HttpStatus { status, url }) => {
                assert_eq!(status, 404);
                assert_eq!(url, "http://127.0.0.1:9000/api/v2/node/missing");
            }
            other => panic!("unexpected result: {:?}", other.map(|n| n.node_id)),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(200, r#"{"Response": {}}"#)));

        let connector = SmugMugConnector::new(Arc::new(mock_http), signer());
        let result = connector.get_album("/api/v2/album/a").await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(msg)) if msg.contains("/api/v2/album/a")));
    }

    #[tokio::test]
    async fn test_capture_writes_labelled_response() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{"Response": {"ImageSizes": {"LargeImageUrl": "https://p/k-L.jpg"}}}"#,
            ))
        });

        let capture = ResponseCapture::new(Arc::new(TokioFileSystem::new()), dir.path());
        let connector =
            SmugMugConnector::new(Arc::new(mock_http), signer()).with_capture(capture);
        let sizes = connector
            .get_image_sizes("/api/v2/image/k-0!sizes")
            .await
            .unwrap();

        assert_eq!(sizes.large.as_deref(), Some("https://p/k-L.jpg"));
        assert!(dir.path().join("image_sizes.json").exists());
    }

    #[tokio::test]
    async fn test_album_node_captured_under_album_label() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{"Response": {"Node": {"NodeID": "al1", "Type": "Album",
                    "Uri": "/api/v2/node/al1",
                    "Uris": {"Album": {"Uri": "/api/v2/album/al1"}}}}}"#,
            ))
        });

        let capture = ResponseCapture::new(Arc::new(TokioFileSystem::new()), dir.path());
        let connector =
            SmugMugConnector::new(Arc::new(mock_http), signer()).with_capture(capture);
        let node = connector.get_node("/api/v2/node/al1").await.unwrap();

        assert_eq!(node.album_uri.as_deref(), Some("/api/v2/album/al1"));
        assert!(dir.path().join("album_node.json").exists());
        assert!(!dir.path().join("folder_node.json").exists());
    }

    #[tokio::test]
    async fn test_download_is_signed_and_absolute() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_download_stream()
            .withf(|req| {
                req.url == "https://photos.smugmug.com/k-L.jpg"
                    && req.headers.contains_key("Authorization")
            })
            .times(1)
            .returning(|_| Ok(Box::new(std::io::Cursor::new(b"jpeg".to_vec())) as ByteStream));

        let connector = SmugMugConnector::new(Arc::new(mock_http), signer());
        let mut stream = connector
            .download("https://photos.smugmug.com/k-L.jpg")
            .await
            .unwrap();

        let mut body = Vec::new();
        stream.read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"jpeg");
    }
}
