//! Remote Photo Library Abstraction
//!
//! Provider-neutral view of a hierarchical photo service: folders holding
//! sub-folders and albums, albums holding images, images offered in several
//! renditions. Provider crates translate their wire formats into these types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::ByteStream;

/// The account the credentials belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Account name, used as the top-level local directory
    pub name: String,
    /// URI of the account's root node
    pub node_uri: String,
}

/// One entry of the remote hierarchy, as returned by a node lookup or a
/// child listing
///
/// `node_type` is kept verbatim; the sync engine decides which kinds it can
/// handle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoteNode {
    pub uri: String,
    pub node_id: String,
    pub node_type: String,
    pub url_name: String,
    pub is_root: bool,
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub keywords: Vec<String>,
    pub url_path: String,
    pub date_added: Option<String>,
    pub highlight_image_uri: Option<String>,
    /// Present on folders
    pub child_nodes_uri: Option<String>,
    /// Present on albums
    pub album_uri: Option<String>,
}

/// Album detail record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteAlbum {
    pub uri: String,
    pub album_key: String,
    pub images_uri: String,
}

/// One member image of an album listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoteImage {
    pub image_key: String,
    pub title: String,
    pub caption: String,
    pub keywords: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i64>,
    pub hidden: bool,
    pub file_name: String,
    /// Declared file format, e.g. `JPG`
    pub format: String,
    pub date_time_original: Option<String>,
    pub date_time_uploaded: Option<String>,
    pub original_height: Option<u64>,
    pub original_width: Option<u64>,
    pub original_size: Option<u64>,
    pub image_sizes_uri: String,
}

/// Rendition URLs available for one image
///
/// A `None` tier is simply not offered for that image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSizes {
    pub tiny: Option<String>,
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub x_large: Option<String>,
    pub x2_large: Option<String>,
    pub x3_large: Option<String>,
    pub original: Option<String>,
}

/// Read-only access to a remote photo library
///
/// Every method is a single logical remote operation (pagination is folded
/// in by the implementation) and fails on any non-success response.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::library::PhotoLibrary;
///
/// async fn root_children(library: &dyn PhotoLibrary) -> Result<usize> {
///     let user = library.authenticated_user().await?;
///     let root = library.get_node(&user.node_uri).await?;
///     let uri = root.child_nodes_uri.unwrap_or_default();
///     Ok(library.list_child_nodes(&uri).await?.len())
/// }
/// ```
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// Account owning the credentials in use
    async fn authenticated_user(&self) -> Result<RemoteUser>;

    /// Fetch a single node
    async fn get_node(&self, uri: &str) -> Result<RemoteNode>;

    /// List the children of a folder node, in service order
    async fn list_child_nodes(&self, uri: &str) -> Result<Vec<RemoteNode>>;

    /// Fetch an album detail record
    async fn get_album(&self, uri: &str) -> Result<RemoteAlbum>;

    /// List the member images of an album, in service order
    async fn list_album_images(&self, uri: &str) -> Result<Vec<RemoteImage>>;

    /// Fetch the rendition URLs of one image
    async fn get_image_sizes(&self, uri: &str) -> Result<ImageSizes>;

    /// Open a streaming download of one rendition
    async fn download(&self, url: &str) -> Result<ByteStream>;
}
