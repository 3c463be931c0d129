//! SmugMug API v2 response types
//!
//! Every JSON response wraps its payload in a `Response` object. Listing
//! payloads omit the item array entirely when empty, so listing arrays default
//! to empty.

use bridge_traits::library::{ImageSizes, RemoteAlbum, RemoteImage, RemoteNode, RemoteUser};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `{"Response": {...}}`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Response")]
    pub response: T,
}

/// `{"Uri": "..."}` link object
#[derive(Debug, Clone, Deserialize)]
pub struct UriRef {
    #[serde(rename = "Uri")]
    pub uri: String,
}

/// Pagination block of listing responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pages {
    #[serde(default)]
    pub next_page: Option<String>,
}

/// `/api/v2!authuser`
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "User")]
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub name: String,
    pub uris: UserUris,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserUris {
    pub node: UriRef,
}

impl From<User> for RemoteUser {
    fn from(user: User) -> Self {
        RemoteUser {
            name: user.name,
            node_uri: user.uris.node.uri,
        }
    }
}

/// Single node lookup
#[derive(Debug, Deserialize)]
pub struct NodeResponse {
    #[serde(rename = "Node")]
    pub node: Node,
}

/// Folder or album listing page
#[derive(Debug, Deserialize)]
pub struct ChildNodesResponse {
    #[serde(rename = "Node", default)]
    pub nodes: Vec<Node>,
    #[serde(rename = "Pages", default)]
    pub pages: Option<Pages>,
}

/// Node resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    #[serde(rename = "NodeID")]
    pub node_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub url_name: String,
    #[serde(default)]
    pub url_path: String,
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(rename = "Type")]
    pub node_type: String,
    #[serde(default)]
    pub is_root: bool,
    pub uri: String,
    #[serde(default)]
    pub uris: NodeUris,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeUris {
    #[serde(default)]
    pub highlight_image: Option<UriRef>,
    #[serde(default)]
    pub child_nodes: Option<UriRef>,
    #[serde(default)]
    pub album: Option<UriRef>,
}

impl From<Node> for RemoteNode {
    fn from(node: Node) -> Self {
        RemoteNode {
            uri: node.uri,
            node_id: node.node_id,
            node_type: node.node_type,
            url_name: node.url_name,
            is_root: node.is_root,
            name: node.name,
            description: node.description,
            privacy: node.privacy,
            keywords: node.keywords,
            url_path: node.url_path,
            date_added: node.date_added,
            highlight_image_uri: node.uris.highlight_image.map(|u| u.uri),
            child_nodes_uri: node.uris.child_nodes.map(|u| u.uri),
            album_uri: node.uris.album.map(|u| u.uri),
        }
    }
}

/// Album detail
#[derive(Debug, Deserialize)]
pub struct AlbumResponse {
    #[serde(rename = "Album")]
    pub album: Album,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Album {
    #[serde(default)]
    pub album_key: String,
    #[serde(default)]
    pub uri: String,
    pub uris: AlbumUris,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlbumUris {
    pub album_images: UriRef,
}

impl From<Album> for RemoteAlbum {
    fn from(album: Album) -> Self {
        RemoteAlbum {
            uri: album.uri,
            album_key: album.album_key,
            images_uri: album.uris.album_images.uri,
        }
    }
}

/// Album member listing page
#[derive(Debug, Deserialize)]
pub struct AlbumImagesResponse {
    #[serde(rename = "AlbumImage", default)]
    pub images: Vec<AlbumImage>,
    #[serde(rename = "Pages", default)]
    pub pages: Option<Pages>,
}

/// One album member image
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlbumImage {
    pub image_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub keyword_array: Vec<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub altitude: Option<i64>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub date_time_original: Option<String>,
    #[serde(default)]
    pub date_time_uploaded: Option<String>,
    #[serde(default)]
    pub original_height: Option<u64>,
    #[serde(default)]
    pub original_width: Option<u64>,
    #[serde(default)]
    pub original_size: Option<u64>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub uris: AlbumImageUris,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlbumImageUris {
    pub image_sizes: UriRef,
}

impl From<AlbumImage> for RemoteImage {
    fn from(image: AlbumImage) -> Self {
        RemoteImage {
            image_key: image.image_key,
            title: image.title,
            caption: image.caption,
            keywords: image.keyword_array,
            latitude: image.latitude,
            longitude: image.longitude,
            altitude: image.altitude,
            hidden: image.hidden,
            file_name: image.file_name,
            format: image.format,
            date_time_original: image.date_time_original,
            date_time_uploaded: image.date_time_uploaded,
            original_height: image.original_height,
            original_width: image.original_width,
            original_size: image.original_size,
            image_sizes_uri: image.uris.image_sizes.uri,
        }
    }
}

/// `!sizes` lookup
#[derive(Debug, Deserialize)]
pub struct ImageSizesResponse {
    #[serde(rename = "ImageSizes")]
    pub image_sizes: ImageSizesWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSizesWire {
    #[serde(default)]
    pub tiny_image_url: Option<String>,
    #[serde(default)]
    pub thumb_image_url: Option<String>,
    #[serde(default)]
    pub small_image_url: Option<String>,
    #[serde(default)]
    pub medium_image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
    #[serde(default)]
    pub x_large_image_url: Option<String>,
    #[serde(default)]
    pub x2_large_image_url: Option<String>,
    #[serde(default)]
    pub x3_large_image_url: Option<String>,
    #[serde(default)]
    pub original_image_url: Option<String>,
}

impl From<ImageSizesWire> for ImageSizes {
    fn from(sizes: ImageSizesWire) -> Self {
        ImageSizes {
            tiny: sizes.tiny_image_url,
            thumb: sizes.thumb_image_url,
            small: sizes.small_image_url,
            medium: sizes.medium_image_url,
            large: sizes.large_image_url,
            x_large: sizes.x_large_image_url,
            x2_large: sizes.x2_large_image_url,
            x3_large: sizes.x3_large_image_url,
            original: sizes.original_image_url,
        }
    }
}

/// Accepts a JSON number, a numeric string, an empty string or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    })
}
