//! # Completion Markers
//!
//! A marker is a small JSON record whose presence means "this entity is
//! done". Folders get `folder.json`, albums `album.json`, images
//! `<image_key>.json`.
//!
//! Markers are always written to `<name>.tmp` first and renamed into place,
//! so a crash never leaves a half-written marker under its final name.
//! Absent optional values are serialized as `null`.

use crate::{Result, SyncError};
use bridge_traits::library::{RemoteImage, RemoteNode};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const FOLDER_MARKER: &str = "folder.json";
pub const ALBUM_MARKER: &str = "album.json";

/// File name of an image's marker
pub fn image_marker_name(image_key: &str) -> String {
    format!("{}.json", image_key)
}

/// Temporary sibling used while writing `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// `folder.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderMarker {
    pub node_id: String,
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub keywords: Vec<String>,
    pub url_name: String,
    pub url_path: String,
    pub date_added: Option<String>,
    pub highlight_image_uri: Option<String>,
    pub child_nodes_uri: Option<String>,
    /// Local names of the children, in service order
    pub child_nodes: Vec<String>,
}

impl FolderMarker {
    pub fn from_node(node: &RemoteNode, child_nodes: Vec<String>) -> Self {
        Self {
            node_id: node.node_id.clone(),
            name: node.name.clone(),
            description: node.description.clone(),
            privacy: node.privacy.clone(),
            keywords: node.keywords.clone(),
            url_name: node.url_name.clone(),
            url_path: node.url_path.clone(),
            date_added: node.date_added.clone(),
            highlight_image_uri: node.highlight_image_uri.clone(),
            child_nodes_uri: node.child_nodes_uri.clone(),
            child_nodes,
        }
    }
}

/// `album.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumMarker {
    pub node_id: String,
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub keywords: Vec<String>,
    pub url_name: String,
    pub url_path: String,
    pub date_added: Option<String>,
    pub highlight_image_uri: Option<String>,
    pub images_uri: String,
    /// Image keys, in album order
    pub images: Vec<String>,
}

impl AlbumMarker {
    pub fn from_node(
        node: &RemoteNode,
        images_uri: impl Into<String>,
        images: Vec<String>,
    ) -> Self {
        Self {
            node_id: node.node_id.clone(),
            name: node.name.clone(),
            description: node.description.clone(),
            privacy: node.privacy.clone(),
            keywords: node.keywords.clone(),
            url_name: node.url_name.clone(),
            url_path: node.url_path.clone(),
            date_added: node.date_added.clone(),
            highlight_image_uri: node.highlight_image_uri.clone(),
            images_uri: images_uri.into(),
            images,
        }
    }
}

/// `<image_key>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMarker {
    pub image_key: String,
    pub title: String,
    pub caption: String,
    pub keywords: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i64>,
    pub hidden: bool,
    pub filename: String,
    pub date_time_original: Option<String>,
    pub date_time_uploaded: Option<String>,
    pub original_height: Option<u64>,
    pub original_width: Option<u64>,
    pub original_size: Option<u64>,
    /// Variant file names, in tier order
    pub images: Vec<String>,
}

impl ImageMarker {
    pub fn from_image(image: &RemoteImage, images: Vec<String>) -> Self {
        Self {
            image_key: image.image_key.clone(),
            title: image.title.clone(),
            caption: image.caption.clone(),
            keywords: image.keywords.clone(),
            latitude: image.latitude,
            longitude: image.longitude,
            altitude: image.altitude,
            hidden: image.hidden,
            filename: image.file_name.clone(),
            date_time_original: image.date_time_original.clone(),
            date_time_uploaded: image.date_time_uploaded.clone(),
            original_height: image.original_height,
            original_width: image.original_width,
            original_size: image.original_size,
            images,
        }
    }
}

/// Reads and atomically writes markers through the file system bridge.
#[derive(Clone)]
pub struct MarkerStore {
    file_system: Arc<dyn FileSystemAccess>,
}

impl MarkerStore {
    pub fn new(file_system: Arc<dyn FileSystemAccess>) -> Self {
        Self { file_system }
    }

    pub async fn exists(&self, path: &Path) -> Result<bool> {
        self.file_system
            .exists(path)
            .await
            .map_err(|e| SyncError::local_io(path, e))
    }

    pub async fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let data = self
            .file_system
            .read_file(path)
            .await
            .map_err(|e| SyncError::local_io(path, e))?;

        serde_json::from_slice(&data).map_err(|e| SyncError::Marker {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub async fn write<T: Serialize>(&self, path: &Path, marker: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(marker).map_err(|e| SyncError::Marker {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let tmp = temp_path(path);
        self.file_system
            .write_file(&tmp, Bytes::from(json))
            .await
            .map_err(|e| SyncError::local_io(&tmp, e))?;
        self.file_system
            .rename(&tmp, path)
            .await
            .map_err(|e| SyncError::local_io(path, e))?;

        debug!(path = %path.display(), "Wrote marker");
        Ok(())
    }

    /// True when every name in `names` has a marker of its own:
    /// `<dir>/<name>/folder.json` or `<dir>/<name>/album.json`.
    pub async fn all_children_marked(&self, dir: &Path, names: &[String]) -> Result<bool> {
        for name in names {
            let child = dir.join(name);
            if !self.exists(&child.join(FOLDER_MARKER)).await?
                && !self.exists(&child.join(ALBUM_MARKER)).await?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True when every key in `image_keys` has `<dir>/<key>.json`.
    pub async fn all_images_marked(&self, dir: &Path, image_keys: &[String]) -> Result<bool> {
        for key in image_keys {
            if !self.exists(&dir.join(image_marker_name(key))).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
