//! # Sync Coordinator
//!
//! Mirrors a remote folder tree into a local directory, depth first and one
//! request at a time.
//!
//! ## Workflow
//!
//! ### Folder
//! 1. `folder.json` present and every listed child marked: skip, no network
//! 2. `folder.json` present but a child incomplete: re-list children through
//!    the stored `child_nodes_uri`, sync them, rewrite the marker
//! 3. Otherwise fetch the node, list children, sync each in listing order,
//!    then write `folder.json`
//!
//! ### Album
//! 1. `album.json` present and every listed image marked: skip, no network
//! 2. `album.json` present but an image incomplete: re-list images through
//!    the stored `images_uri` and sync them
//! 3. Otherwise fetch node, album and image listing, write `album.json`,
//!    then sync each image
//!
//! ### Image
//! 1. `<image_key>.json` present: skip
//! 2. Otherwise fetch the size record, place every offered variant in tier
//!    order, then write the marker
//!
//! A failure anywhere aborts the run before the enclosing marker is written,
//! so the next run picks up where this one stopped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::SyncCoordinator;
//!
//! let coordinator = SyncCoordinator::new(library, file_system, "Output/jane");
//! let report = coordinator.sync_library(&user.node_uri).await?;
//! println!("{} images synced", report.stats.images_synced);
//! ```

use crate::classifier::{classify, expect_kind, NodeKind, SyncTarget};
use crate::marker::{
    image_marker_name, AlbumMarker, FolderMarker, ImageMarker, MarkerStore, ALBUM_MARKER,
    FOLDER_MARKER,
};
use crate::outcome::{EntityKind, StatsRecorder, SyncOutcome, SyncStats, SyncStatus};
use crate::variant::{VariantFetcher, VariantTier};
use crate::{Result, SyncError};
use bridge_traits::library::{PhotoLibrary, RemoteImage};
use bridge_traits::storage::FileSystemAccess;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub stats: SyncStats,
}

pub struct SyncCoordinator {
    library: Arc<dyn PhotoLibrary>,
    file_system: Arc<dyn FileSystemAccess>,
    markers: MarkerStore,
    fetcher: VariantFetcher,
    output_root: PathBuf,
    stats: StatsRecorder,
}

impl SyncCoordinator {
    pub fn new(
        library: Arc<dyn PhotoLibrary>,
        file_system: Arc<dyn FileSystemAccess>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            markers: MarkerStore::new(file_system.clone()),
            fetcher: VariantFetcher::new(library.clone(), file_system.clone()),
            library,
            file_system,
            output_root: output_root.into(),
            stats: StatsRecorder::default(),
        }
    }

    /// Totals so far
    pub fn stats(&self) -> SyncStats {
        self.stats.snapshot()
    }

    /// Mirror the folder at `root_uri` into the output root.
    pub async fn sync_library(&self, root_uri: &str) -> Result<SyncReport> {
        info!(
            root = root_uri,
            output = %self.output_root.display(),
            "Starting library sync"
        );

        let target = SyncTarget::root(root_uri, &self.output_root);
        let outcome = self.sync_folder(&target).await?;
        let stats = self.stats();

        info!(
            status = %outcome.status,
            touched = stats.entities_touched(),
            variants = stats.variants_downloaded,
            bytes = stats.bytes_downloaded,
            "Library sync finished"
        );
        Ok(SyncReport { outcome, stats })
    }

    /// Mirror one folder and everything below it.
    pub fn sync_folder<'a>(
        &'a self,
        target: &'a SyncTarget,
    ) -> BoxFuture<'a, Result<SyncOutcome>> {
        async move {
            let directory = &target.directory;
            let marker_path = directory.join(FOLDER_MARKER);

            if self.markers.exists(&marker_path).await? {
                let stored: FolderMarker = self.markers.load(&marker_path).await?;
                if self
                    .markers
                    .all_children_marked(directory, &stored.child_nodes)
                    .await?
                {
                    debug!(folder = %target.local_name, "Folder complete, skipping");
                    return Ok(self.finish(
                        EntityKind::Folder,
                        &target.local_name,
                        SyncStatus::Skipped,
                    ));
                }

                info!(folder = %target.local_name, "Resuming folder");
                let children_uri = stored.child_nodes_uri.clone().ok_or_else(|| {
                    SyncError::MissingLink {
                        uri: target.uri.clone(),
                        link: "ChildNodes",
                    }
                })?;
                let child_nodes = self.sync_children(directory, &children_uri).await?;
                let marker = FolderMarker {
                    child_nodes,
                    ..stored
                };
                self.markers.write(&marker_path, &marker).await?;
                return Ok(self.finish(
                    EntityKind::Folder,
                    &target.local_name,
                    SyncStatus::Resumed,
                ));
            }

            info!(folder = %target.local_name, uri = %target.uri, "Syncing folder");
            let node = self.library.get_node(&target.uri).await?;
            expect_kind(&node, NodeKind::Folder)?;
            let children_uri = node
                .child_nodes_uri
                .clone()
                .ok_or_else(|| SyncError::MissingLink {
                    uri: node.uri.clone(),
                    link: "ChildNodes",
                })?;

            self.create_dir(directory).await?;
            let child_nodes = self.sync_children(directory, &children_uri).await?;

            let marker = FolderMarker::from_node(&node, child_nodes);
            self.markers.write(&marker_path, &marker).await?;
            Ok(self.finish(EntityKind::Folder, &target.local_name, SyncStatus::Synced))
        }
        .boxed()
    }

    /// Sync each child in listing order, returning their local names.
    async fn sync_children(&self, directory: &Path, children_uri: &str) -> Result<Vec<String>> {
        let children = self.library.list_child_nodes(children_uri).await?;
        let mut names = Vec::with_capacity(children.len());

        for child in &children {
            let classified = classify(child)?;
            if classified.is_root {
                warn!(uri = %classified.uri, "Root node listed as a child, ignoring");
                continue;
            }

            let target = classified.target(directory);
            let outcome = match classified.kind {
                NodeKind::Folder => self.sync_folder(&target).await?,
                NodeKind::Album => self.sync_album(&target).await?,
            };
            names.push(outcome.local_name);
        }

        Ok(names)
    }

    /// Mirror one album and its images.
    #[instrument(skip(self, target), fields(album = %target.local_name))]
    pub async fn sync_album(&self, target: &SyncTarget) -> Result<SyncOutcome> {
        let directory = &target.directory;
        let marker_path = directory.join(ALBUM_MARKER);

        if self.markers.exists(&marker_path).await? {
            let stored: AlbumMarker = self.markers.load(&marker_path).await?;
            if self
                .markers
                .all_images_marked(directory, &stored.images)
                .await?
            {
                debug!("Album complete, skipping");
                return Ok(self.finish(EntityKind::Album, &target.local_name, SyncStatus::Skipped));
            }

            info!("Resuming album");
            let images = self.library.list_album_images(&stored.images_uri).await?;
            self.sync_images(directory, &images).await?;
            return Ok(self.finish(EntityKind::Album, &target.local_name, SyncStatus::Resumed));
        }

        info!(uri = %target.uri, "Syncing album");
        let node = self.library.get_node(&target.uri).await?;
        expect_kind(&node, NodeKind::Album)?;
        let album_uri = node.album_uri.as_deref().ok_or_else(|| SyncError::MissingLink {
            uri: node.uri.clone(),
            link: "Album",
        })?;

        let album = self.library.get_album(album_uri).await?;
        let images = self.library.list_album_images(&album.images_uri).await?;

        self.create_dir(directory).await?;
        let keys = images.iter().map(|image| image.image_key.clone()).collect();
        let marker = AlbumMarker::from_node(&node, album.images_uri.clone(), keys);
        self.markers.write(&marker_path, &marker).await?;

        self.sync_images(directory, &images).await?;
        Ok(self.finish(EntityKind::Album, &target.local_name, SyncStatus::Synced))
    }

    async fn sync_images(&self, directory: &Path, images: &[RemoteImage]) -> Result<()> {
        for image in images {
            self.sync_image(directory, image).await?;
        }
        Ok(())
    }

    /// Mirror one image's variants and metadata into `directory`.
    #[instrument(skip(self, directory, image), fields(image_key = %image.image_key))]
    pub async fn sync_image(&self, directory: &Path, image: &RemoteImage) -> Result<SyncOutcome> {
        let marker_path = directory.join(image_marker_name(&image.image_key));
        if self.markers.exists(&marker_path).await? {
            debug!("Image complete, skipping");
            return Ok(self.finish(EntityKind::Image, &image.image_key, SyncStatus::Skipped));
        }

        if image.image_sizes_uri.is_empty() {
            return Err(SyncError::MissingLink {
                uri: image.image_key.clone(),
                link: "ImageSizes",
            });
        }
        let sizes = self.library.get_image_sizes(&image.image_sizes_uri).await?;

        let mut files = Vec::new();
        for tier in VariantTier::ALL {
            let Some(url) = tier.url(&sizes) else {
                continue;
            };
            let fetched = self
                .fetcher
                .fetch_variant(directory, &image.image_key, &image.format, url, tier)
                .await?;
            self.stats.record_variant(fetched.bytes_written);
            files.push(fetched.file_name);
        }

        let marker = ImageMarker::from_image(image, files);
        self.markers.write(&marker_path, &marker).await?;
        debug!(variants = marker.images.len(), "Image synced");
        Ok(self.finish(EntityKind::Image, &image.image_key, SyncStatus::Synced))
    }

    async fn create_dir(&self, directory: &Path) -> Result<()> {
        self.file_system
            .create_dir_all(directory)
            .await
            .map_err(|e| SyncError::local_io(directory, e))
    }

    fn finish(&self, kind: EntityKind, local_name: &str, status: SyncStatus) -> SyncOutcome {
        self.stats.record(kind, status);
        SyncOutcome::new(local_name, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::TokioFileSystem;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::ByteStream;
    use bridge_traits::library::{ImageSizes, RemoteAlbum, RemoteNode, RemoteUser};

    /// Library with one album holding one image with one variant
    struct SingleAlbumLibrary;

    #[async_trait]
    impl PhotoLibrary for SingleAlbumLibrary {
        async fn authenticated_user(&self) -> BridgeResult<RemoteUser> {
            Err(BridgeError::NotAvailable("user".to_string()))
        }

        async fn get_node(&self, uri: &str) -> BridgeResult<RemoteNode> {
            Ok(RemoteNode {
                uri: uri.to_string(),
                node_id: "a1".to_string(),
                node_type: "Album".to_string(),
                url_name: "Paris".to_string(),
                album_uri: Some("/api/v2/album/A1".to_string()),
                ..Default::default()
            })
        }

        async fn list_child_nodes(&self, _uri: &str) -> BridgeResult<Vec<RemoteNode>> {
            Ok(Vec::new())
        }

        async fn get_album(&self, uri: &str) -> BridgeResult<RemoteAlbum> {
            Ok(RemoteAlbum {
                uri: uri.to_string(),
                album_key: "A1".to_string(),
                images_uri: "/api/v2/album/A1!images".to_string(),
            })
        }

        async fn list_album_images(&self, _uri: &str) -> BridgeResult<Vec<RemoteImage>> {
            Ok(vec![RemoteImage {
                image_key: "k1".to_string(),
                format: "JPG".to_string(),
                image_sizes_uri: "/api/v2/image/k1-0!sizes".to_string(),
                ..Default::default()
            }])
        }

        async fn get_image_sizes(&self, _uri: &str) -> BridgeResult<ImageSizes> {
            Ok(ImageSizes {
                small: Some("https://photos.example/k1-S.jpg".to_string()),
                ..Default::default()
            })
        }

        async fn download(&self, _url: &str) -> BridgeResult<ByteStream> {
            Ok(Box::new(std::io::Cursor::new(b"jpeg".to_vec())))
        }
    }

    fn coordinator(root: &Path) -> SyncCoordinator {
        SyncCoordinator::new(
            Arc::new(SingleAlbumLibrary),
            Arc::new(TokioFileSystem::new()),
            root,
        )
    }

    #[tokio::test]
    async fn test_sync_album_writes_marker_and_variant() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = coordinator(dir.path());
        let target = SyncTarget {
            uri: "/api/v2/node/a1".to_string(),
            directory: dir.path().join("Paris"),
            local_name: "Paris".to_string(),
        };

        let outcome = coordinator.sync_album(&target).await.unwrap();

        assert_eq!(outcome, SyncOutcome::new("Paris", SyncStatus::Synced));
        let album_dir = dir.path().join("Paris");
        assert!(album_dir.join(ALBUM_MARKER).exists());
        assert_eq!(std::fs::read(album_dir.join("k1-S.jpg")).unwrap(), b"jpeg");

        let image: ImageMarker =
            serde_json::from_slice(&std::fs::read(album_dir.join("k1.json")).unwrap()).unwrap();
        assert_eq!(image.images, vec!["k1-S.jpg".to_string()]);

        let stats = coordinator.stats();
        assert_eq!(stats.albums_synced, 1);
        assert_eq!(stats.images_synced, 1);
        assert_eq!(stats.bytes_downloaded, 4);
    }

    #[tokio::test]
    async fn test_sync_folder_rejects_album_node() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = coordinator(dir.path());

        let err = coordinator
            .sync_library("/api/v2/node/a1")
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::UnexpectedNodeKind { .. }));
        assert!(!dir.path().join(FOLDER_MARKER).exists());
    }

    #[tokio::test]
    async fn test_image_marker_skips_without_network() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("k1.json"), "{}").unwrap();
        let coordinator = coordinator(dir.path());

        let image = RemoteImage {
            image_key: "k1".to_string(),
            ..Default::default()
        };
        let outcome = coordinator.sync_image(dir.path(), &image).await.unwrap();

        assert_eq!(outcome.status, SyncStatus::Skipped);
        assert_eq!(coordinator.stats().images_skipped, 1);
    }
}
