//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::ByteStream,
    storage::FileSystemAccess,
};
use bytes::Bytes;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Tokio-based file system implementation
///
/// Writes are synced to disk before the call returns so that a rename issued
/// afterwards publishes complete content. A rename syncs the destination's
/// directory, so renames that returned survive a power loss in call order.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path).await.map_err(Self::map_io_error)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(Self::map_io_error)?;
        debug!(path = ?path, "Created directory");
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()> {
        let mut file = fs::File::create(path).await.map_err(Self::map_io_error)?;
        file.write_all(data.as_ref())
            .await
            .map_err(Self::map_io_error)?;
        file.sync_all().await.map_err(Self::map_io_error)?;

        debug!(path = ?path, size = data.len(), "Wrote file");
        Ok(())
    }

    async fn write_stream(&self, path: &Path, mut stream: ByteStream) -> Result<u64> {
        let mut file = fs::File::create(path).await.map_err(Self::map_io_error)?;
        let written = tokio::io::copy(&mut stream, &mut file)
            .await
            .map_err(Self::map_io_error)?;
        file.sync_all().await.map_err(Self::map_io_error)?;

        debug!(path = ?path, size = written, "Wrote stream to file");
        Ok(written)
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await.map_err(Self::map_io_error)?;
        sync_parent_dir(to).await?;
        debug!(from = ?from, to = ?to, "Renamed file");
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }
}

/// Flush the directory entry holding `path`.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = fs::File::open(parent)
        .await
        .map_err(TokioFileSystem::map_io_error)?;
    dir.sync_all().await.map_err(TokioFileSystem::map_io_error)
}

// No directory handle to sync on this platform
#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::new();
        let test_file = dir.path().join("test-file.txt");

        let data = Bytes::from("Hello, World!");
        fs.write_file(&test_file, data.clone()).await.unwrap();

        assert!(fs.exists(&test_file).await.unwrap());
        let read_data = fs.read_file(&test_file).await.unwrap();
        assert_eq!(data, read_data);

        fs.delete_file(&test_file).await.unwrap();
        assert!(!fs.exists(&test_file).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_stream_and_rename() {
        let dir = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::new();
        let tmp = dir.path().join("image-L.jpg.tmp");
        let target = dir.path().join("image-L.jpg");

        let stream: ByteStream = Box::new(std::io::Cursor::new(vec![7u8; 1024]));
        let written = fs.write_stream(&tmp, stream).await.unwrap();
        assert_eq!(written, 1024);

        fs.rename(&tmp, &target).await.unwrap();
        assert!(!fs.exists(&tmp).await.unwrap());
        assert_eq!(fs.read_file(&target).await.unwrap().len(), 1024);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rename_syncs_destination_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::new();
        let album = dir.path().join("album");
        fs.create_dir_all(&album).await.unwrap();

        let tmp = album.join("album.json.tmp");
        let target = album.join("album.json");
        fs.write_file(&tmp, Bytes::from("{}")).await.unwrap();
        fs.rename(&tmp, &target).await.unwrap();

        sync_parent_dir(&target).await.unwrap();
        sync_parent_dir(Path::new("album.json")).await.unwrap();
        assert!(sync_parent_dir(&dir.path().join("missing").join("x.json"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::new();
        let nested = dir.path().join("a").join("b").join("c");

        fs.create_dir_all(&nested).await.unwrap();
        fs.create_dir_all(&nested).await.unwrap();
        assert!(fs.exists(&nested).await.unwrap());
    }
}
