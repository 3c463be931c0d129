//! File System Abstraction
//!
//! Provides a platform-agnostic trait for the local side of the mirror:
//! directory creation, marker files and streamed binary writes.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;
use crate::http::ByteStream;

/// File system access trait
///
/// The sync engine never touches `std::fs` directly; every local effect goes
/// through this trait so tests can observe or fault-inject writes.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn write_marker(fs: &dyn FileSystemAccess, dir: &Path, data: &[u8]) -> Result<()> {
///     let tmp = dir.join("folder.json.tmp");
///     fs.write_file(&tmp, Bytes::copy_from_slice(data)).await?;
///     fs.rename(&tmp, &dir.join("folder.json")).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Write data to a file, creating or truncating it
    ///
    /// The data must be flushed to stable storage before this returns.
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Copy a byte stream into a file, creating or truncating it
    ///
    /// Returns the number of bytes written. The file is synced to stable
    /// storage before this returns; a stream error leaves whatever was
    /// written so far in place and is returned to the caller.
    async fn write_stream(&self, path: &Path, stream: ByteStream) -> Result<u64>;

    /// Atomically rename `from` to `to` within the same directory
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<()>;
}
