//! # Mirror Configuration Module
//!
//! Provides configuration management for a mirror run.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `MirrorConfig` that holds every dependency and setting a run needs. It
//! enforces fail-fast validation so a run never starts with a missing bridge
//! or a nonsensical path.
//!
//! ## Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP transport (desktop default: reqwest)
//! - `FileSystemAccess` - Local file I/O (desktop default: tokio fs)
//!
//! When the `desktop-shims` feature is enabled, desktop defaults are injected
//! automatically if not provided. Without it, a missing bridge is reported as
//! [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::MirrorConfig;
//!
//! let config = MirrorConfig::builder()
//!     .output_dir("./Output")
//!     .credentials_path("config.json")
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{FileSystemAccess, HttpClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Default API origin for relative API paths
pub const DEFAULT_API_ORIGIN: &str = "https://api.smugmug.com";

/// Default location of the credential file
pub const DEFAULT_CREDENTIALS_PATH: &str = "config.json";

/// Configuration for one mirror run.
///
/// Use [`MirrorConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct MirrorConfig {
    /// Directory under which the account's tree is mirrored
    pub output_dir: PathBuf,

    /// JSON file holding consumer key/secret and, once issued, the access token
    pub credentials_path: PathBuf,

    /// Scheme and host prepended to relative API paths
    pub api_origin: String,

    /// When set, every raw API response is also written here for inspection
    pub capture_dir: Option<PathBuf>,

    /// HTTP client for API requests and downloads
    pub http_client: Arc<dyn HttpClient>,

    /// File system access abstraction
    pub file_system: Arc<dyn FileSystemAccess>,
}

impl std::fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("output_dir", &self.output_dir)
            .field("credentials_path", &self.credentials_path)
            .field("api_origin", &self.api_origin)
            .field("capture_dir", &self.capture_dir)
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .finish()
    }
}

impl MirrorConfig {
    /// Creates a new builder for constructing a `MirrorConfig`.
    pub fn builder() -> MirrorConfigBuilder {
        MirrorConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Output and credential paths are not empty
    /// - The API origin is an absolute http(s) origin without a trailing slash
    /// - The capture directory, when set, differs from the output directory
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("Output directory cannot be empty".to_string()));
        }

        if self.credentials_path.as_os_str().is_empty() {
            return Err(Error::Config("Credentials path cannot be empty".to_string()));
        }

        if !(self.api_origin.starts_with("https://") || self.api_origin.starts_with("http://")) {
            return Err(Error::Config(format!(
                "API origin must start with http:// or https://, got '{}'",
                self.api_origin
            )));
        }

        if self.api_origin.ends_with('/') {
            return Err(Error::Config(format!(
                "API origin must not end with '/', got '{}'",
                self.api_origin
            )));
        }

        if self.capture_dir.as_deref() == Some(self.output_dir.as_path()) {
            return Err(Error::Config(
                "Capture directory must differ from the output directory".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing(capability: &str, default_name: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{} implementation is required. Enable the 'desktop-shims' feature to use \
             the default {}, or inject one through the builder.",
            capability, default_name
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    Ok(Arc::new(ReqwestHttpClient::new()?))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing("HttpClient", "ReqwestHttpClient"))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Ok(Arc::new(bridge_desktop::TokioFileSystem::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(capability_missing("FileSystemAccess", "TokioFileSystem"))
}

/// Builder for constructing [`MirrorConfig`] instances.
#[derive(Default)]
pub struct MirrorConfigBuilder {
    output_dir: Option<PathBuf>,
    credentials_path: Option<PathBuf>,
    api_origin: Option<String>,
    capture_dir: Option<PathBuf>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
}

impl MirrorConfigBuilder {
    /// Sets the output directory (required).
    pub fn output_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the credential file path.
    ///
    /// Default: `config.json` in the working directory
    pub fn credentials_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Overrides the API origin.
    ///
    /// Default: [`DEFAULT_API_ORIGIN`]
    pub fn api_origin(mut self, origin: impl Into<String>) -> Self {
        self.api_origin = Some(origin.into());
        self
    }

    /// Enables raw response capture into `path`.
    pub fn capture_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.capture_dir = Some(path.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    ///
    /// If not provided, the desktop default (tokio fs-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Builds the final `MirrorConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(MirrorConfig)` on success, or an error if:
    /// - The output directory was not set
    /// - A bridge is missing and no default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<MirrorConfig> {
        let output_dir = self.output_dir.ok_or_else(|| {
            Error::Config("Output directory is required. Use .output_dir() to set it.".to_string())
        })?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let config = MirrorConfig {
            output_dir,
            credentials_path: self
                .credentials_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            api_origin: self
                .api_origin
                .unwrap_or_else(|| DEFAULT_API_ORIGIN.to_string()),
            capture_dir: self.capture_dir,
            http_client,
            file_system,
        };

        config.validate()?;

        Ok(config)
    }
}
