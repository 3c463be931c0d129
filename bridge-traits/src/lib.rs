//! # Host Bridge Traits
//!
//! Abstraction traits that separate the mirror core from the world it talks
//! to.
//!
//! ## Overview
//!
//! This crate defines the contract between the sync engine and concrete
//! implementations. Each trait represents a capability the core requires but
//! that is supplied from outside: by `bridge-desktop` in production and by
//! in-memory fakes in tests.
//!
//! ## Traits
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport, buffered or streamed
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Local directories, markers, variant files
//!
//! ### Remote Library
//! - [`PhotoLibrary`](library::PhotoLibrary) - Folder/album/image tree of the remote service
//!
//! ### User Interaction
//! - [`VerifierPrompt`](prompt::VerifierPrompt) - Out-of-band authorization code entry
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Provider
//! and platform implementations convert their own errors into it and keep the
//! offending URL or path in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so one instance can be shared
//! behind an `Arc` for the whole run.

pub mod error;
pub mod http;
pub mod library;
pub mod prompt;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{ByteStream, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use library::{ImageSizes, PhotoLibrary, RemoteAlbum, RemoteImage, RemoteNode, RemoteUser};
pub use prompt::VerifierPrompt;
pub use storage::FileSystemAccess;
