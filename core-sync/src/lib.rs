//! # Sync Module
//!
//! Incremental, resumable mirroring of a remote photo library onto the local
//! file system.
//!
//! ## Overview
//!
//! The remote side is any [`bridge_traits::PhotoLibrary`]; the local side is
//! any [`bridge_traits::FileSystemAccess`]. The walk is depth first and
//! sequential. Every folder, album and image gets a completion marker once
//! its work is durable, and a later run skips anything already marked.
//!
//! ## Components
//!
//! - **Classifier** (`classifier`): node kinds and local directory names
//! - **Markers** (`marker`): completion records and their atomic writes
//! - **Variant Fetcher** (`variant`): streamed, atomically placed downloads
//! - **Sync Coordinator** (`coordinator`): the folder, album and image walk
//! - **Outcomes** (`outcome`): per-entity results and run totals

pub mod classifier;
pub mod coordinator;
pub mod error;
pub mod marker;
pub mod outcome;
pub mod variant;

pub use classifier::{classify, local_name, ClassifiedNode, NodeKind, SyncTarget};
pub use coordinator::{SyncCoordinator, SyncReport};
pub use error::{Result, SyncError};
pub use marker::{
    image_marker_name, AlbumMarker, FolderMarker, ImageMarker, MarkerStore, ALBUM_MARKER,
    FOLDER_MARKER,
};
pub use outcome::{SyncOutcome, SyncStats, SyncStatus};
pub use variant::{variant_file_name, FetchedVariant, VariantFetcher, VariantTier};
