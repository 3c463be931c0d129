//! # Sync Outcomes
//!
//! Each synchronizer returns an immutable [`SyncOutcome`]; a parent builds its
//! manifest from the ordered outcomes of its children. Run-wide totals are
//! collected in [`SyncStats`].

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// What a synchronizer did with one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Fetched from scratch and marked complete
    Synced,
    /// Marker existed but some members were missing; those were completed
    Resumed,
    /// Marker and all members present; nothing fetched
    Skipped,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Resumed => "resumed",
            SyncStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of synchronizing one folder, album or image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Directory name (folders, albums) or image key
    pub local_name: String,
    pub status: SyncStatus,
}

impl SyncOutcome {
    pub fn new(local_name: impl Into<String>, status: SyncStatus) -> Self {
        Self {
            local_name: local_name.into(),
            status,
        }
    }
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    pub folders_synced: u64,
    pub folders_resumed: u64,
    pub folders_skipped: u64,
    pub albums_synced: u64,
    pub albums_resumed: u64,
    pub albums_skipped: u64,
    pub images_synced: u64,
    pub images_skipped: u64,
    /// Variant files streamed during this run
    pub variants_downloaded: u64,
    /// Variant files found already in place
    pub variants_present: u64,
    pub bytes_downloaded: u64,
}

impl SyncStats {
    /// Entities that needed any remote work
    pub fn entities_touched(&self) -> u64 {
        self.folders_synced
            + self.folders_resumed
            + self.albums_synced
            + self.albums_resumed
            + self.images_synced
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum EntityKind {
    Folder,
    Album,
    Image,
}

/// Shared counters behind `&self`
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    folders: [AtomicU64; 3],
    albums: [AtomicU64; 3],
    images: [AtomicU64; 3],
    variants_downloaded: AtomicU64,
    variants_present: AtomicU64,
    bytes_downloaded: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record(&self, kind: EntityKind, status: SyncStatus) {
        let slots = match kind {
            EntityKind::Folder => &self.folders,
            EntityKind::Album => &self.albums,
            EntityKind::Image => &self.images,
        };
        let index = match status {
            SyncStatus::Synced => 0,
            SyncStatus::Resumed => 1,
            SyncStatus::Skipped => 2,
        };
        slots[index].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_variant(&self, bytes_written: Option<u64>) {
        match bytes_written {
            Some(bytes) => {
                self.variants_downloaded.fetch_add(1, Ordering::Relaxed);
                self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
            }
            None => {
                self.variants_present.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub(crate) fn snapshot(&self) -> SyncStats {
        let get = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        SyncStats {
            folders_synced: get(&self.folders[0]),
            folders_resumed: get(&self.folders[1]),
            folders_skipped: get(&self.folders[2]),
            albums_synced: get(&self.albums[0]),
            albums_resumed: get(&self.albums[1]),
            albums_skipped: get(&self.albums[2]),
            images_synced: get(&self.images[0]) + get(&self.images[1]),
            images_skipped: get(&self.images[2]),
            variants_downloaded: get(&self.variants_downloaded),
            variants_present: get(&self.variants_present),
            bytes_downloaded: get(&self.bytes_downloaded),
        }
    }
}
