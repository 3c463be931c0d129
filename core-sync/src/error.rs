use bridge_traits::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unsupported node type '{kind}' for child {uri}")]
    UnsupportedNodeKind { uri: String, kind: String },

    #[error("Expected a {expected} node at {uri}, found '{actual}'")]
    UnexpectedNodeKind {
        uri: String,
        expected: String,
        actual: String,
    },

    #[error("Node {uri} has unusable local name '{name}'")]
    UnsafeLocalName { uri: String, name: String },

    #[error("Node {uri} has no {link} link")]
    MissingLink { uri: String, link: &'static str },

    #[error("Error fetching {tier} image for {image_key} @ {url}: {source}")]
    VariantFetch {
        tier: String,
        image_key: String,
        url: String,
        #[source]
        source: BridgeError,
    },

    #[error("Invalid marker {}: {reason}", path.display())]
    Marker { path: PathBuf, reason: String },

    #[error("Local file operation failed on {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: BridgeError,
    },

    #[error("Remote request failed: {0}")]
    Remote(#[from] BridgeError),
}

impl SyncError {
    /// True for the one failure that gets its own process exit code.
    pub fn is_unsupported_node_kind(&self) -> bool {
        matches!(self, SyncError::UnsupportedNodeKind { .. })
    }

    pub(crate) fn local_io(path: impl Into<PathBuf>, source: BridgeError) -> Self {
        SyncError::LocalIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
