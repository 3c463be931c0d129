//! # Node Classifier
//!
//! Decides what a remote node is and where it lives locally.
//!
//! Only folders and albums can be mirrored. Anything else (smart albums,
//! pages, system folders) stops the run: silently dropping a branch would
//! leave a mirror that looks complete but is not.

use crate::{Result, SyncError};
use bridge_traits::library::RemoteNode;
use std::path::{Path, PathBuf};

/// Mirrorable node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Folder,
    Album,
}

impl NodeKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Folder => "Folder",
            NodeKind::Album => "Album",
        }
    }

    /// `None` for kinds the mirror does not handle. Matching is exact.
    pub fn from_node_type(node_type: &str) -> Option<Self> {
        match node_type {
            "Folder" => Some(NodeKind::Folder),
            "Album" => Some(NodeKind::Album),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node with its kind resolved and its local name chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedNode {
    pub kind: NodeKind,
    pub node_id: String,
    pub url_name: String,
    pub is_root: bool,
    pub uri: String,
    pub local_name: String,
}

/// Where one entity is mirrored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// Node URI to fetch on a first sync
    pub uri: String,
    pub directory: PathBuf,
    /// Name recorded in the parent's manifest
    pub local_name: String,
}

impl SyncTarget {
    /// The account's root node, mirrored directly into `output_root`.
    pub fn root(uri: impl Into<String>, output_root: &Path) -> Self {
        let local_name = output_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            uri: uri.into(),
            directory: output_root.to_path_buf(),
            local_name,
        }
    }
}

impl ClassifiedNode {
    /// `parent/<local_name>`. The root node never comes through here; it is
    /// placed by [`SyncTarget::root`].
    pub fn target(&self, parent: &Path) -> SyncTarget {
        SyncTarget {
            uri: self.uri.clone(),
            directory: parent.join(&self.local_name),
            local_name: self.local_name.clone(),
        }
    }
}

/// Local directory name: the URL name, or the node ID when the URL name is
/// empty.
///
/// # Errors
///
/// [`SyncError::UnsafeLocalName`] when the chosen name is not a single path
/// component (empty, `.`, `..`, or containing a separator or NUL).
pub fn local_name(uri: &str, node_id: &str, url_name: &str) -> Result<String> {
    let name = if url_name.is_empty() {
        node_id
    } else {
        url_name
    };

    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c| matches!(c, '/' | '\\' | '\0'));
    if unsafe_name {
        return Err(SyncError::UnsafeLocalName {
            uri: uri.to_string(),
            name: name.to_string(),
        });
    }

    Ok(name.to_string())
}

/// Classify a node from a child listing.
///
/// # Errors
///
/// [`SyncError::UnsupportedNodeKind`] when the node is neither a folder nor an
/// album, [`SyncError::UnsafeLocalName`] when its name would leave the parent
/// directory.
pub fn classify(node: &RemoteNode) -> Result<ClassifiedNode> {
    let kind =
        NodeKind::from_node_type(&node.node_type).ok_or_else(|| SyncError::UnsupportedNodeKind {
            uri: node.uri.clone(),
            kind: node.node_type.clone(),
        })?;

    Ok(ClassifiedNode {
        kind,
        node_id: node.node_id.clone(),
        url_name: node.url_name.clone(),
        is_root: node.is_root,
        uri: node.uri.clone(),
        local_name: local_name(&node.uri, &node.node_id, &node.url_name)?,
    })
}

/// Fails unless `node` is of kind `expected`.
pub fn expect_kind(node: &RemoteNode, expected: NodeKind) -> Result<()> {
    match NodeKind::from_node_type(&node.node_type) {
        Some(kind) if kind == expected => Ok(()),
        _ => Err(SyncError::UnexpectedNodeKind {
            uri: node.uri.clone(),
            expected: expected.to_string(),
            actual: node.node_type.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(node_type: &str, node_id: &str, url_name: &str) -> RemoteNode {
        RemoteNode {
            uri: format!("/api/v2/node/{}", node_id),
            node_id: node_id.to_string(),
            node_type: node_type.to_string(),
            url_name: url_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_folder_and_album() {
        let folder = classify(&node("Folder", "f1", "Travel")).unwrap();
        assert_eq!(folder.kind, NodeKind::Folder);
        assert_eq!(folder.local_name, "Travel");

        let album = classify(&node("Album", "a1", "Paris")).unwrap();
        assert_eq!(album.kind, NodeKind::Album);
        assert_eq!(album.uri, "/api/v2/node/a1");
    }

    #[test]
    fn test_empty_url_name_falls_back_to_node_id() {
        let classified = classify(&node("Album", "abc123", "")).unwrap();
        assert_eq!(classified.local_name, "abc123");

        let classified = classify(&node("Album", "abc123", "vacation-2024")).unwrap();
        assert_eq!(classified.local_name, "vacation-2024");
    }

    #[test]
    fn test_unsupported_kind() {
        let err = classify(&node("SmartAlbum", "s1", "smart")).unwrap_err();
        assert!(err.is_unsupported_node_kind());
        assert!(err.to_string().contains("SmartAlbum"));
        assert!(err.to_string().contains("/api/v2/node/s1"));
    }

    #[test]
    fn test_kind_matching_is_exact() {
        assert!(classify(&node("folder", "x", "x")).is_err());
        assert!(classify(&node("", "x", "x")).is_err());
    }

    #[test]
    fn test_child_maps_under_parent() {
        let classified = classify(&node("Folder", "f1", "Travel")).unwrap();
        let target = classified.target(Path::new("/mirror/jane"));
        assert_eq!(target.directory, PathBuf::from("/mirror/jane/Travel"));
        assert_eq!(target.local_name, "Travel");
    }

    #[test]
    fn test_names_escaping_the_parent_are_rejected() {
        for url_name in ["..", ".", "a/b", "../etc", "a\\b", "nul\0"] {
            let err = classify(&node("Album", "a1", url_name)).unwrap_err();
            assert!(
                matches!(err, SyncError::UnsafeLocalName { ref name, .. } if name == url_name),
                "accepted {:?}",
                url_name
            );
        }

        // The node ID fallback is checked too
        assert!(classify(&node("Folder", "..", "")).is_err());
        assert!(classify(&node("Folder", "", "")).is_err());

        // Dots inside a name are fine
        assert_eq!(
            classify(&node("Album", "a1", "v1.2..final")).unwrap().local_name,
            "v1.2..final"
        );
    }

    #[test]
    fn test_expect_kind() {
        assert!(expect_kind(&node("Album", "a", "a"), NodeKind::Album).is_ok());
        let err = expect_kind(&node("Album", "a", "a"), NodeKind::Folder).unwrap_err();
        assert!(matches!(
            err,
            SyncError::UnexpectedNodeKind { ref expected, ref actual, .. }
                if expected == "Folder" && actual == "Album"
        ));
    }

    #[test]
    fn test_root_target_uses_directory_name() {
        let target = SyncTarget::root("/api/v2/node/r1", Path::new("Output/jane"));
        assert_eq!(target.local_name, "jane");
        assert_eq!(target.directory, PathBuf::from("Output/jane"));
    }
}
