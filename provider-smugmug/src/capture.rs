//! Raw response capture
//!
//! Writes each API response, pretty-printed, to `<dir>/<label>.json`. Later
//! responses with the same label replace earlier ones, so the directory always
//! shows the most recent response of each kind.

use crate::error::{Result, SmugMugError};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone)]
pub struct ResponseCapture {
    file_system: Arc<dyn FileSystemAccess>,
    dir: PathBuf,
}

impl ResponseCapture {
    pub fn new(file_system: Arc<dyn FileSystemAccess>, dir: impl Into<PathBuf>) -> Self {
        Self {
            file_system,
            dir: dir.into(),
        }
    }

    pub async fn record(&self, label: &str, response: &Value) -> Result<()> {
        let failed = |reason: String| SmugMugError::CaptureFailed {
            label: label.to_string(),
            reason,
        };

        let json = serde_json::to_vec_pretty(response).map_err(|e| failed(e.to_string()))?;
        self.file_system
            .create_dir_all(&self.dir)
            .await
            .map_err(|e| failed(e.to_string()))?;

        let path = self.dir.join(format!("{}.json", label));
        self.file_system
            .write_file(&path, Bytes::from(json))
            .await
            .map_err(|e| failed(e.to_string()))?;

        trace!(label = label, "Captured response");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::TokioFileSystem;

    #[tokio::test]
    async fn test_record_overwrites_by_label() {
        let dir = tempfile::tempdir().unwrap();
        let capture = ResponseCapture::new(
            Arc::new(TokioFileSystem::new()),
            dir.path().join("Requests"),
        );

        capture
            .record("folder_node", &serde_json::json!({"n": 1}))
            .await
            .unwrap();
        capture
            .record("folder_node", &serde_json::json!({"n": 2}))
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("Requests/folder_node.json")).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["n"], 2);
        assert!(written.contains('\n'), "capture is pretty-printed");
    }
}
