//! # Variant Fetcher
//!
//! Downloads one rendition of an image into the album directory.
//!
//! The body is streamed into `<final>.tmp` and renamed only once the whole
//! stream has been written and synced, so a variant is either complete under
//! its final name or absent. A leftover `.tmp` is never taken for a finished
//! file; the next run downloads over it.

use crate::marker::temp_path;
use crate::{Result, SyncError};
use bridge_traits::library::{ImageSizes, PhotoLibrary};
use bridge_traits::storage::FileSystemAccess;
use core_runtime::logging::strip_path;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Rendition sizes, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantTier {
    Tiny,
    Thumbnail,
    Small,
    Medium,
    Large,
    XLarge,
    X2Large,
    X3Large,
    Original,
}

impl VariantTier {
    /// Fetch order
    pub const ALL: [VariantTier; 9] = [
        VariantTier::Tiny,
        VariantTier::Thumbnail,
        VariantTier::Small,
        VariantTier::Medium,
        VariantTier::Large,
        VariantTier::XLarge,
        VariantTier::X2Large,
        VariantTier::X3Large,
        VariantTier::Original,
    ];

    /// Suffix used in the variant file name
    pub fn code(&self) -> &'static str {
        match self {
            VariantTier::Tiny => "Ti",
            VariantTier::Thumbnail => "Th",
            VariantTier::Small => "S",
            VariantTier::Medium => "M",
            VariantTier::Large => "L",
            VariantTier::XLarge => "XL",
            VariantTier::X2Large => "X2",
            VariantTier::X3Large => "X3",
            VariantTier::Original => "Original",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VariantTier::Tiny => "Tiny",
            VariantTier::Thumbnail => "Thumbnail",
            VariantTier::Small => "Small",
            VariantTier::Medium => "Medium",
            VariantTier::Large => "Large",
            VariantTier::XLarge => "XLarge",
            VariantTier::X2Large => "X2Large",
            VariantTier::X3Large => "X3Large",
            VariantTier::Original => "Original",
        }
    }

    /// URL of this tier, if the image offers it
    pub fn url<'a>(&self, sizes: &'a ImageSizes) -> Option<&'a str> {
        let url = match self {
            VariantTier::Tiny => &sizes.tiny,
            VariantTier::Thumbnail => &sizes.thumb,
            VariantTier::Small => &sizes.small,
            VariantTier::Medium => &sizes.medium,
            VariantTier::Large => &sizes.large,
            VariantTier::XLarge => &sizes.x_large,
            VariantTier::X2Large => &sizes.x2_large,
            VariantTier::X3Large => &sizes.x3_large,
            VariantTier::Original => &sizes.original,
        };
        url.as_deref()
    }
}

impl std::fmt::Display for VariantTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `<image_key>-<code>.<format lowercased>`; no extension when the format is
/// empty.
pub fn variant_file_name(image_key: &str, format: &str, tier: VariantTier) -> String {
    if format.is_empty() {
        format!("{}-{}", image_key, tier.code())
    } else {
        format!("{}-{}.{}", image_key, tier.code(), format.to_lowercase())
    }
}

/// A variant in place under its final name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedVariant {
    pub file_name: String,
    /// `None` when the file was already present and nothing was downloaded
    pub bytes_written: Option<u64>,
}

pub struct VariantFetcher {
    library: Arc<dyn PhotoLibrary>,
    file_system: Arc<dyn FileSystemAccess>,
}

impl VariantFetcher {
    pub fn new(library: Arc<dyn PhotoLibrary>, file_system: Arc<dyn FileSystemAccess>) -> Self {
        Self {
            library,
            file_system,
        }
    }

    /// Place one variant in `directory`.
    ///
    /// # Errors
    ///
    /// [`SyncError::VariantFetch`] when the download cannot be opened or the
    /// stream fails part way; the temporary file is removed and the final
    /// name is left untouched.
    #[instrument(skip(self, directory, url, tier), fields(tier = %tier))]
    pub async fn fetch_variant(
        &self,
        directory: &Path,
        image_key: &str,
        format: &str,
        url: &str,
        tier: VariantTier,
    ) -> Result<FetchedVariant> {
        let file_name = variant_file_name(image_key, format, tier);
        let final_path = directory.join(&file_name);

        if self
            .file_system
            .exists(&final_path)
            .await
            .map_err(|e| SyncError::local_io(&final_path, e))?
        {
            debug!(file = %file_name, "Variant already present");
            return Ok(FetchedVariant {
                file_name,
                bytes_written: None,
            });
        }

        let tmp_path = temp_path(&final_path);
        let fetch_error = |source| SyncError::VariantFetch {
            tier: tier.label().to_string(),
            image_key: image_key.to_string(),
            url: url.to_string(),
            source,
        };

        let stream = self.library.download(url).await.map_err(fetch_error)?;

        let bytes_written = match self.file_system.write_stream(&tmp_path, stream).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Err(cleanup) = self.file_system.delete_file(&tmp_path).await {
                    warn!(
                        file = %strip_path(&tmp_path.to_string_lossy()),
                        error = %cleanup,
                        "Failed to remove partial download"
                    );
                }
                return Err(fetch_error(e));
            }
        };

        self.file_system
            .rename(&tmp_path, &final_path)
            .await
            .map_err(|e| SyncError::local_io(&final_path, e))?;

        info!(file = %file_name, bytes = bytes_written, "Downloaded variant");
        Ok(FetchedVariant {
            file_name,
            bytes_written: Some(bytes_written),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_and_codes() {
        let codes: Vec<_> = VariantTier::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(
            codes,
            vec!["Ti", "Th", "S", "M", "L", "XL", "X2", "X3", "Original"]
        );
    }

    #[test]
    fn test_variant_file_name() {
        assert_eq!(
            variant_file_name("k1", "JPG", VariantTier::Large),
            "k1-L.jpg"
        );
        assert_eq!(
            variant_file_name("k1", "PNG", VariantTier::Original),
            "k1-Original.png"
        );
        assert_eq!(variant_file_name("k1", "", VariantTier::Small), "k1-S");
    }

    #[test]
    fn test_url_lookup() {
        let sizes = ImageSizes {
            large: Some("https://photos.example/k1-L.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(
            VariantTier::Large.url(&sizes),
            Some("https://photos.example/k1-L.jpg")
        );
        assert_eq!(VariantTier::Tiny.url(&sizes), None);
    }
}
