//! Binary media carried through the pipeline.

use std::sync::Arc;

/// An opaque, cheaply clonable media result or reference input.
///
/// Payloads live in slots and in reference inputs only. They are never part of a
/// [`ConfigSnapshot`](crate::ConfigSnapshot).
///
/// # Examples
///
/// ```
/// use reelsmith_core::MediaPayload;
///
/// let png = MediaPayload::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
/// assert_eq!(png.mime(), "image/png");
/// assert_eq!(png.len(), 4);
/// assert!(png.is_image());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    mime: String,
    data: Arc<[u8]>,
}

impl MediaPayload {
    /// Wrap raw bytes with their MIME type.
    pub fn new(mime: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// MIME type, e.g. `image/png` or `video/mp4`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there are no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True for `image/*` payloads.
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// True for `video/*` payloads.
    pub fn is_video(&self) -> bool {
        self.mime.starts_with("video/")
    }
}
