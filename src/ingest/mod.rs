//! Image ingest: turn operator-supplied bytes into an inline image reference.
//!
//! The size check runs before any encoding. The pipeline never touches the
//! content store; callers adopt the returned reference through the normal
//! update path.

use crate::busy::{BusyFlag, BusyGuard};
use crate::content::image::InlineImage;
use bytes::Bytes;
use image::ImageFormat;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument, warn};

/// Default upload ceiling, 4 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No file selected.")]
    Empty,

    #[error("File is too large. Maximum size is {}.", human_size(.max))]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported image format.")]
    UnsupportedFormat { declared: Option<String> },

    #[error("an image is already being processed")]
    Busy,

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn human_size(bytes: &usize) -> String {
    let bytes = *bytes;
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

#[derive(Debug)]
pub struct ImageIngest {
    max_bytes: usize,
    busy: BusyFlag,
}

impl Default for ImageIngest {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl ImageIngest {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            busy: BusyFlag::new(),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Validate and encode one image.
    ///
    /// The MIME type is sniffed from the leading bytes; `declared_mime` is
    /// only consulted when sniffing fails and must itself be `image/*`.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn ingest(
        &self,
        bytes: Bytes,
        declared_mime: Option<&str>,
    ) -> Result<InlineImage, IngestError> {
        let guard = self.busy.try_claim().ok_or(IngestError::Busy)?;
        self.encode_claimed(&guard, &bytes, declared_mime)
    }

    /// Read a file from disk and ingest it. The extension is used as the
    /// declared type.
    ///
    /// The busy flag is held from before the read until encoding is done,
    /// and the size is checked against file metadata before anything is
    /// read.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> Result<InlineImage, IngestError> {
        let path = path.as_ref();
        let guard = self.busy.try_claim().ok_or(IngestError::Busy)?;
        let read_err = |source| IngestError::Read {
            path: path.display().to_string(),
            source,
        };

        let size = fs::metadata(path).await.map_err(read_err)?.len();
        if size > self.max_bytes as u64 {
            warn!(size, max = self.max_bytes, "upload rejected, too large");
            return Err(IngestError::TooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                max: self.max_bytes,
            });
        }

        // The file may grow after the metadata check; never read past the limit.
        let file = fs::File::open(path).await.map_err(read_err)?;
        let mut bytes = Vec::with_capacity(size as usize);
        file.take(self.max_bytes as u64 + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(read_err)?;

        let declared = ImageFormat::from_path(path).ok().map(|f| f.to_mime_type());
        self.encode_claimed(&guard, &bytes, declared)
    }

    /// Validation and encoding shared by both entry points. Callers hold
    /// the busy flag.
    fn encode_claimed(
        &self,
        _guard: &BusyGuard<'_>,
        bytes: &[u8],
        declared_mime: Option<&str>,
    ) -> Result<InlineImage, IngestError> {
        if bytes.is_empty() {
            return Err(IngestError::Empty);
        }
        if bytes.len() > self.max_bytes {
            warn!(max = self.max_bytes, "upload rejected, too large");
            return Err(IngestError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let mime = resolve_mime(bytes, declared_mime)?;
        debug!(mime = %mime, "encoding upload");

        let encoded = InlineImage::encode(&mime, bytes);

        info!(
            mime = encoded.mime_type(),
            encoded = encoded.payload().len(),
            "image ingested"
        );
        Ok(encoded)
    }
}

fn resolve_mime(bytes: &[u8], declared: Option<&str>) -> Result<String, IngestError> {
    if let Ok(format) = image::guess_format(bytes) {
        return Ok(format.to_mime_type().to_string());
    }
    match declared.map(str::trim) {
        Some(mime) if mime.starts_with("image/") && mime.len() > "image/".len() => {
            Ok(mime.to_string())
        }
        other => Err(IngestError::UnsupportedFormat {
            declared: other.map(str::to_string),
        }),
    }
}
