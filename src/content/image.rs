//! Image references held inside section content.
//!
//! A reference is either a remote URL, a site-relative path, or an inline
//! `data:` URI carrying the base64 bytes directly. Inline references make the
//! snapshot self-contained at the cost of size.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("not a data URI: {0}")]
    NotDataUri(String),

    #[error("unsupported MIME type for inline image: {0}")]
    BadMime(String),

    #[error("payload is not valid base64: {0}")]
    BadPayload(String),
}

fn data_uri_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(concat!(
            r"^data:(?P<mime>[A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+)",
            r";base64,(?P<data>[A-Za-z0-9+/=]*)$"
        ))
        .expect("data URI pattern compiles")
    })
}

/// Self-contained `data:<mime>;base64,<payload>` image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InlineImage {
    mime: String,
    payload: String,
}

impl InlineImage {
    /// Encode raw bytes.
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload, checking that it decodes.
    pub fn from_base64(mime: &str, payload: &str) -> Result<Self, ImageRefError> {
        if !mime.starts_with("image/") {
            return Err(ImageRefError::BadMime(mime.to_string()));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| ImageRefError::BadPayload(e.to_string()))?;
        Ok(Self {
            mime: mime.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn parse(uri: &str) -> Result<Self, ImageRefError> {
        let caps = data_uri_regex()
            .captures(uri.trim())
            .ok_or_else(|| ImageRefError::NotDataUri(truncate(uri, 48)))?;
        Self::from_base64(&caps["mime"], &caps["data"])
    }

    pub fn mime_type(&self) -> &str {
        &self.mime
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Vec<u8> {
        // Payload was validated on construction.
        STANDARD.decode(&self.payload).unwrap_or_default()
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.payload)
    }
}

impl fmt::Display for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

impl TryFrom<String> for InlineImage {
    type Error = ImageRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InlineImage> for String {
    fn from(image: InlineImage) -> Self {
        image.to_data_uri()
    }
}

/// Image slot value as stored in a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

/// What an [`ImageRef`] points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Empty,
    Remote(Url),
    Relative(String),
    Inline(InlineImage),
    Invalid(String),
}

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Size of the reference text, which is what it costs inside the snapshot.
    pub fn stored_len(&self) -> usize {
        self.0.len()
    }

    pub fn source(&self) -> ImageSource {
        let raw = self.0.trim();
        if raw.is_empty() {
            return ImageSource::Empty;
        }
        if raw.starts_with("data:") {
            return match InlineImage::parse(raw) {
                Ok(image) => ImageSource::Inline(image),
                Err(e) => ImageSource::Invalid(e.to_string()),
            };
        }
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => ImageSource::Remote(url),
            Ok(url) => ImageSource::Invalid(format!("unsupported scheme: {}", url.scheme())),
            Err(_) => ImageSource::Relative(raw.to_string()),
        }
    }
}

impl From<InlineImage> for ImageRef {
    fn from(image: InlineImage) -> Self {
        Self(image.to_data_uri())
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
