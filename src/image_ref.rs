//! Self-describing image references
//!
//! An [`ImageRef`] is a validated `data:<mime>;base64,<payload>` URL. It can be
//! embedded wherever a display source is expected and re-extracted as raw
//! bytes for transmission to the generation service.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Error raised when a string is not a well-formed image data URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageRefError {
    #[error("not a data URL")]
    MissingScheme,
    #[error("data URL has no payload separator")]
    MissingPayload,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("'{0}' is not an image MIME type")]
    NotAnImage(String),
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// An encoded, self-contained image
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    mime: String,
    payload: String,
}

impl ImageRef {
    /// Embed raw bytes under the given MIME type
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload, as delivered by the service
    pub fn from_base64(
        mime: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Self, ImageRefError> {
        let mime = mime.into();
        if !mime.starts_with("image/") {
            return Err(ImageRefError::NotAnImage(mime));
        }
        let payload = payload.into();
        STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| ImageRefError::InvalidPayload(e.to_string()))?;
        Ok(Self { mime, payload })
    }

    /// Parse a `data:` URL
    pub fn parse(url: &str) -> Result<Self, ImageRefError> {
        let rest = url
            .strip_prefix(DATA_PREFIX)
            .ok_or(ImageRefError::MissingScheme)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(ImageRefError::MissingPayload)?;
        let mime = header
            .strip_suffix(BASE64_MARKER)
            .ok_or(ImageRefError::NotBase64)?;
        Self::from_base64(mime, payload)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The base64 payload without the `data:` header
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decode the payload back into raw bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ImageRefError> {
        STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|e| ImageRefError::InvalidPayload(e.to_string()))
    }

    /// Size of the decoded image in bytes, computed from the payload length
    pub fn byte_len(&self) -> usize {
        let padding = self.payload.bytes().rev().take_while(|b| *b == b'=').count();
        (self.payload.len() / 4 * 3).saturating_sub(padding)
    }

    /// The full data URL
    pub fn to_data_url(&self) -> String {
        self.to_string()
    }

    /// Read dimensions from the image header without decoding pixels
    pub fn probe(&self) -> Option<ImageInfo> {
        let bytes = self.to_bytes().ok()?;
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()?;
        Some(ImageInfo {
            mime: self.mime.clone(),
            width,
            height,
            byte_len: bytes.len(),
        })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DATA_PREFIX}{}{BASE64_MARKER},{}", self.mime, self.payload)
    }
}

// Payloads run to megabytes; keep them out of debug output and logs.
impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("mime", &self.mime)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl std::str::FromStr for ImageRef {
    type Err = ImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Header-level facts about an image, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

impl fmt::Display for ImageInfo {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}×{} {} ({:.1} KiB)",
            self.width,
            self.height,
            self.mime,
            self.byte_len as f64 / 1024.0
        )
    }
}

/// Detect the MIME type from magic bytes
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Whether `mime` names a format [`sniff_mime`] cannot recognise from content
///
/// Only these are taken on the strength of a file name or header alone.
pub fn is_unsniffable(mime: &str) -> bool {
    matches!(mime, "image/heic" | "image/heif")
}

/// MIME type implied by a file extension
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// File extension to use when writing an image of this MIME type
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "image/heif" => "heif",
        _ => "png",
    }
}
