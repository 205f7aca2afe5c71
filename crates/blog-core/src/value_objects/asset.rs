//! Stored asset references (featured images, avatars)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Kind of asset, decides the storage prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    PostImage,
    Avatar,
}

impl AssetKind {
    /// Storage prefix for this kind
    pub fn prefix(self) -> &'static str {
        match self {
            Self::PostImage => "posts",
            Self::Avatar => "avatars",
        }
    }
}

/// Opaque reference to a stored binary asset, e.g. `posts/3f2a....png`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image formats accepted for featured images and avatars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Filename extensions an image upload may carry
    pub const EXTENSIONS: [&'static str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

    /// Detect the format from the file signature
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    /// Extension used for the stored file
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Uploaded binary waiting to be stored
#[derive(Clone)]
pub struct NewAsset {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl NewAsset {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: None,
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check the upload is a supported image
    ///
    /// The bytes must carry a known image signature and the filename, if it
    /// has an extension, must use an image extension.
    pub fn image_format(&self, kind: AssetKind) -> Result<ImageFormat, DomainError> {
        let format = ImageFormat::sniff(&self.bytes).ok_or(DomainError::InvalidImage(kind))?;
        let named_otherwise = self
            .filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| !ImageFormat::EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if named_otherwise {
            return Err(DomainError::InvalidImage(kind));
        }
        Ok(format)
    }
}

impl fmt::Debug for NewAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAsset")
            .field("len", &self.bytes.len())
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish()
    }
}
