//! Validated image payloads.

use std::path::Path;

use crate::ValidationError;

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageMime {
    #[default]
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    Tiff,
    Heic,
    Avif,
}

impl ImageMime {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Heic => "image/heic",
            Self::Avif => "image/avif",
        }
    }

    /// Map a file extension. Unrecognised extensions are rejected.
    pub fn from_extension(ext: &str) -> Result<Self, ValidationError> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "gif" => Ok(Self::Gif),
            "bmp" => Ok(Self::Bmp),
            "tif" | "tiff" => Ok(Self::Tiff),
            "heic" => Ok(Self::Heic),
            "avif" => Ok(Self::Avif),
            other => Err(ValidationError::NotAnImage(other.to_string())),
        }
    }

    /// Map a content type such as `image/png`. Must be `image/*`; subtypes
    /// without a variant fall back to jpeg.
    pub fn from_content_type(content_type: &str) -> Result<Self, ValidationError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let Some(subtype) = essence.strip_prefix("image/") else {
            return Err(ValidationError::NotAnImage(essence));
        };
        Ok(match subtype {
            "png" => Self::Png,
            "webp" => Self::Webp,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tiff" => Self::Tiff,
            "heic" => Self::Heic,
            "avif" => Self::Avif,
            _ => Self::Jpeg,
        })
    }

    /// Read the type from a `data:<mime>;base64,` prefix.
    pub fn from_data_url(url: &str) -> Result<Self, ValidationError> {
        let Some(rest) = url.strip_prefix("data:") else {
            return Err(ValidationError::NotAnImage("non data URL".to_string()));
        };
        let header = rest.split(',').next().unwrap_or_default();
        Self::from_content_type(header)
    }
}

/// Raw image bytes that passed size and type checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    bytes: Vec<u8>,
    mime: ImageMime,
    name: Option<String>,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime: ImageMime) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge {
                size: bytes.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self {
            bytes,
            mime,
            name: None,
        })
    }

    /// Build from bytes read off disk, taking the type from the file extension.
    pub fn from_path(path: &Path, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ValidationError::NotAnImage(path.display().to_string()))?;
        let mime = ImageMime::from_extension(ext)?;
        let mut input = Self::new(bytes, mime)?;
        input.name = path.file_name().and_then(|n| n.to_str()).map(str::to_string);
        Ok(input)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// File name the image was loaded from, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
