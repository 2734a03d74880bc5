// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use std::io::Cursor;

/// Image formats recognized before a request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Ico,
}

/// A validated image: its format and the dimensions read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Ico => "image/vnd.microsoft.icon",
        }
    }

    /// Detect format from magic bytes at start of image data
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        if data.starts_with(b"\xFF\xD8\xFF") {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
            Some(ImageFormat::WebP)
        } else if data.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else if data.starts_with(b"II*\x00") || data.starts_with(b"MM\x00*") {
            Some(ImageFormat::Tiff)
        } else if data.starts_with(b"\x00\x00\x01\x00") {
            Some(ImageFormat::Ico)
        } else {
            None
        }
    }

    /// Detect the format and parse the header, requiring non-zero dimensions.
    ///
    /// Magic bytes alone are not enough: a PNG signature followed by garbage,
    /// or an icon directory with no entries, is rejected here.
    pub fn inspect(data: &[u8]) -> Option<ImageInfo> {
        let format = Self::detect(data)?;

        let (width, height) = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()?;

        if width == 0 || height == 0 {
            return None;
        }

        Some(ImageInfo {
            format,
            width,
            height,
        })
    }
}
