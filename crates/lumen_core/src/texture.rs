//! Texture image loading.
//!
//! Decodes image files into a flat 8-bit RGB buffer that image textures
//! sample with nearest-pixel lookups.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded texture image.
///
/// Pixels are stored as tightly packed RGB bytes, row-major, top row first.
/// An image with zero width or height holds no data; samplers treat it as
/// missing.
#[derive(Clone, Debug, Default)]
pub struct TextureImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl TextureImage {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 3;

    /// Create an image from raw RGB bytes.
    ///
    /// Returns an empty image if `data` does not hold exactly
    /// `width * height * 3` bytes.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Self {
        if data.len() != width as usize * height as usize * Self::CHANNELS {
            log::warn!(
                "Texture buffer has {} bytes, expected {}x{}x{}",
                data.len(),
                width,
                height,
                Self::CHANNELS
            );
            return Self::default();
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            (width as usize * height as usize * Self::CHANNELS) as f32 / 1024.0
        );

        Ok(Self::from_rgb8(width, height, rgb.into_raw()))
    }

    /// Load an image, or return an empty image if it cannot be read.
    ///
    /// Rendering with an empty image shows the sampler's fallback color
    /// instead of aborting.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("{err}; image texture will render as missing");
                Self::default()
            }
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGB bytes of the pixel at (x, y), with coordinates clamped to the image.
    ///
    /// Returns `None` for an empty image.
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 3]> {
        if self.is_empty() {
            return None;
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * Self::CHANNELS;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }
}
