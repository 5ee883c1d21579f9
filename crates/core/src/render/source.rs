use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image codec failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("canvas is not mounted")]
    Unmounted,
}

/// A decoded image at its natural size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode PNG/JPEG bytes as fetched from the asset proxy.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Image` when the payload is not a supported image.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self { pixels })
    }

    #[must_use]
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    #[must_use]
    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
