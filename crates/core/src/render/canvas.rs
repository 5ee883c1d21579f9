use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use super::fit::{Placement, Viewport};
use super::mask::mask_silhouette;
use super::source::{RenderError, SourceImage};

/// Largest device pixel ratio a backing store is allocated for.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 8.0;

/// Rectangle in backing-store pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl DeviceRect {
    /// Maps a logical placement through a uniform scale.
    ///
    /// Edges are floored independently so adjacent placements tile without gaps.
    #[must_use]
    pub fn from_placement(placement: Placement, scale: f64) -> Self {
        let x0 = scale_floor(placement.offset_x, scale);
        let y0 = scale_floor(placement.offset_y, scale);
        let x1 = scale_floor(placement.offset_x + i64::from(placement.size.width), scale);
        let y1 = scale_floor(placement.offset_y + i64::from(placement.size.height), scale);
        Self {
            x: x0,
            y: y0,
            width: u32::try_from(x1 - x0).unwrap_or(0),
            height: u32::try_from(y1 - y0).unwrap_or(0),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale_floor(value: i64, scale: f64) -> i64 {
    (value as f64 * scale).floor() as i64
}

/// Persistent square drawing surface.
///
/// The backing store is `floor(side * scale)` pixels per axis while callers keep
/// working in logical units; `logical_side` is what the page should use as the
/// displayed size. Until `mount` is called every draw is a no-op.
#[derive(Debug, Clone)]
pub struct Canvas {
    viewport: Viewport,
    scale: f64,
    backing: Option<RgbaImage>,
}

impl Canvas {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scale: 1.0,
            backing: None,
        }
    }

    /// Allocates the backing store for the given device pixel ratio.
    ///
    /// Non-finite or non-positive ratios fall back to 1.0 and larger ones are
    /// capped at `MAX_DEVICE_PIXEL_RATIO`. Re-mounting with the same ratio keeps
    /// the existing buffer.
    pub fn mount(&mut self, device_pixel_ratio: f64) {
        let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        let side = backing_extent(self.viewport.side, scale);
        let reuse = self.backing.as_ref().is_some_and(|b| b.width() == side) && self.scale == scale;
        if !reuse {
            self.backing = Some(RgbaImage::new(side, side));
        }
        self.scale = scale;
    }

    pub fn unmount(&mut self) {
        self.backing = None;
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.backing.is_some()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn logical_side(&self) -> u32 {
        self.viewport.side
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn backing(&self) -> Option<&RgbaImage> {
        self.backing.as_ref()
    }

    /// Clears the surface and draws `image` fitted and centred, masked when `hidden`.
    ///
    /// Returns `false` without touching anything when the canvas is not mounted.
    pub fn draw(&mut self, image: &SourceImage, hidden: bool) -> bool {
        let scale = self.scale;
        let viewport = self.viewport;
        let Some(buffer) = self.backing.as_mut() else {
            return false;
        };

        for pixel in buffer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }

        let placement = Placement::compute(viewport, image.natural_width(), image.natural_height());
        let rect = DeviceRect::from_placement(placement, scale);
        if rect.width > 0 && rect.height > 0 {
            // Nearest-neighbour keeps pixel art crisp.
            let scaled = imageops::resize(image.pixels(), rect.width, rect.height, FilterType::Nearest);
            imageops::replace(buffer, &scaled, rect.x, rect.y);
        }

        if hidden {
            mask_silhouette(buffer);
        }
        true
    }

    /// PNG encoding of the backing store.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Unmounted` before `mount`, or `RenderError::Image`
    /// if the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let buffer = self.backing.as_ref().ok_or(RenderError::Unmounted)?;
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            buffer.as_raw(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_extent(side: u32, scale: f64) -> u32 {
    (f64::from(side) * scale).floor() as u32
}
