//! Fit-and-mask rendering of creature images onto a fixed square viewport.

mod canvas;
mod fit;
mod mask;
mod source;

pub use canvas::{Canvas, DeviceRect, MAX_DEVICE_PIXEL_RATIO};
pub use fit::{
    DEFAULT_INNER_BOX, DEFAULT_VIEWPORT_SIDE, Placement, Size, Viewport, centered_offset,
    fit_within_box,
};
pub use mask::mask_silhouette;
pub use source::{RenderError, SourceImage};
