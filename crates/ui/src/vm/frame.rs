use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use beast_core::render::{Canvas, RenderError, SourceImage};

/// `data:` url for PNG bytes, usable as an `img` source.
#[must_use]
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Mount `canvas` at `device_pixel_ratio`, draw `image` and return the frame as a data url.
///
/// # Errors
///
/// Returns `RenderError` if PNG encoding fails.
pub fn render_frame(
    canvas: &mut Canvas,
    device_pixel_ratio: f64,
    image: &SourceImage,
    hidden: bool,
) -> Result<String, RenderError> {
    canvas.mount(device_pixel_ratio);
    canvas.draw(image, hidden);
    let png = canvas.encode_png()?;
    Ok(png_data_url(&png))
}
