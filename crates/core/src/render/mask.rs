use image::RgbaImage;

/// Blacks out every colour channel in place, leaving alpha untouched.
///
/// What remains is the silhouette of the original alpha shape.
pub fn mask_silhouette(buffer: &mut RgbaImage) {
    for pixel in buffer.pixels_mut() {
        pixel.0[0] = 0;
        pixel.0[1] = 0;
        pixel.0[2] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut buffer = RgbaImage::new(3, 2);
        buffer.put_pixel(0, 0, Rgba([200, 10, 30, 255]));
        buffer.put_pixel(1, 0, Rgba([1, 2, 3, 128]));
        buffer.put_pixel(2, 1, Rgba([90, 90, 90, 0]));
        buffer
    }

    #[test]
    fn mask_zeroes_colour_and_keeps_alpha() {
        let original = sample();
        let mut masked = original.clone();
        mask_silhouette(&mut masked);

        for (before, after) in original.pixels().zip(masked.pixels()) {
            assert_eq!(&after.0[..3], &[0, 0, 0]);
            assert_eq!(after.0[3], before.0[3]);
        }
    }

    #[test]
    fn mask_is_idempotent() {
        let mut once = sample();
        mask_silhouette(&mut once);
        let mut twice = once.clone();
        mask_silhouette(&mut twice);
        assert_eq!(once, twice);
    }
}
