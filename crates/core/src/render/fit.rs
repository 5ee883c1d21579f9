/// Logical side of the square viewport, in CSS pixels.
pub const DEFAULT_VIEWPORT_SIDE: u32 = 300;
/// Long edge of the fitted image, in CSS pixels.
pub const DEFAULT_INNER_BOX: u32 = 200;

/// Square drawing area with a smaller inner box the image is fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub side: u32,
    pub inner_box: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            side: DEFAULT_VIEWPORT_SIDE,
            inner_box: DEFAULT_INNER_BOX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Scales `(source_width, source_height)` so the longer edge equals `inner_box`.
///
/// The shorter edge is floored. Square sources take the "height" branch, which
/// yields `inner_box` on both axes. A zero dimension yields an empty size.
#[must_use]
pub fn fit_within_box(source_width: u32, source_height: u32, inner_box: u32) -> Size {
    if source_width == 0 || source_height == 0 {
        return Size::default();
    }

    let target = u64::from(inner_box);
    let (w, h) = (u64::from(source_width), u64::from(source_height));
    if w > h {
        Size::new(inner_box, to_u32(target * h / w))
    } else {
        Size::new(to_u32(target * w / h), inner_box)
    }
}

/// Offset that centres `extent` inside `side`: `floor(side/2) - floor(extent/2)`.
#[must_use]
pub fn centered_offset(side: u32, extent: u32) -> i64 {
    i64::from(side / 2) - i64::from(extent / 2)
}

fn to_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Where a source image lands inside the viewport, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub offset_x: i64,
    pub offset_y: i64,
    pub size: Size,
}

impl Placement {
    #[must_use]
    pub fn compute(viewport: Viewport, source_width: u32, source_height: u32) -> Self {
        let size = fit_within_box(source_width, source_height, viewport.inner_box);
        Self {
            offset_x: centered_offset(viewport.side, size.width),
            offset_y: centered_offset(viewport.side, size.height),
            size,
        }
    }
}
