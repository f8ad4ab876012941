//! Caption sizing and placement math.
//!
//! Kept free of cairo so the fitting loop can be exercised with a fake
//! measuring function.

/// Fraction of the image width a caption may occupy.
pub const MAX_WIDTH_RATIO: f64 = 0.9;

/// Size bounds the fitting loop works within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontBounds {
    pub min: u32,
    pub max: u32,
    /// Starting size is `min(width, height) / divisor`.
    pub divisor: u32,
}

impl FontBounds {
    /// Starting font size for an image, clamped to `[min, max]`.
    pub fn initial_size(&self, width: u32, height: u32) -> u32 {
        let divisor = self.divisor.max(1);
        let max = self.max.max(self.min);
        (width.min(height) / divisor).clamp(self.min, max)
    }
}

/// Shrinks `start` one pixel at a time until `measure(size)` fits within
/// `max_width` or `min` is reached.
///
/// The result is never below `min`, and every iteration lowers the size, so
/// the loop runs at most `start - min` times.
pub fn fit_font_size<F>(start: u32, min: u32, max_width: f64, mut measure: F) -> u32
where
    F: FnMut(u32) -> f64,
{
    let mut size = start.max(min);
    while size > min && measure(size) > max_width {
        size -= 1;
    }
    size
}

/// Ink box of laid-out text, in pixels, relative to the layout origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtents {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Vertical anchor of a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Bottom,
}

/// Layout origin that centres the ink box horizontally and pins it to the
/// top or bottom margin (`height / 20`).
pub fn caption_origin(
    image_width: u32,
    image_height: u32,
    extents: &TextExtents,
    anchor: Anchor,
) -> (f64, f64) {
    let margin = (image_height / 20) as f64;
    let ink_left = (image_width as f64 - extents.width) / 2.0;
    let ink_top = match anchor {
        Anchor::Top => margin,
        Anchor::Bottom => image_height as f64 - margin - extents.height,
    };
    (ink_left - extents.x, ink_top - extents.y)
}
