//! Crop validation, pixel-rect derivation, and extraction.
//!
//! Crop regions are specified in normalized coordinates (0.0 to 1.0)
//! relative to the image dimensions, making them independent of the actual
//! pixel size:
//!
//! - (0.0, 0.0) = top-left corner
//! - (1.0, 1.0) = bottom-right corner
//!
//! Validation and extraction are split deliberately: a rectangle that fails
//! [`validate_crop`] is rejected at the engine boundary, while
//! [`to_pixel_rect`] defensively clamps whatever it is given so extraction
//! can never read outside the bitmap.

use crate::bitmap::{Bitmap, PixelRect, BYTES_PER_PIXEL};
use crate::CropRect;

/// Minimum normalized width and height a crop region may have.
pub const MIN_CROP_SIZE: f32 = 0.1;

/// Tolerance for edge sums, so x + width = 1.0 passes despite float error.
const BOUNDS_TOLERANCE: f32 = 1e-4;

/// Check whether a normalized crop rectangle is usable.
///
/// Rejects rectangles smaller than [`MIN_CROP_SIZE`] in either dimension,
/// with a negative origin, or extending past the right/bottom edge.
pub fn validate_crop(rect: &CropRect) -> bool {
    let finite =
        rect.x.is_finite() && rect.y.is_finite() && rect.width.is_finite() && rect.height.is_finite();
    if !finite {
        return false;
    }
    if rect.width < MIN_CROP_SIZE || rect.height < MIN_CROP_SIZE {
        return false;
    }
    if rect.x < 0.0 || rect.y < 0.0 {
        return false;
    }
    rect.x + rect.width <= 1.0 + BOUNDS_TOLERANCE && rect.y + rect.height <= 1.0 + BOUNDS_TOLERANCE
}

/// Convert a normalized crop rectangle to pixel units for a given image size.
///
/// Coordinates are scaled, rounded to nearest, and then clamped so the
/// resulting rectangle always lies inside the bitmap and is never empty.
/// A zero-sized image yields [`PixelRect::ZERO`].
pub fn to_pixel_rect(rect: &CropRect, image_width: u32, image_height: u32) -> PixelRect {
    if image_width == 0 || image_height == 0 {
        return PixelRect::ZERO;
    }

    let scale_w = image_width as f32;
    let scale_h = image_height as f32;

    let x = (rect.x.clamp(0.0, 1.0) * scale_w).round() as u32;
    let y = (rect.y.clamp(0.0, 1.0) * scale_h).round() as u32;
    let width = (rect.width.clamp(0.0, 1.0) * scale_w).round() as u32;
    let height = (rect.height.clamp(0.0, 1.0) * scale_h).round() as u32;

    // Clamp the origin inside the image, then the extent to what remains.
    let x = x.min(image_width - 1);
    let y = y.min(image_height - 1);
    let width = width.clamp(1, image_width - x);
    let height = height.clamp(1, image_height - y);

    PixelRect {
        x,
        y,
        width,
        height,
    }
}

/// Extract the pixels within `rect` into a new bitmap.
///
/// The source bitmap is never mutated. `rect` is expected to come from
/// [`to_pixel_rect`] and therefore lie fully inside the source; this is a
/// programming contract, checked with debug assertions.
pub fn extract_crop(source: &Bitmap, rect: PixelRect) -> Bitmap {
    debug_assert!(rect.x + rect.width <= source.width, "crop exceeds width");
    debug_assert!(rect.y + rect.height <= source.height, "crop exceeds height");

    // Fast path: the full rect is just a copy.
    if rect.x == 0 && rect.y == 0 && rect.width == source.width && rect.height == source.height {
        return source.clone();
    }

    let row_bytes = rect.width as usize * BYTES_PER_PIXEL;
    let mut pixels = vec![0u8; rect.height as usize * row_bytes];

    for row in 0..rect.height as usize {
        let src_y = rect.y as usize + row;
        let src_start = (src_y * source.width as usize + rect.x as usize) * BYTES_PER_PIXEL;
        let dst_start = row * row_bytes;

        pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&source.pixels[src_start..src_start + row_bytes]);
    }

    Bitmap {
        width: rect.width,
        height: rect.height,
        pixels,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
