//! Easel Core - reference-image adjustment algorithms
//!
//! This crate provides the pure image-processing half of Easel: color-space
//! conversion, tone adjustment, cropping, and the fixed-order adjustment
//! pipeline that combines them. Everything here is synchronous and free of
//! shared state; scheduling and bitmap ownership live in `easel-engine`.

pub mod bitmap;
pub mod color;
pub mod crop;
pub mod executor;
pub mod pipeline;
pub mod tone;

pub use bitmap::{Bitmap, PixelRect};
pub use crop::{extract_crop, to_pixel_rect, validate_crop, MIN_CROP_SIZE};
pub use executor::{ParallelExecutor, PixelTransformExecutor, ScalarExecutor};
pub use pipeline::{run_pipeline, NoControl, PipelineControl};

/// Threshold below which an adjustment value counts as "no change".
pub const PARAM_EPSILON: f32 = 0.01;

/// Crop rectangle in normalized coordinates.
///
/// All components are in [0, 1] relative to the image dimensions, with
/// (0, 0) at the top-left corner. The full image is (0, 0, 1, 1).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge (0.0 to 1.0).
    pub x: f32,
    /// Top edge (0.0 to 1.0).
    pub y: f32,
    /// Region width (0.0 to 1.0).
    pub width: f32,
    /// Region height (0.0 to 1.0).
    pub height: f32,
}

impl CropRect {
    /// The full-image rectangle.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rectangle covers the whole image (within [`PARAM_EPSILON`]).
    pub fn is_full(&self) -> bool {
        self.x.abs() < PARAM_EPSILON
            && self.y.abs() < PARAM_EPSILON
            && (self.width - 1.0).abs() < PARAM_EPSILON
            && (self.height - 1.0).abs() < PARAM_EPSILON
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Adjustment parameters for a single processing request.
///
/// Values outside the documented ranges are clamped by [`clamped`], never
/// rejected. All fields default to "no change".
///
/// [`clamped`]: AdjustmentParams::clamped
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdjustmentParams {
    /// Retained sub-region of the image.
    pub crop: CropRect,
    /// Exposure in photographic stops (-2 to 2).
    pub exposure: f32,
    /// Contrast (-1 to 1); scales deviation from mid-gray.
    pub contrast: f32,
    /// Hue shift in degrees (-180 to 180).
    pub hue: f32,
    /// Additive saturation shift (-1 to 1).
    pub saturation: f32,
}

impl AdjustmentParams {
    /// Create parameters with all values at their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with every field forced into its documented range.
    ///
    /// Non-finite values fall back to the field default rather than clamping,
    /// since NaN compares false against every bound.
    pub fn clamped(&self) -> Self {
        Self {
            crop: CropRect {
                x: sanitize(self.crop.x, 0.0, 1.0, 0.0),
                y: sanitize(self.crop.y, 0.0, 1.0, 0.0),
                width: sanitize(self.crop.width, 0.0, 1.0, 1.0),
                height: sanitize(self.crop.height, 0.0, 1.0, 1.0),
            },
            exposure: sanitize(self.exposure, -2.0, 2.0, 0.0),
            contrast: sanitize(self.contrast, -1.0, 1.0, 0.0),
            hue: sanitize(self.hue, -180.0, 180.0, 0.0),
            saturation: sanitize(self.saturation, -1.0, 1.0, 0.0),
        }
    }

    /// Whether the crop region differs from the full image.
    pub fn is_cropped(&self) -> bool {
        !self.crop.is_full()
    }

    /// Whether any field differs from its default beyond [`PARAM_EPSILON`].
    pub fn is_modified(&self) -> bool {
        self.is_cropped()
            || self.exposure.abs() > PARAM_EPSILON
            || self.contrast.abs() > PARAM_EPSILON
            || self.hue.abs() > PARAM_EPSILON
            || self.saturation.abs() > PARAM_EPSILON
    }
}

fn sanitize(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_not_modified() {
        let params = AdjustmentParams::new();
        assert!(!params.is_modified());
        assert!(!params.is_cropped());
    }

    #[test]
    fn test_params_modified_by_exposure() {
        let mut params = AdjustmentParams::new();
        params.exposure = 0.5;
        assert!(params.is_modified());
    }

    #[test]
    fn test_params_below_epsilon_not_modified() {
        let mut params = AdjustmentParams::new();
        params.exposure = 0.005;
        params.hue = 0.009;
        assert!(!params.is_modified());
    }

    #[test]
    fn test_params_modified_by_crop() {
        let mut params = AdjustmentParams::new();
        params.crop = CropRect::new(0.25, 0.25, 0.5, 0.5);
        assert!(params.is_cropped());
        assert!(params.is_modified());
    }

    #[test]
    fn test_clamped_forces_ranges() {
        let params = AdjustmentParams {
            crop: CropRect::new(-0.5, 2.0, 3.0, 0.5),
            exposure: 10.0,
            contrast: -5.0,
            hue: 400.0,
            saturation: -2.0,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.crop, CropRect::new(0.0, 1.0, 1.0, 0.5));
        assert_eq!(clamped.exposure, 2.0);
        assert_eq!(clamped.contrast, -1.0);
        assert_eq!(clamped.hue, 180.0);
        assert_eq!(clamped.saturation, -1.0);
    }

    #[test]
    fn test_clamped_replaces_non_finite() {
        let params = AdjustmentParams {
            crop: CropRect::new(f32::NAN, 0.0, f32::INFINITY, 1.0),
            exposure: f32::NAN,
            contrast: f32::NEG_INFINITY,
            hue: f32::INFINITY,
            saturation: f32::NAN,
        };
        let clamped = params.clamped();
        assert_eq!(clamped, AdjustmentParams::default());
    }

    #[test]
    fn test_in_range_values_unchanged() {
        let params = AdjustmentParams {
            crop: CropRect::new(0.1, 0.1, 0.8, 0.8),
            exposure: -1.5,
            contrast: 0.3,
            hue: -90.0,
            saturation: 0.7,
        };
        assert_eq!(params.clamped(), params);
    }

    #[test]
    fn test_crop_rect_full_detection() {
        assert!(CropRect::FULL.is_full());
        assert!(CropRect::new(0.005, 0.0, 0.999, 1.0).is_full());
        assert!(!CropRect::new(0.05, 0.0, 0.95, 1.0).is_full());
    }
}
