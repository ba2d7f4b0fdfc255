//! The fixed-order adjustment pipeline.
//!
//! Stages run in a fixed order per bitmap:
//!
//! 1. Crop
//! 2. Tone (exposure before contrast)
//! 3. Color (hue shift before saturation shift)
//!
//! Each stage operates on the output of the previous one, and stages whose
//! parameters are within [`PARAM_EPSILON`] of the default are skipped
//! entirely, so an all-default request reproduces the (possibly cropped)
//! input pixel for pixel.
//!
//! Between stages a [`PipelineControl`] is consulted: progress is reported
//! and a cooperative cancellation check decides whether to continue. The
//! pipeline always recomputes from the bitmap it is handed; it never
//! composes on top of a previously adjusted result.

use crate::bitmap::Bitmap;
use crate::color::{shift_hue, shift_saturation};
use crate::crop::{extract_crop, to_pixel_rect};
use crate::executor::PixelTransformExecutor;
use crate::tone::{apply_contrast, apply_exposure};
use crate::{AdjustmentParams, PARAM_EPSILON};

/// Progress fractions reported at the crop/tone/color stage boundaries.
/// The caller that surfaces the result reports the final 1.0.
const PROGRESS_CROP: f32 = 0.25;
const PROGRESS_TONE: f32 = 0.5;
const PROGRESS_COLOR: f32 = 0.75;

/// Cooperative control surface consulted at stage boundaries.
pub trait PipelineControl {
    /// Whether the run should be abandoned. Checked after every stage.
    fn is_cancelled(&self) -> bool {
        false
    }

    /// Called after each stage with the fraction of the pipeline completed.
    /// Reported even for skipped stages, so the sequence is monotone.
    fn on_progress(&self, _fraction: f32) {}
}

/// Control for synchronous callers: never cancels, discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoControl;

impl PipelineControl for NoControl {}

/// Run the adjustment pipeline over `source`.
///
/// Returns `None` when `control` reports cancellation at a stage boundary,
/// otherwise the fully adjusted bitmap. The source is never mutated.
pub fn run_pipeline(
    source: &Bitmap,
    params: &AdjustmentParams,
    executor: &dyn PixelTransformExecutor,
    control: &dyn PipelineControl,
) -> Option<Bitmap> {
    // Stage 1: crop.
    let mut working = if params.is_cropped() {
        let rect = to_pixel_rect(&params.crop, source.width, source.height);
        extract_crop(source, rect)
    } else {
        source.clone()
    };
    control.on_progress(PROGRESS_CROP);
    if control.is_cancelled() {
        return None;
    }

    // Stage 2: tone, exposure before contrast.
    let exposure = params.exposure;
    let contrast = params.contrast;
    if exposure.abs() > PARAM_EPSILON || contrast.abs() > PARAM_EPSILON {
        executor.run(&mut working.pixels, &|r, g, b| {
            let (r, g, b) = if exposure.abs() > PARAM_EPSILON {
                apply_exposure(r, g, b, exposure)
            } else {
                (r, g, b)
            };
            if contrast.abs() > PARAM_EPSILON {
                apply_contrast(r, g, b, contrast)
            } else {
                (r, g, b)
            }
        });
    }
    control.on_progress(PROGRESS_TONE);
    if control.is_cancelled() {
        return None;
    }

    // Stage 3: color, hue shift before saturation shift.
    let hue = params.hue;
    let saturation = params.saturation;
    if hue.abs() > PARAM_EPSILON || saturation.abs() > PARAM_EPSILON {
        executor.run(&mut working.pixels, &|r, g, b| {
            let (r, g, b) = if hue.abs() > PARAM_EPSILON {
                shift_hue(r, g, b, hue)
            } else {
                (r, g, b)
            };
            if saturation.abs() > PARAM_EPSILON {
                shift_saturation(r, g, b, saturation)
            } else {
                (r, g, b)
            }
        });
    }
    control.on_progress(PROGRESS_COLOR);
    if control.is_cancelled() {
        return None;
    }

    Some(working)
}
