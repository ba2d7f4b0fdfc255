//! Pixel-transform execution strategies.
//!
//! The pipeline describes *what* happens to each pixel; an executor decides
//! *how* the buffer is traversed. Both implementations honor one contract:
//! the operation receives normalized RGB channels in [0, 1], and whatever it
//! returns is sanitized (non-finite values snap to a boundary, then clamp to
//! [0, 1]) before being quantized back to 8-bit storage. A stored pixel can
//! therefore never hold a NaN-derived or out-of-range value. Alpha passes
//! through untouched.

use crate::bitmap::BYTES_PER_PIXEL;
use rayon::prelude::*;

/// Per-pixel operation over normalized RGB channels.
pub type PixelOp<'a> = dyn Fn(f32, f32, f32) -> (f32, f32, f32) + Sync + 'a;

/// Strategy interface for running a per-pixel operation over an RGBA buffer.
pub trait PixelTransformExecutor: Send + Sync {
    fn run(&self, pixels: &mut [u8], op: &PixelOp);
}

/// Sequential traversal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarExecutor;

impl PixelTransformExecutor for ScalarExecutor {
    fn run(&self, pixels: &mut [u8], op: &PixelOp) {
        for chunk in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            transform_pixel(chunk, op);
        }
    }
}

/// Data-parallel traversal across worker threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelExecutor;

impl PixelTransformExecutor for ParallelExecutor {
    fn run(&self, pixels: &mut [u8], op: &PixelOp) {
        pixels
            .par_chunks_exact_mut(BYTES_PER_PIXEL)
            .for_each(|chunk| transform_pixel(chunk, op));
    }
}

#[inline]
fn transform_pixel(chunk: &mut [u8], op: &PixelOp) {
    let (r, g, b) = op(
        chunk[0] as f32 / 255.0,
        chunk[1] as f32 / 255.0,
        chunk[2] as f32 / 255.0,
    );
    chunk[0] = quantize(r);
    chunk[1] = quantize(g);
    chunk[2] = quantize(b);
    // chunk[3] is alpha and stays as-is.
}

/// Clamp a channel into [0, 1] and convert to 8-bit.
///
/// Non-finite values map to the nearest valid boundary (NaN to 0).
#[inline]
fn quantize(value: f32) -> u8 {
    let sanitized = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else if value > 0.0 {
        1.0
    } else {
        0.0
    };
    (sanitized * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_buffer(pixel_count: usize) -> Vec<u8> {
        (0..pixel_count * BYTES_PER_PIXEL)
            .map(|i| (i % 256) as u8)
            .collect()
    }

    #[test]
    fn test_identity_op_preserves_pixels() {
        let mut pixels = gradient_buffer(64);
        let original = pixels.clone();
        ScalarExecutor.run(&mut pixels, &|r, g, b| (r, g, b));
        assert_eq!(pixels, original);
    }

    #[test]
    fn test_alpha_untouched() {
        let mut pixels = vec![10, 20, 30, 77, 200, 100, 50, 128];
        ScalarExecutor.run(&mut pixels, &|_, _, _| (1.0, 1.0, 1.0));
        assert_eq!(pixels, vec![255, 255, 255, 77, 255, 255, 255, 128]);
    }

    #[test]
    fn test_out_of_range_results_clamped() {
        let mut pixels = vec![128, 128, 128, 255];
        ScalarExecutor.run(&mut pixels, &|_, _, _| (2.0, -1.0, 0.5));
        assert_eq!(&pixels[..3], &[255, 0, 128]);
    }

    #[test]
    fn test_non_finite_results_sanitized() {
        let mut pixels = vec![128, 128, 128, 255];
        ScalarExecutor.run(&mut pixels, &|_, _, _| {
            (f32::NAN, f32::INFINITY, f32::NEG_INFINITY)
        });
        assert_eq!(&pixels[..3], &[0, 255, 0]);
    }

    #[test]
    fn test_incomplete_trailing_bytes_ignored() {
        // 4 bytes = 1 complete pixel + 2 byte remainder.
        let mut pixels = vec![100, 100, 100, 255, 7, 7];
        ScalarExecutor.run(&mut pixels, &|_, _, _| (0.0, 0.0, 0.0));
        assert_eq!(pixels, vec![0, 0, 0, 255, 7, 7]);
    }

    #[test]
    fn test_parallel_matches_scalar() {
        let mut scalar = gradient_buffer(1024);
        let mut parallel = scalar.clone();
        let op = |r: f32, g: f32, b: f32| ((r * 0.5), (g * 1.5), (1.0 - b));

        ScalarExecutor.run(&mut scalar, &op);
        ParallelExecutor.run(&mut parallel, &op);
        assert_eq!(scalar, parallel);
    }
}
