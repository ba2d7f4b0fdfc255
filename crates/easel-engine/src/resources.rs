//! Ownership of the original and processed bitmaps.
//!
//! The original bitmap is immutable for as long as it is set; the processed
//! slot is the only state mutated on completion and is guarded by a mutex so
//! a consumer can never observe a partially-written bitmap. A no-op
//! adjustment run surfaces the original handle itself (`Arc::clone`), so the
//! aliasing case cannot double-free by construction: the buffer lives until
//! the last handle drops.

use std::sync::Arc;

use easel_core::{to_pixel_rect, AdjustmentParams, Bitmap, PixelRect};
use parking_lot::Mutex;

#[derive(Default)]
pub(crate) struct ResourceManager {
    original: Mutex<Option<Arc<Bitmap>>>,
    processed: Mutex<Option<Arc<Bitmap>>>,
    params: Mutex<AdjustmentParams>,
}

impl ResourceManager {
    /// Store a new original image, dropping any processed result computed
    /// against the previous one and resetting parameters to default.
    pub fn set_original(&self, bitmap: Bitmap) -> Arc<Bitmap> {
        let original = Arc::new(bitmap);
        *self.original.lock() = Some(Arc::clone(&original));
        *self.processed.lock() = None;
        *self.params.lock() = AdjustmentParams::default();
        original
    }

    pub fn original(&self) -> Option<Arc<Bitmap>> {
        self.original.lock().clone()
    }

    pub fn processed(&self) -> Option<Arc<Bitmap>> {
        self.processed.lock().clone()
    }

    /// Swap in a new processed bitmap. The previous handle drops here unless
    /// something else still holds it (the original, or a consumer snapshot).
    pub fn install_processed(&self, bitmap: Arc<Bitmap>) {
        *self.processed.lock() = Some(bitmap);
    }

    pub fn set_params(&self, params: AdjustmentParams) {
        *self.params.lock() = params;
    }

    pub fn params(&self) -> AdjustmentParams {
        self.params.lock().clone()
    }

    /// The crop rectangle of `params` in pixel units for the current
    /// original image, or the all-zero rectangle when no image is set.
    pub fn pixel_crop_rect(&self, params: &AdjustmentParams) -> PixelRect {
        match self.original.lock().as_ref() {
            Some(image) => to_pixel_rect(&params.crop, image.width, image.height),
            None => PixelRect::ZERO,
        }
    }

    /// Release both bitmaps; used on engine teardown.
    pub fn clear(&self) {
        *self.original.lock() = None;
        *self.processed.lock() = None;
    }
}
