//! Easel Engine - asynchronous adjustment engine for an overlaid reference image
//!
//! This crate wraps the pure algorithms in `easel-core` with everything a
//! live preview needs: a background worker that recomputes without blocking
//! the caller, last-write-wins scheduling for overlapping requests, guarded
//! ownership of the original and processed bitmaps, and a callback surface
//! for completion and progress events.
//!
//! # Usage
//!
//! ```ignore
//! let engine = AdjustmentEngine::default();
//! engine.on_processed_image(|bitmap| upload_to_preview(bitmap));
//!
//! engine.set_original_image(decoded);
//! let mut params = AdjustmentParams::default();
//! params.exposure = 0.7;
//! engine.apply_adjustments(&params)?;
//! ```
//!
//! Adjustments always recompute from the original image; repeated calls do
//! not compose on top of each other.

mod events;
mod resources;
mod scheduler;

pub use easel_core::{AdjustmentParams, Bitmap, CropRect, PixelRect};
pub use events::SubscriptionId;
pub use scheduler::{SchedulerMetrics, SchedulerState};

use std::sync::Arc;

use easel_core::{
    validate_crop, ParallelExecutor, PixelTransformExecutor, ScalarExecutor,
};
use thiserror::Error;

use events::EventHub;
use resources::ResourceManager;
use scheduler::ProcessingScheduler;

/// Which execution strategy the pipeline runs on.
///
/// Both paths satisfy the identical pipeline contract; the engine is
/// agnostic to the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPath {
    /// Sequential per-pixel traversal.
    Scalar,
    /// Rayon-parallel traversal.
    #[default]
    Parallel,
}

/// Errors surfaced by engine entry points.
///
/// Every variant is locally recoverable; entry points warn and refuse
/// rather than panic on expected misuse.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `apply_adjustments` was called before `set_original_image`.
    #[error("no original image has been set")]
    NoImage,

    /// The crop rectangle failed validation; previous parameters were kept.
    #[error("crop rectangle failed validation")]
    InvalidCrop,

    /// The background worker has been shut down.
    #[error("background worker is no longer running")]
    WorkerGone,
}

/// The adjustment engine facade.
///
/// Owns the original and processed bitmaps, the background worker, and the
/// registered callbacks. Dropping the engine (or calling [`shutdown`]) stops
/// the worker and releases everything.
///
/// [`shutdown`]: AdjustmentEngine::shutdown
pub struct AdjustmentEngine {
    resources: Arc<ResourceManager>,
    events: Arc<EventHub>,
    scheduler: ProcessingScheduler,
}

impl AdjustmentEngine {
    pub fn new(path: ExecutionPath) -> Self {
        let executor: Box<dyn PixelTransformExecutor> = match path {
            ExecutionPath::Scalar => Box::new(ScalarExecutor),
            ExecutionPath::Parallel => Box::new(ParallelExecutor),
        };
        Self::with_executor(executor)
    }

    /// Build an engine around a custom execution strategy.
    pub fn with_executor(executor: Box<dyn PixelTransformExecutor>) -> Self {
        let resources = Arc::new(ResourceManager::default());
        let events = Arc::new(EventHub::default());
        let scheduler =
            ProcessingScheduler::start(Arc::clone(&resources), Arc::clone(&events), executor);
        Self {
            resources,
            events,
            scheduler,
        }
    }

    /// Store a new original image and schedule a default-parameter run so a
    /// processed image becomes available immediately.
    ///
    /// An empty bitmap is ignored with a warning.
    pub fn set_original_image(&self, bitmap: Bitmap) {
        if bitmap.is_empty() {
            tracing::warn!("ignoring empty bitmap passed to set_original_image");
            return;
        }
        let original = self.resources.set_original(bitmap);
        if self
            .scheduler
            .submit(AdjustmentParams::default(), original)
            .is_err()
        {
            tracing::warn!("set_original_image: background worker is gone");
        }
    }

    /// Schedule an adjustment run with the given parameters.
    ///
    /// Numeric fields are clamped into their documented ranges. The crop
    /// rectangle is validated as submitted, before any clamping: an invalid
    /// one rejects the whole request and keeps the previously accepted
    /// parameters. Never blocks: the run executes on the background worker
    /// and surfaces through the registered callbacks.
    pub fn apply_adjustments(&self, params: &AdjustmentParams) -> Result<(), EngineError> {
        let Some(original) = self.resources.original() else {
            tracing::warn!("apply_adjustments called before set_original_image");
            return Err(EngineError::NoImage);
        };

        if !validate_crop(&params.crop) {
            tracing::warn!(
                "rejecting invalid crop area ({}, {}, {}, {})",
                params.crop.x,
                params.crop.y,
                params.crop.width,
                params.crop.height
            );
            return Err(EngineError::InvalidCrop);
        }

        let params = params.clamped();
        self.resources.set_params(params.clone());
        self.scheduler.submit(params, original)
    }

    /// Restore default parameters and schedule the equivalent run.
    pub fn reset_adjustments(&self) -> Result<(), EngineError> {
        self.apply_adjustments(&AdjustmentParams::default())
    }

    /// The crop rectangle of `params` in pixel units for the current
    /// original image. Returns the all-zero rectangle when no image is set.
    pub fn pixel_crop_rect(&self, params: &AdjustmentParams) -> PixelRect {
        self.resources.pixel_crop_rect(params)
    }

    /// Snapshot of the most recently surfaced processed bitmap.
    pub fn processed_image(&self) -> Option<Arc<Bitmap>> {
        self.resources.processed()
    }

    /// The most recently accepted adjustment parameters.
    pub fn current_params(&self) -> AdjustmentParams {
        self.resources.params()
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn metrics(&self) -> SchedulerMetrics {
        self.scheduler.metrics()
    }

    /// Register a callback fired exactly once per surfaced completion,
    /// carrying the new processed bitmap. Runs on the worker thread.
    pub fn on_processed_image(
        &self,
        callback: impl Fn(&Arc<Bitmap>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.events.on_processed(callback)
    }

    /// Register a callback fired at each stage boundary of the surfaced
    /// job with monotonically increasing progress in [0, 1].
    pub fn on_progress(&self, callback: impl Fn(f32) + Send + Sync + 'static) -> SubscriptionId {
        self.events.on_progress(callback)
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }

    /// Stop the worker, drop all callbacks, and release both bitmaps.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
        self.events.clear();
        self.resources.clear();
    }
}

impl Default for AdjustmentEngine {
    fn default() -> Self {
        Self::new(ExecutionPath::default())
    }
}

impl Drop for AdjustmentEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
