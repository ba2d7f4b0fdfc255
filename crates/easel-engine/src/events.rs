//! Callback registration and dispatch.
//!
//! Handlers are invoked in registration order, from the worker thread that
//! surfaced the result, and must therefore be `Send + Sync`. Registration
//! returns a [`SubscriptionId`] that can be used to unsubscribe; disposal of
//! the engine clears every handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use easel_core::Bitmap;
use parking_lot::Mutex;

/// Identifier returned by callback registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ProcessedCallback = Arc<dyn Fn(&Arc<Bitmap>) + Send + Sync>;
type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;

#[derive(Default)]
pub(crate) struct EventHub {
    next_id: AtomicU64,
    processed: Mutex<Vec<(SubscriptionId, ProcessedCallback)>>,
    progress: Mutex<Vec<(SubscriptionId, ProgressCallback)>>,
}

impl EventHub {
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn on_processed(
        &self,
        callback: impl Fn(&Arc<Bitmap>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.processed.lock().push((id, Arc::new(callback)));
        id
    }

    pub fn on_progress(&self, callback: impl Fn(f32) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.progress.lock().push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.processed.lock().retain(|(sub, _)| *sub != id);
        self.progress.lock().retain(|(sub, _)| *sub != id);
    }

    pub fn clear(&self) {
        self.processed.lock().clear();
        self.progress.lock().clear();
    }

    pub fn emit_processed(&self, bitmap: &Arc<Bitmap>) {
        // Snapshot under the lock, invoke outside it so a handler may
        // subscribe or unsubscribe without deadlocking.
        let handlers: Vec<ProcessedCallback> = self
            .processed
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for handler in handlers {
            handler(bitmap);
        }
    }

    pub fn emit_progress(&self, fraction: f32) {
        let handlers: Vec<ProgressCallback> = self
            .progress
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for handler in handlers {
            handler(fraction);
        }
    }
}
