//! Background scheduling of adjustment runs.
//!
//! A single worker thread owns pipeline execution, so no two runs can ever
//! race on the processed slot. Submission never blocks: each request gets a
//! monotonically increasing sequence number, and only the job holding the
//! latest number may surface its result. Everything older is either skipped
//! before it starts (the worker collapses its backlog to the newest entry)
//! or abandoned at the next pipeline stage boundary.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use easel_core::{
    run_pipeline, AdjustmentParams, Bitmap, PipelineControl, PixelTransformExecutor,
};
use parking_lot::Mutex;

use crate::events::EventHub;
use crate::resources::ResourceManager;
use crate::EngineError;

/// Scheduler lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No job in flight.
    Idle,
    /// A job is executing and still eligible to surface its result.
    Running,
    /// The in-flight job has been superseded and will be abandoned at the
    /// next stage boundary.
    Cancelling,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_CANCELLING: u8 = 2;

fn decode_state(raw: u8) -> SchedulerState {
    match raw {
        STATE_RUNNING => SchedulerState::Running,
        STATE_CANCELLING => SchedulerState::Cancelling,
        _ => SchedulerState::Idle,
    }
}

/// Counters describing scheduler activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerMetrics {
    /// Jobs accepted by `submit`.
    pub submitted_jobs: u64,
    /// Jobs whose result was surfaced.
    pub completed_jobs: u64,
    /// Jobs superseded before or during execution.
    pub cancelled_jobs: u64,
}

/// A snapshot of one adjustment request.
struct Job {
    sequence: u64,
    params: AdjustmentParams,
    source: Arc<Bitmap>,
}

pub(crate) struct ProcessingScheduler {
    next_sequence: AtomicU64,
    latest_sequence: Arc<AtomicU64>,
    state: Arc<AtomicU8>,
    metrics: Arc<Mutex<SchedulerMetrics>>,
    submit_tx: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ProcessingScheduler {
    /// Spawn the worker thread and return the scheduler handle.
    pub fn start(
        resources: Arc<ResourceManager>,
        events: Arc<EventHub>,
        executor: Box<dyn PixelTransformExecutor>,
    ) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<Job>();
        let latest_sequence = Arc::new(AtomicU64::new(0));
        let state = Arc::new(AtomicU8::new(STATE_IDLE));
        let metrics = Arc::new(Mutex::new(SchedulerMetrics::default()));

        let worker = spawn_worker(
            submit_rx,
            resources,
            events,
            executor,
            Arc::clone(&latest_sequence),
            Arc::clone(&state),
            Arc::clone(&metrics),
        );

        Self {
            next_sequence: AtomicU64::new(0),
            latest_sequence,
            state,
            metrics,
            submit_tx: Mutex::new(Some(submit_tx)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue a job with the latest parameters. Any in-flight job is
    /// implicitly cancelled because it no longer holds the latest sequence.
    pub fn submit(&self, params: AdjustmentParams, source: Arc<Bitmap>) -> Result<(), EngineError> {
        let tx = self.submit_tx.lock();
        let Some(tx) = tx.as_ref() else {
            return Err(EngineError::WorkerGone);
        };

        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_sequence.store(sequence, Ordering::SeqCst);
        self.metrics.lock().submitted_jobs += 1;

        tx.send(Job {
            sequence,
            params,
            source,
        })
        .map_err(|_| EngineError::WorkerGone)
    }

    pub fn state(&self) -> SchedulerState {
        decode_state(self.state.load(Ordering::SeqCst))
    }

    pub fn metrics(&self) -> SchedulerMetrics {
        *self.metrics.lock()
    }

    /// Stop the worker: close the channel and wait for it to drain.
    pub fn shutdown(&self) {
        let sender = self.submit_tx.lock().take();
        drop(sender);
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProcessingScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Stage-boundary control for one job: cancelled as soon as the job is no
/// longer the latest, and forwarding progress only while it still is.
struct JobControl {
    sequence: u64,
    latest_sequence: Arc<AtomicU64>,
    state: Arc<AtomicU8>,
    events: Arc<EventHub>,
}

impl JobControl {
    fn is_superseded(&self) -> bool {
        self.sequence < self.latest_sequence.load(Ordering::SeqCst)
    }
}

impl PipelineControl for JobControl {
    fn is_cancelled(&self) -> bool {
        let superseded = self.is_superseded();
        if superseded {
            self.state.store(STATE_CANCELLING, Ordering::SeqCst);
        }
        superseded
    }

    fn on_progress(&self, fraction: f32) {
        if !self.is_superseded() {
            self.events.emit_progress(fraction);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_worker(
    submit_rx: mpsc::Receiver<Job>,
    resources: Arc<ResourceManager>,
    events: Arc<EventHub>,
    executor: Box<dyn PixelTransformExecutor>,
    latest_sequence: Arc<AtomicU64>,
    state: Arc<AtomicU8>,
    metrics: Arc<Mutex<SchedulerMetrics>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(mut job) = submit_rx.recv() {
            state.store(STATE_RUNNING, Ordering::SeqCst);

            // Collapse the backlog: only the newest request is worth running.
            while let Ok(next) = submit_rx.try_recv() {
                metrics.lock().cancelled_jobs += 1;
                job = next;
            }

            if job.sequence < latest_sequence.load(Ordering::SeqCst) {
                metrics.lock().cancelled_jobs += 1;
                state.store(STATE_IDLE, Ordering::SeqCst);
                continue;
            }

            let control = JobControl {
                sequence: job.sequence,
                latest_sequence: Arc::clone(&latest_sequence),
                state: Arc::clone(&state),
                events: Arc::clone(&events),
            };

            let output = if job.params.is_modified() {
                run_pipeline(&job.source, &job.params, executor.as_ref(), &control).map(Arc::new)
            } else {
                // No-op adjustments surface the original handle itself
                // instead of duplicating the buffer.
                Some(Arc::clone(&job.source))
            };

            match output {
                Some(bitmap) if job.sequence == latest_sequence.load(Ordering::SeqCst) => {
                    // Bookkeeping happens before the callbacks fire, so an
                    // observer woken by the completion event sees it settled.
                    resources.install_processed(Arc::clone(&bitmap));
                    metrics.lock().completed_jobs += 1;
                    state.store(STATE_IDLE, Ordering::SeqCst);
                    events.emit_progress(1.0);
                    events.emit_processed(&bitmap);
                }
                _ => {
                    metrics.lock().cancelled_jobs += 1;
                    state.store(STATE_IDLE, Ordering::SeqCst);
                }
            }
        }
        state.store(STATE_IDLE, Ordering::SeqCst);
    })
}
