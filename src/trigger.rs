//! Fire-and-forget trigger for ingestion runs.
//!
//! [`IngestionTrigger::run_ingestion`] spawns a run onto the tokio runtime
//! and returns a [`RunStarted`] acknowledgment straight away. The caller gets
//! no verdict: a run's effect is observed by querying the store afterwards,
//! and its progress only through logs.
//!
//! # Timeout and cancellation
//!
//! - Each HTTP request is bounded by the fetcher's request timeout.
//! - Each run is bounded by `run_timeout`; when it elapses the run is dropped
//!   at its current await point. Records already written stay written.
//! - [`RunStarted::abort_handle`] cancels a run explicitly (the CLI does so
//!   on Ctrl-C).
//!
//! Overlapping runs are allowed; the store's uniqueness constraint keeps
//! them from persisting the same article twice.

use crate::pipeline::Pipeline;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::timeout;
use tracing::{Instrument, error, info, info_span, warn};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Starts ingestion runs in the background.
#[derive(Clone)]
pub struct IngestionTrigger {
    pipeline: Arc<Pipeline>,
    run_timeout: Duration,
}

impl IngestionTrigger {
    pub fn new(pipeline: Arc<Pipeline>, run_timeout: Duration) -> Self {
        Self {
            pipeline,
            run_timeout,
        }
    }

    /// Start a run and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run_ingestion(&self) -> RunStarted {
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
        let started_at = Utc::now();
        let pipeline = Arc::clone(&self.pipeline);
        let run_timeout = self.run_timeout;

        let task = async move {
            match timeout(run_timeout, pipeline.run()).await {
                Ok(summary) => info!(
                    stored = summary.stored,
                    candidates = summary.candidates,
                    "Ingestion run finished"
                ),
                Err(_) => warn!(
                    timeout_secs = run_timeout.as_secs(),
                    "Ingestion run exceeded its timeout and was abandoned"
                ),
            }
        };
        let handle = tokio::spawn(task.instrument(info_span!("ingestion_run", run_id)));

        info!(run_id, %started_at, "Ingestion run started");
        RunStarted {
            run_id,
            started_at,
            handle,
        }
    }
}

/// Acknowledgment that a run was started.
#[derive(Debug)]
pub struct RunStarted {
    pub run_id: u64,
    pub started_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

impl RunStarted {
    /// Handle that cancels the run when aborted.
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Wait for the background task to end (finished, timed out, or aborted).
    ///
    /// Dropping a `RunStarted` instead detaches the run; it keeps going.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            if e.is_cancelled() {
                warn!(run_id = self.run_id, "Ingestion run was cancelled");
            } else {
                error!(run_id = self.run_id, error = %e, "Ingestion run panicked");
            }
        }
    }
}
