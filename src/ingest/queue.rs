//! Serialized ingestion queue.
//!
//! A single worker task drains an in-memory channel of queue items and runs
//! the processing pipeline on them one at a time, in enqueue order. Each
//! item's failure is caught and reported; nothing poisons the queue. The
//! queue holds no state beyond pending and in-flight items, so work queued
//! but not started is lost on shutdown and re-discovered by the next scan.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::{Candidate, ItemState, QueueItem};
use crate::pipeline::ProcessingPipeline;

/// Per-item progress notification, keyed by the candidate's path
#[derive(Debug, Clone)]
pub enum PipelineNotice {
    Started {
        path: PathBuf,
    },
    Succeeded {
        path: PathBuf,
        note_path: PathBuf,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
}

/// Cloneable, non-blocking entry point for the discovery side
#[derive(Clone)]
pub struct QueueHandle {
    tx: mpsc::UnboundedSender<QueueItem>,
}

impl QueueHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<QueueItem>) -> Self {
        Self { tx }
    }

    /// Enqueue a candidate. Never blocks; returns false once the queue has
    /// shut down.
    pub fn enqueue(&self, candidate: Candidate) -> bool {
        self.tx.send(QueueItem::new(candidate)).is_ok()
    }
}

/// The serialized admission point in front of the pipeline
pub struct IngestionQueue {
    handle: QueueHandle,
    worker: JoinHandle<()>,
}

impl IngestionQueue {
    /// Start the queue worker. Pipeline runs are serialized on this single
    /// task, which is what guarantees global concurrency of exactly one.
    pub fn start(
        pipeline: ProcessingPipeline,
        notices: mpsc::UnboundedSender<PipelineNotice>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(run_worker(pipeline, rx, notices));

        Self {
            handle: QueueHandle::new(tx),
            worker,
        }
    }

    /// A cloneable handle for enqueuing from the discovery side
    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }

    /// Enqueue a candidate directly
    pub fn enqueue(&self, candidate: Candidate) -> bool {
        self.handle.enqueue(candidate)
    }

    /// Close the queue and wait for the worker to drain remaining items
    pub async fn shutdown(self) {
        let Self { handle, worker } = self;
        drop(handle);
        if let Err(e) = worker.await {
            error!("Queue worker task failed: {}", e);
        }
    }
}

/// Worker loop: strictly first-enqueued-first-run, one item at a time
async fn run_worker(
    pipeline: ProcessingPipeline,
    mut rx: mpsc::UnboundedReceiver<QueueItem>,
    notices: mpsc::UnboundedSender<PipelineNotice>,
) {
    while let Some(mut item) = rx.recv().await {
        let path = item.candidate.path.clone();

        item.state = ItemState::Running;
        let _ = notices.send(PipelineNotice::Started { path: path.clone() });
        info!(file = %path.display(), "processing candidate");

        match pipeline.run(&item.candidate).await {
            Ok(done) => {
                item.state = ItemState::Succeeded;
                info!(
                    file = %path.display(),
                    note = %done.note_path.display(),
                    "candidate processed"
                );
                let _ = notices.send(PipelineNotice::Succeeded {
                    path,
                    note_path: done.note_path,
                });
            }
            Err(e) => {
                let reason = e.to_string();
                item.state = ItemState::Failed(reason.clone());
                error!(
                    file = %path.display(),
                    stage = e.stage(),
                    "processing failed: {}",
                    reason
                );
                let _ = notices.send(PipelineNotice::Failed { path, reason });
            }
        }
        // item is discarded here; terminal state was reported above
    }
}
