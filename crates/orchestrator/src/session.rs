//! Live session driver
//!
//! A single-consumer channel carries incoming audio chunks; one dedicated
//! task per session drives the pipeline so chunks are processed in arrival
//! order and the session's quote/shabad context stays consistent.

use crate::orchestrator::Orchestrator;
use katha_core::ProcessedSegment;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One audio chunk from a live stream.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    /// 16 kHz mono samples.
    pub samples: Arc<[f32]>,
    pub start: f64,
    pub end: f64,
}

/// Handle to a running live session.
///
/// Push chunks as they arrive; drop or [`finish`](LiveSession::finish) to
/// end the session. Segments are delivered through the orchestrator's event
/// stream and collected for the final result.
pub struct LiveSession {
    chunk_tx: mpsc::Sender<StreamChunk>,
    task: JoinHandle<Vec<ProcessedSegment>>,
}

impl LiveSession {
    /// Spawn a session task bound to one session id.
    pub fn spawn(orchestrator: Arc<Orchestrator>, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        let (chunk_tx, mut chunk_rx) = mpsc::channel::<StreamChunk>(64);

        let task = tokio::spawn(async move {
            let mut segments = Vec::new();
            while let Some(chunk) = chunk_rx.recv().await {
                let segment = orchestrator
                    .process_stream_chunk(&session_id, chunk.samples, chunk.start, chunk.end)
                    .await;
                segments.push(segment);
            }
            orchestrator.reset_session().await;
            tracing::info!(
                session_id = %session_id,
                segments = segments.len(),
                "live session ended"
            );
            segments
        });

        Self { chunk_tx, task }
    }

    /// Enqueue a chunk. Returns false when the session task has stopped.
    pub async fn push(&self, samples: Arc<[f32]>, start: f64, end: f64) -> bool {
        self.chunk_tx
            .send(StreamChunk {
                samples,
                start,
                end,
            })
            .await
            .is_ok()
    }

    /// Close the input and wait for all queued chunks to finish.
    /// Returns the session's segments in processing order.
    pub async fn finish(self) -> Vec<ProcessedSegment> {
        drop(self.chunk_tx);
        self.task.await.unwrap_or_default()
    }
}
