//! Trim-and-concatenate edit orchestration.
//!
//! An edit request names a source video and an ordered list of time
//! segments. The pipeline renders those segments into a typed filter
//! graph, hands the graph to an external media engine (ffmpeg in
//! production), and writes the result as a new file under the library's
//! reserved output directory. Concurrent engine invocations are
//! admission-controlled by a bounded worker pool.

pub mod ffmpeg;
pub mod filter_graph;
pub mod orchestrator;
pub mod segment;
pub mod worker_pool;

use thiserror::Error;

pub use ffmpeg::{EditPlan, EngineReport, FfmpegMediaEngine, MediaEngine, SimulationMediaEngine};
pub use filter_graph::TrimConcatGraph;
pub use orchestrator::{EditOrchestrator, EditOutcome};
pub use segment::Segment;
pub use worker_pool::{EditWorkerPool, JobId, PoolStats};

/// Errors that can occur during edit operations.
#[derive(Debug, Error)]
pub enum EditingError {
    /// The media engine ran but reported failure.
    #[error("Media engine failed: {reason}")]
    EngineFailed {
        /// Error message from the engine, passed through verbatim.
        reason: String,
    },

    /// The engine process could not be started at all.
    #[error("Process spawn failed: {reason}")]
    SpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },

    /// Segment list cannot describe a valid transform.
    #[error("Invalid segments: {reason}")]
    InvalidSegments {
        /// Why the segments were rejected.
        reason: String,
    },

    /// The job exceeded its allowed wall-clock time.
    #[error("Edit job timed out after {seconds} seconds")]
    JobTimeout {
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// Worker pool is shutting down and cannot accept work.
    #[error("Edit worker pool is shutting down")]
    PoolShuttingDown,

    /// I/O error occurred during a specific operation.
    #[error("IO error during {operation}: {source}")]
    IoError {
        /// Description of the operation that failed.
        operation: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for edit operations.
pub type EditingResult<T> = Result<T, EditingError>;
