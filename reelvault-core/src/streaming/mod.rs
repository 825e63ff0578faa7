//! HTTP byte-range streaming over library files.
//!
//! Serves a local file as an HTTP response honoring `Range` requests for
//! seekable playback. Bodies are produced as incremental chunk streams so
//! a file is never buffered whole in memory; backpressure comes from the
//! response write path polling the stream.

pub mod file_stream;
pub mod range;

use thiserror::Error;

pub use file_stream::FileStreamer;
pub use range::{parse_range_header, validate_range_bounds};

/// Errors that can occur during streaming operations.
#[derive(Debug, Error)]
pub enum StreamingError {
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

/// Result type for streaming operations.
pub type StreamingResult<T> = Result<T, StreamingError>;
