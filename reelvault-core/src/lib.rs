//! Reelvault Core - Essential video-library functionality
//!
//! This crate provides the building blocks for the personal video-library
//! server: sandboxed library access and directory listing, byte-range file
//! streaming, edit orchestration against an external media engine, and
//! configuration management.

pub mod config;
pub mod editing;
pub mod library;
pub mod streaming;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::ReelvaultConfig;
pub use editing::{EditOrchestrator, EditingError, FfmpegMediaEngine, MediaEngine, Segment};
pub use library::{FileEntry, LibraryError, VideoLibrary};
pub use streaming::{FileStreamer, StreamingError};

/// Core errors that can bubble up from any Reelvault subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ReelvaultError {
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Streaming error: {0}")]
    Streaming(#[from] StreamingError),

    #[error("Editing error: {0}")]
    Editing(#[from] EditingError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelvaultError {
    /// Returns a user-friendly error message suitable for display.
    ///
    /// Library and streaming failures stay opaque so nothing about the
    /// filesystem outside the request's own path leaks; edit engine
    /// failures keep their message, which the API forwards as `details`.
    pub fn user_message(&self) -> String {
        match self {
            ReelvaultError::Library(e) => match e {
                LibraryError::AccessDenied => "Access denied".to_string(),
                LibraryError::NotFound { .. } => "Not found".to_string(),
                _ => "Failed to read directory".to_string(),
            },
            ReelvaultError::Streaming(_) => "Failed to stream video".to_string(),
            ReelvaultError::Editing(e) => match e {
                EditingError::InvalidSegments { reason } => format!("Invalid segments: {reason}"),
                EditingError::EngineFailed { reason } => reason.clone(),
                _ => "Failed to process video".to_string(),
            },
            ReelvaultError::Configuration { reason } => {
                format!("Configuration error: {reason}")
            }
            ReelvaultError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ReelvaultError::Library(LibraryError::AccessDenied)
                | ReelvaultError::Library(LibraryError::NotFound { .. })
                | ReelvaultError::Editing(EditingError::InvalidSegments { .. })
                | ReelvaultError::Configuration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ReelvaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_message_is_opaque() {
        let error = ReelvaultError::Library(LibraryError::AccessDenied);
        assert_eq!(error.user_message(), "Access denied");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_engine_failure_message_passes_through() {
        let error = ReelvaultError::Editing(EditingError::EngineFailed {
            reason: "no such filter: tirm".to_string(),
        });
        assert_eq!(error.user_message(), "no such filter: tirm");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_io_message_is_opaque() {
        let error = ReelvaultError::Io(std::io::Error::other("raw disk detail"));
        assert_eq!(error.user_message(), "File system error occurred");
    }
}
