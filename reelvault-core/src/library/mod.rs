//! Sandboxed access to the video library directory tree.
//!
//! All filesystem paths that enter the system are relative to a single
//! library root. The sandbox guarantees that no operation can read, write,
//! or report the existence of anything outside that root.

pub mod listing;
pub mod sandbox;

use thiserror::Error;

pub use listing::{FileEntry, VideoLibrary};
pub use sandbox::SandboxRoot;

/// Errors that can occur while accessing the library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Requested path resolves outside the library root.
    ///
    /// Deliberately carries no path detail so nothing about the
    /// filesystem outside the sandbox leaks to clients.
    #[error("Access denied: path escapes the library root")]
    AccessDenied,

    /// Requested file or directory does not exist.
    #[error("Entry not found: {path}")]
    NotFound {
        /// Library-relative path that was requested.
        path: String,
    },

    /// Listing was requested for something that is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// Library-relative path that was requested.
        path: String,
    },

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

/// Result type for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
