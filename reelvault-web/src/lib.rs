//! Reelvault Web - JSON API Server
//!
//! Pure JSON API server for library browsing, range-based video
//! streaming, and edit submission. The browser frontend is an external
//! consumer of this API and lives outside this crate.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, build_router, run_server};
