//! Integration tests for Reelvault
//!
//! These tests drive the production router in-process, end to end:
//! request in, JSON or byte stream out, with a simulated media engine
//! standing in for ffmpeg.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/api_files.rs"]
mod api_files;

#[path = "integration/api_streaming.rs"]
mod api_streaming;

#[path = "integration/api_edit.rs"]
mod api_edit;
