//! End-to-end edit orchestration against the library sandbox.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use super::ffmpeg::{EditPlan, EngineReport, MediaEngine};
use super::filter_graph::TrimConcatGraph;
use super::segment::Segment;
use super::worker_pool::{EditWorkerPool, PoolStats};
use crate::config::EditingConfig;
use crate::library::VideoLibrary;
use crate::{ReelvaultError, Result};

/// What a completed edit produced.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Bare file name under the reserved output directory.
    pub output_file_name: String,
    /// Absolute path of the output file.
    pub output_path: PathBuf,
    /// Engine report for the run.
    pub report: EngineReport,
}

/// Coordinates sandbox checks, output naming, and engine execution.
pub struct EditOrchestrator {
    library: Arc<VideoLibrary>,
    pool: EditWorkerPool,
}

impl EditOrchestrator {
    /// Creates an orchestrator running edits on the given engine.
    pub fn new(
        library: Arc<VideoLibrary>,
        engine: Arc<dyn MediaEngine>,
        config: &EditingConfig,
    ) -> Self {
        let pool = EditWorkerPool::new(engine, config);
        Self { library, pool }
    }

    /// Runs one edit: trims the named source to `segments` and
    /// concatenates them into a new file under `edited/`.
    ///
    /// Blocks until the engine reports completion or failure. Output
    /// names carry an epoch-millisecond timestamp; two edits of the same
    /// source landing in the same millisecond would collide, a known
    /// limitation of the naming scheme.
    ///
    /// # Errors
    ///
    /// - `LibraryError::AccessDenied` - Source path escapes the library
    /// - `LibraryError::NotFound` - Source file does not exist
    /// - `EditingError::InvalidSegments` - Segment list is empty
    /// - `EditingError::EngineFailed` - Engine reported failure
    pub async fn submit_edit(
        &self,
        video_path: &str,
        segments: Vec<Segment>,
    ) -> Result<EditOutcome> {
        let graph = TrimConcatGraph::new(segments).map_err(ReelvaultError::Editing)?;

        let input = self.library.resolve_file(video_path).await?;
        let output_dir = self.library.ensure_output_dir().await?;

        let basename = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let output_file_name = format!("edited_{}_{basename}", Utc::now().timestamp_millis());
        let output_path = output_dir.join(&output_file_name);

        tracing::info!(
            "Edit requested: {video_path} ({} segments) -> {output_file_name}",
            graph.segment_count()
        );

        let report = self
            .pool
            .submit(EditPlan {
                input,
                output: output_path.clone(),
                graph,
            })
            .await
            .map_err(ReelvaultError::Editing)?;

        Ok(EditOutcome {
            output_file_name,
            output_path,
            report,
        })
    }

    /// Statistics of the underlying worker pool.
    ///
    /// # Errors
    ///
    /// - `EditingError::PoolShuttingDown` - Pool actor has exited
    pub async fn pool_stats(&self) -> Result<PoolStats> {
        self.pool.stats().await.map_err(ReelvaultError::Editing)
    }
}
