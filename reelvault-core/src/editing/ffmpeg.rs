//! Media engine abstraction for executing edit plans.
//!
//! The engine is the only delegation point to external software: it
//! receives a fully described transform (input, filter graph, output
//! target) and performs the actual decode/filter/encode work. Production
//! uses the ffmpeg binary; tests use a simulation engine.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;

use super::filter_graph::{OUTPUT_LABELS, TrimConcatGraph};
use super::{EditingError, EditingResult};

/// Complete description of one edit: where to read, what to do, where to write.
#[derive(Debug, Clone)]
pub struct EditPlan {
    /// Absolute path of the source file.
    pub input: PathBuf,
    /// Absolute path the engine must write the result to.
    pub output: PathBuf,
    /// The trim+concat transform to apply.
    pub graph: TrimConcatGraph,
}

/// What the engine reports after a successful run.
#[derive(Debug, Clone)]
pub struct EngineReport {
    /// Size of the output file in bytes.
    pub output_size: u64,
    /// Processing time in seconds.
    pub processing_time: f64,
}

/// Abstraction over the external media-processing engine.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Executes an edit plan, blocking until the engine completes.
    ///
    /// # Errors
    ///
    /// - `EditingError::SpawnFailed` - Engine process could not start
    /// - `EditingError::EngineFailed` - Engine ran and reported failure
    /// - `EditingError::IoError` - Output file inspection failed
    async fn execute(&self, plan: &EditPlan) -> EditingResult<EngineReport>;

    /// Check if the engine is installed and runnable.
    fn is_available(&self) -> bool;
}

/// Production engine driving the ffmpeg binary.
pub struct FfmpegMediaEngine {
    binary: PathBuf,
}

impl FfmpegMediaEngine {
    /// Creates an engine invoking the given ffmpeg binary.
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Verify the ffmpeg installation responds to `-version`.
    fn verify_installation(&self) -> EditingResult<()> {
        let result = std::process::Command::new(&self.binary)
            .arg("-version")
            .output();

        match result {
            Ok(output) if output.status.success() => Ok(()),
            Ok(_) => Err(EditingError::EngineFailed {
                reason: "ffmpeg binary found but returned error".to_string(),
            }),
            Err(_) => Err(EditingError::EngineFailed {
                reason: format!("ffmpeg binary not found: {}", self.binary.display()),
            }),
        }
    }
}

#[async_trait]
impl MediaEngine for FfmpegMediaEngine {
    async fn execute(&self, plan: &EditPlan) -> EditingResult<EngineReport> {
        let start_time = Instant::now();

        tracing::info!(
            "Starting ffmpeg edit: {} -> {}",
            plan.input.display(),
            plan.output.display()
        );

        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.arg("-y") // Overwrite output file
            .arg("-i")
            .arg(&plan.input)
            .arg("-filter_complex")
            .arg(plan.graph.filter_complex());

        for label in OUTPUT_LABELS {
            cmd.arg("-map").arg(format!("[{label}]"));
        }

        cmd.arg(&plan.output);

        tracing::debug!("Executing ffmpeg command: {:?}", cmd);

        let output = cmd.output().await.map_err(|e| {
            tracing::error!("Failed to execute ffmpeg: {}", e);
            EditingError::SpawnFailed {
                reason: format!("failed to execute ffmpeg: {e}"),
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stdout.is_empty() {
            tracing::debug!("ffmpeg stdout: {}", stdout);
        }
        if !stderr.is_empty() {
            tracing::debug!("ffmpeg stderr: {}", stderr);
        }

        if !output.status.success() {
            tracing::error!("ffmpeg failed with exit code {}: {}", output.status, stderr);
            return Err(EditingError::EngineFailed {
                reason: stderr.trim().to_string(),
            });
        }

        let output_size = tokio::fs::metadata(&plan.output)
            .await
            .map_err(|source| EditingError::IoError {
                operation: "stat edited output".to_string(),
                source,
            })?
            .len();

        let processing_time = start_time.elapsed().as_secs_f64();

        tracing::info!(
            "Edit complete: {} ({} bytes in {:.2}s)",
            plan.output.display(),
            output_size,
            processing_time
        );

        Ok(EngineReport {
            output_size,
            processing_time,
        })
    }

    fn is_available(&self) -> bool {
        self.verify_installation().is_ok()
    }
}

/// Simulation engine for tests.
///
/// Records every executed plan and writes a placeholder output file, or
/// fails with a configured message to exercise failure paths.
pub struct SimulationMediaEngine {
    fail_with: Option<String>,
    executed: Arc<Mutex<Vec<EditPlan>>>,
}

impl SimulationMediaEngine {
    /// Creates an engine that succeeds on every plan.
    pub fn new() -> Self {
        Self {
            fail_with: None,
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates an engine that fails every plan with the given message.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Plans executed so far, in submission order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn executed_plans(&self) -> Vec<EditPlan> {
        self.executed.lock().unwrap().clone()
    }
}

impl Default for SimulationMediaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaEngine for SimulationMediaEngine {
    async fn execute(&self, plan: &EditPlan) -> EditingResult<EngineReport> {
        if let Some(reason) = &self.fail_with {
            return Err(EditingError::EngineFailed {
                reason: reason.clone(),
            });
        }

        let placeholder = b"simulated edit output";
        tokio::fs::write(&plan.output, placeholder)
            .await
            .map_err(|source| EditingError::IoError {
                operation: "write simulated output".to_string(),
                source,
            })?;

        self.executed
            .lock()
            .expect("simulation engine lock poisoned")
            .push(plan.clone());

        Ok(EngineReport {
            output_size: placeholder.len() as u64,
            processing_time: 0.0,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::super::segment::Segment;
    use super::*;

    fn plan(dir: &std::path::Path) -> EditPlan {
        EditPlan {
            input: dir.join("input.mp4"),
            output: dir.join("output.mp4"),
            graph: TrimConcatGraph::new(vec![Segment::new("0", "5")]).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_simulation_engine_writes_output() {
        let dir = tempdir().unwrap();
        let engine = SimulationMediaEngine::new();

        let report = engine.execute(&plan(dir.path())).await.unwrap();
        assert!(report.output_size > 0);
        assert!(dir.path().join("output.mp4").exists());
        assert_eq!(engine.executed_plans().len(), 1);
    }

    #[tokio::test]
    async fn test_simulation_engine_failure_passes_reason_through() {
        let dir = tempdir().unwrap();
        let engine = SimulationMediaEngine::failing("no audio stream");

        let result = engine.execute(&plan(dir.path())).await;
        match result {
            Err(EditingError::EngineFailed { reason }) => assert_eq!(reason, "no audio stream"),
            other => panic!("expected engine failure, got {other:?}"),
        }
        assert!(engine.executed_plans().is_empty());
    }

    #[tokio::test]
    async fn test_ffmpeg_engine_spawn_failure() {
        let dir = tempdir().unwrap();
        let engine = FfmpegMediaEngine::new(PathBuf::from("/nonexistent/ffmpeg-binary"));

        assert!(!engine.is_available());
        assert!(matches!(
            engine.execute(&plan(dir.path())).await,
            Err(EditingError::SpawnFailed { .. })
        ));
    }
}
