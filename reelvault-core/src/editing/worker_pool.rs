//! Bounded worker pool for edit jobs.
//!
//! Edit execution forks an external ffmpeg process, so unbounded
//! concurrency would let a burst of requests contend for every core and
//! disk head at once. The pool runs at most `max_workers` engine
//! invocations concurrently and queues the rest in FIFO order. Callers
//! submit a plan and await its outcome, so the HTTP contract stays
//! blocking while concurrency is admission-controlled underneath.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::ffmpeg::{EditPlan, EngineReport, MediaEngine};
use super::{EditingError, EditingResult};
use crate::config::EditingConfig;

/// Unique identifier for edit jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl JobId {
    /// Create new job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One queued edit job.
#[derive(Debug)]
struct EditJob {
    id: JobId,
    plan: EditPlan,
    created_at: Instant,
}

/// Outcome delivered to the submitter.
pub type JobOutcome = EditingResult<EngineReport>;

/// Command messages for the pool actor.
enum PoolCommand {
    Submit {
        job: EditJob,
        result_tx: oneshot::Sender<JobOutcome>,
    },
    Stats {
        result_tx: oneshot::Sender<PoolStats>,
    },
    Shutdown,
}

/// Pool statistics snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Jobs currently executing.
    pub active_workers: usize,
    /// Jobs waiting for a worker slot.
    pub queued_jobs: usize,
    /// Configured concurrency cap.
    pub max_workers: usize,
    /// Jobs finished successfully since startup.
    pub completed_jobs: u64,
    /// Jobs finished with an error since startup.
    pub failed_jobs: u64,
}

/// Handle to the edit worker pool.
pub struct EditWorkerPool {
    command_tx: mpsc::UnboundedSender<PoolCommand>,
    _handle: tokio::task::JoinHandle<()>,
}

impl EditWorkerPool {
    /// Spawns the pool actor for the given engine and configuration.
    pub fn new(engine: Arc<dyn MediaEngine>, config: &EditingConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let max_workers = config.max_workers.max(1);
        let job_timeout = config.job_timeout;

        let handle = tokio::spawn(async move {
            let mut pool = PoolActor::new(engine, max_workers, job_timeout, command_rx);
            pool.run().await;
        });

        Self {
            command_tx,
            _handle: handle,
        }
    }

    /// Submits a plan and awaits its outcome.
    ///
    /// The call resolves once the job has run (or timed out), however
    /// long it waited in the queue first.
    ///
    /// # Errors
    ///
    /// - `EditingError::PoolShuttingDown` - Pool no longer accepts work
    /// - Any `EditingError` the engine reported for this job
    pub async fn submit(&self, plan: EditPlan) -> JobOutcome {
        let job = EditJob {
            id: JobId::new(),
            plan,
            created_at: Instant::now(),
        };
        let (result_tx, result_rx) = oneshot::channel();

        self.command_tx
            .send(PoolCommand::Submit { job, result_tx })
            .map_err(|_| EditingError::PoolShuttingDown)?;

        result_rx.await.map_err(|_| EditingError::PoolShuttingDown)?
    }

    /// Current pool statistics.
    ///
    /// # Errors
    ///
    /// - `EditingError::PoolShuttingDown` - Pool actor has exited
    pub async fn stats(&self) -> EditingResult<PoolStats> {
        let (result_tx, result_rx) = oneshot::channel();

        self.command_tx
            .send(PoolCommand::Stats { result_tx })
            .map_err(|_| EditingError::PoolShuttingDown)?;

        result_rx.await.map_err(|_| EditingError::PoolShuttingDown)
    }

    /// Shuts the pool down. Queued jobs are dropped; their submitters
    /// observe `PoolShuttingDown`.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(PoolCommand::Shutdown);
    }
}

/// Internal pool actor owning the queue and the active-job count.
struct PoolActor {
    engine: Arc<dyn MediaEngine>,
    max_workers: usize,
    job_timeout: Duration,
    command_rx: mpsc::UnboundedReceiver<PoolCommand>,
    completion_tx: mpsc::UnboundedSender<bool>,
    completion_rx: mpsc::UnboundedReceiver<bool>,
    queue: VecDeque<(EditJob, oneshot::Sender<JobOutcome>)>,
    active: usize,
    completed_jobs: u64,
    failed_jobs: u64,
}

impl PoolActor {
    fn new(
        engine: Arc<dyn MediaEngine>,
        max_workers: usize,
        job_timeout: Duration,
        command_rx: mpsc::UnboundedReceiver<PoolCommand>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            max_workers,
            job_timeout,
            command_rx,
            completion_tx,
            completion_rx,
            queue: VecDeque::new(),
            active: 0,
            completed_jobs: 0,
            failed_jobs: 0,
        }
    }

    async fn run(&mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(PoolCommand::Submit { job, result_tx }) => {
                            self.queue.push_back((job, result_tx));
                            self.dispatch();
                        }
                        Some(PoolCommand::Stats { result_tx }) => {
                            let _ = result_tx.send(self.stats());
                        }
                        Some(PoolCommand::Shutdown) | None => {
                            tracing::debug!("Edit worker pool shutting down");
                            break;
                        }
                    }
                }
                Some(success) = self.completion_rx.recv() => {
                    self.active -= 1;
                    if success {
                        self.completed_jobs += 1;
                    } else {
                        self.failed_jobs += 1;
                    }
                    self.dispatch();
                }
            }
        }
    }

    /// Starts queued jobs while worker slots are free.
    fn dispatch(&mut self) {
        while self.active < self.max_workers {
            let Some((job, result_tx)) = self.queue.pop_front() else {
                break;
            };
            self.active += 1;

            let engine = Arc::clone(&self.engine);
            let completion_tx = self.completion_tx.clone();
            let timeout = self.job_timeout;

            tokio::spawn(async move {
                tracing::debug!(
                    "Starting edit job {} (queued for {:?})",
                    job.id,
                    job.created_at.elapsed()
                );

                let outcome = match tokio::time::timeout(timeout, engine.execute(&job.plan)).await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(EditingError::JobTimeout {
                        seconds: timeout.as_secs(),
                    }),
                };

                let success = outcome.is_ok();
                if let Err(e) = &outcome {
                    tracing::warn!("Edit job {} failed: {e}", job.id);
                }

                // Submitter may have gone away; the completion signal
                // must still free the worker slot.
                let _ = result_tx.send(outcome);
                let _ = completion_tx.send(success);
            });
        }
    }

    fn stats(&self) -> PoolStats {
        PoolStats {
            active_workers: self.active,
            queued_jobs: self.queue.len(),
            max_workers: self.max_workers,
            completed_jobs: self.completed_jobs,
            failed_jobs: self.failed_jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::super::ffmpeg::SimulationMediaEngine;
    use super::super::filter_graph::TrimConcatGraph;
    use super::super::segment::Segment;
    use super::*;

    fn plan(dir: &std::path::Path, name: &str) -> EditPlan {
        EditPlan {
            input: dir.join("input.mp4"),
            output: dir.join(name),
            graph: TrimConcatGraph::new(vec![Segment::new("0", "1")]).unwrap(),
        }
    }

    fn config(max_workers: usize) -> EditingConfig {
        EditingConfig {
            max_workers,
            job_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Engine that tracks its own peak concurrency.
    struct ConcurrencyProbeEngine {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ConcurrencyProbeEngine {
        fn new() -> Self {
            Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaEngine for ConcurrencyProbeEngine {
        async fn execute(&self, _plan: &EditPlan) -> EditingResult<EngineReport> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(EngineReport {
                output_size: 0,
                processing_time: 0.02,
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_submit_runs_job_to_completion() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(SimulationMediaEngine::new());
        let pool = EditWorkerPool::new(engine.clone(), &config(2));

        let report = pool.submit(plan(dir.path(), "out.mp4")).await.unwrap();
        assert!(report.output_size > 0);

        let stats = pool.stats().await.unwrap();
        assert_eq!(stats.completed_jobs, 1);
        assert_eq!(stats.failed_jobs, 0);
        assert_eq!(stats.active_workers, 0);
    }

    #[tokio::test]
    async fn test_engine_failure_reaches_submitter_and_counts() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(SimulationMediaEngine::failing("boom"));
        let pool = EditWorkerPool::new(engine, &config(1));

        let outcome = pool.submit(plan(dir.path(), "out.mp4")).await;
        assert!(matches!(outcome, Err(EditingError::EngineFailed { .. })));

        let stats = pool.stats().await.unwrap();
        assert_eq!(stats.failed_jobs, 1);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_max_workers() {
        let dir = tempdir().unwrap();
        let engine = Arc::new(ConcurrencyProbeEngine::new());
        let pool = EditWorkerPool::new(engine.clone(), &config(2));

        let submissions: Vec<_> = (0..6)
            .map(|i| pool.submit(plan(dir.path(), &format!("out{i}.mp4"))))
            .collect();
        for outcome in futures::future::join_all(submissions).await {
            outcome.unwrap();
        }

        assert!(engine.peak.load(Ordering::SeqCst) <= 2);
        let stats = pool.stats().await.unwrap();
        assert_eq!(stats.completed_jobs, 6);
    }

    #[tokio::test]
    async fn test_timeout_produces_job_timeout_error() {
        struct StallingEngine;

        #[async_trait]
        impl MediaEngine for StallingEngine {
            async fn execute(&self, _plan: &EditPlan) -> EditingResult<EngineReport> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                unreachable!("job should have timed out")
            }

            fn is_available(&self) -> bool {
                true
            }
        }

        let dir = tempdir().unwrap();
        let pool = EditWorkerPool::new(
            Arc::new(StallingEngine),
            &EditingConfig {
                max_workers: 1,
                job_timeout: Duration::from_millis(20),
                ..Default::default()
            },
        );

        let outcome = pool.submit(plan(dir.path(), "out.mp4")).await;
        assert!(matches!(outcome, Err(EditingError::JobTimeout { .. })));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_work() {
        let dir = tempdir().unwrap();
        let pool = EditWorkerPool::new(Arc::new(SimulationMediaEngine::new()), &config(1));

        pool.shutdown();
        // Give the actor a moment to process the shutdown command.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let outcome = pool.submit(plan(dir.path(), "out.mp4")).await;
        assert!(matches!(outcome, Err(EditingError::PoolShuttingDown)));
    }
}
