//! Bounded, batched execution of file processing

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::processor::{FileProcessor, FileResult};
use crate::report::{FileFailure, ProcessReport};
use crate::topology::DistFile;

type TaskOutput = (DistFile, dler_fs::Result<FileResult>);

/// Runs a target's files in fixed-size batches, at most `concurrency` at a
/// time within a batch. A batch finishes before the next one starts.
///
/// Stopping never cancels a task mid-file: in-flight files are allowed to
/// finish and no further files are started. The stop flag may be shared by
/// schedulers of several targets.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    concurrency: usize,
    batch_size: usize,
    stop_on_error: bool,
    halted: Arc<AtomicBool>,
}

impl BatchScheduler {
    pub fn new(concurrency: usize, batch_size: usize, stop_on_error: bool) -> Self {
        Self {
            concurrency: concurrency.max(1),
            batch_size: batch_size.max(1),
            stop_on_error,
            halted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop starting new files, here and in every clone of this scheduler.
    pub fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Process every file, collecting per-file failures into the report.
    ///
    /// With `stop_on_error`, the first failure halts the scheduler, waits for
    /// files already in flight, and is returned as [`Error::FileIo`].
    pub async fn run(&self, files: Vec<DistFile>, processor: Arc<FileProcessor>) -> Result<ProcessReport> {
        let mut report = ProcessReport::default();
        let mut first_error: Option<Error> = None;
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        for (index, batch) in files.chunks(self.batch_size).enumerate() {
            if self.is_halted() {
                break;
            }
            debug!(batch = index, files = batch.len(), "starting batch");
            let mut tasks: JoinSet<TaskOutput> = JoinSet::new();

            for dist in batch.iter().cloned() {
                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::TaskFailed {
                        message: e.to_string(),
                    })?;
                if self.is_halted() {
                    break;
                }
                let processor = Arc::clone(&processor);
                tasks.spawn(async move {
                    let _permit = permit;
                    let result = processor.process(&dist).await;
                    (dist, result)
                });

                while let Some(joined) = tasks.try_join_next() {
                    self.record(joined, &mut report, &mut first_error);
                }
            }

            while let Some(joined) = tasks.join_next().await {
                self.record(joined, &mut report, &mut first_error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }

    fn record(
        &self,
        joined: std::result::Result<TaskOutput, JoinError>,
        report: &mut ProcessReport,
        first_error: &mut Option<Error>,
    ) {
        let (dist, result) = match joined {
            Ok(output) => output,
            Err(e) => {
                self.halt();
                first_error.get_or_insert(Error::TaskFailed {
                    message: e.to_string(),
                });
                return;
            }
        };

        match result {
            Ok(file) => {
                report.warnings += file.warnings;
                report.processed.extend(file.processed);
            }
            Err(source) if self.stop_on_error => {
                warn!(path = %dist.path, error = %source, "failed to process file, stopping");
                self.halt();
                first_error.get_or_insert(Error::FileIo {
                    path: dist.path,
                    source,
                });
            }
            Err(source) => {
                warn!(path = %dist.path, error = %source, "failed to process file");
                report.errors.push(FileFailure {
                    path: dist.path,
                    message: source.to_string(),
                });
            }
        }
    }
}
