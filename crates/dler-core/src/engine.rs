//! Directive engine orchestration
//!
//! A run validates targets, discovers directive-bearing sources once, expands
//! every target into existing distribution files, and only then starts
//! processing. Targets run concurrently up to `targets_concurrency`; files
//! within a target go through a [`BatchScheduler`]. A stop-on-error failure
//! halts every target's scheduler; files already written stay written.

use std::sync::Arc;

use dler_fs::NormalizedPath;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::cache::RunCache;
use crate::error::{Error, Result};
use crate::freshness::FreshnessSync;
use crate::options::{EngineConfig, ProcessOptions};
use crate::processor::FileProcessor;
use crate::report::{FileAction, ProcessReport};
use crate::scheduler::BatchScheduler;
use crate::target::validate_targets;
use crate::topology::{DistFile, TopologyResolver};
use crate::walker::discover_sources;

/// Applies source directives to distribution trees under one project root
#[derive(Debug, Clone)]
pub struct DirectiveEngine {
    config: EngineConfig,
}

impl DirectiveEngine {
    pub fn new(mut config: EngineConfig) -> Self {
        config.options = config.options.normalized();
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every directive for the given targets.
    ///
    /// Target errors are returned before any filesystem access. Discovery
    /// errors are returned before any file is written. An empty target list
    /// is a no-op.
    pub async fn run<S: AsRef<str>>(&self, targets: &[S]) -> Result<ProcessReport> {
        let targets = validate_targets(targets)?;
        let options = &self.config.options;
        let mut report = ProcessReport {
            dry_run: options.dry_run,
            ..ProcessReport::default()
        };

        if targets.is_empty() {
            info!("no targets requested");
            return Ok(report);
        }

        let root = self.config.root.clone();
        let cache = Arc::new(RunCache::new(root.clone(), options.exclude.clone()));
        let sources = discover_sources(&root, &self.config.source_dir, &cache).await?;
        if sources.is_empty() {
            info!(source_dir = %self.config.source_dir, "no directive-bearing sources found");
            return Ok(report);
        }

        let resolver = TopologyResolver::new(root.clone(), self.config.source_dir.clone(), Arc::clone(&cache));
        let mut expanded: Vec<Vec<DistFile>> = Vec::with_capacity(targets.len());
        for target in &targets {
            expanded.push(resolver.expand(target, &sources).await?);
        }

        let freshness = FreshnessSync::new(resolver, options.copy_fresh_from_source);
        let processor = Arc::new(FileProcessor::new(root, freshness, options.dry_run));
        let scheduler = BatchScheduler::new(options.concurrency, options.batch_size, options.stop_on_error);

        let semaphore = Arc::new(Semaphore::new(options.targets_concurrency));
        let mut tasks: JoinSet<Result<ProcessReport>> = JoinSet::new();

        for files in expanded.into_iter().filter(|files| !files.is_empty()) {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| Error::TaskFailed {
                    message: e.to_string(),
                })?;
            if scheduler.is_halted() {
                break;
            }
            let processor = Arc::clone(&processor);
            let scheduler = scheduler.clone();
            tasks.spawn(async move {
                let _permit = permit;
                scheduler.run(files, processor).await
            });
        }

        // Running targets are drained, never aborted
        let mut first_error: Option<Error> = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| Error::TaskFailed {
                message: e.to_string(),
            });
            match outcome.and_then(|inner| inner) {
                Ok(target_report) => report.merge(target_report),
                Err(e) => {
                    scheduler.halt();
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(error) = first_error {
            return Err(error);
        }

        report.sort();
        debug!(directory_scans = cache.directory_scans(), "run cache statistics");
        info!(
            modified = report.count(FileAction::Modified),
            removed = report.count(FileAction::Removed),
            errors = report.errors.len(),
            warnings = report.warnings,
            dry_run = report.dry_run,
            "directive processing finished"
        );
        Ok(report)
    }
}

/// Run directives under `root` with explicit options and the default source
/// directory.
pub async fn process_directives<S: AsRef<str>>(
    root: impl Into<NormalizedPath>,
    targets: &[S],
    options: ProcessOptions,
) -> Result<ProcessReport> {
    DirectiveEngine::new(EngineConfig::new(root).with_options(options))
        .run(targets)
        .await
}
