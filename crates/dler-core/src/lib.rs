//! Directive engine for bundled distribution trees
//!
//! Source files carry comment directives such as `// <dler-remove-line>`.
//! After a bundler has produced `dist-npm/`, `dist-jsr/` or `dist-libs/`,
//! this crate finds the directive-bearing sources, maps each one to the
//! distribution files built from it, resets those files to their source
//! bytes, and applies the directives in place.
//!
//! # Architecture
//!
//! ```text
//!                 dler-cli
//!                    |
//!                dler-core
//!                    |
//!          +---------+---------+
//!          |                   |
//!       dler-fs         dler-directives
//! ```
//!
//! A run flows through these stages:
//!
//! - **Targets**: [`validate_targets`] parses and checks the requested trees
//! - **Discovery**: [`discover_sources`] walks the source tree once
//! - **Topology**: [`TopologyResolver`] expands targets into existing files
//! - **Processing**: [`BatchScheduler`] runs a [`FileProcessor`] per file
//!
//! # Example
//!
//! ```no_run
//! use dler_core::{ProcessOptions, process_directives};
//!
//! # async fn example() -> dler_core::Result<()> {
//! let report = process_directives("/path/to/project", &["dist-npm"], ProcessOptions::default()).await?;
//! for path in report.paths() {
//!     println!("{path}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod options;
pub mod processor;
pub mod report;
pub mod scheduler;
pub mod target;
pub mod topology;
pub mod walker;

pub use cache::RunCache;
pub use engine::{DirectiveEngine, process_directives};
pub use error::{Error, Result, TargetError};
pub use freshness::{FreshContent, FreshnessSync};
pub use options::{CONFIG_FILE_NAMES, DirectivesSection, EngineConfig, ProcessOptions, ProjectConfig};
pub use processor::{FileProcessor, FileResult};
pub use report::{FileAction, FileFailure, ProcessReport, ProcessedFile};
pub use scheduler::BatchScheduler;
pub use target::{DIST_JSR, DIST_LIBS, DIST_NPM, DistTarget, validate_targets};
pub use topology::{DistFile, TargetKind, TopologyResolver};
pub use walker::{SourceFile, discover_sources};
