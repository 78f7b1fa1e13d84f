//! Shared test utilities for the dler workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for source and distribution trees

pub mod project;

pub use project::TestProject;
