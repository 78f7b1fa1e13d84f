//! Command implementations for dler-cli

pub mod directives;

pub use directives::run_directives;
