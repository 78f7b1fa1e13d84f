//! Filesystem abstraction for the dler directive engine
//!
//! Provides slash-normalized path handling, async I/O with path-carrying
//! errors, binary sniffing, and format-agnostic config loading.

pub mod binary;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use binary::{has_binary_extension, is_binary};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
