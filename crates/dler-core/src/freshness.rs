//! Freshness sync: evaluate a distribution file from its canonical source bytes
//!
//! Every evaluation starts from source content rather than from whatever an
//! earlier run or the bundler left behind, which is what makes reruns
//! idempotent. The source bytes only replace the distribution file through
//! the processor's single final write. Files without a resolvable source are
//! evaluated as they are on disk; repeated runs over such files are not
//! guaranteed to be idempotent.

use dler_fs::{NormalizedPath, io};
use tracing::debug;

use crate::topology::TopologyResolver;

/// Content to evaluate for one distribution file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshContent {
    pub bytes: Vec<u8>,
    /// Source the bytes came from, if one was resolved
    pub source: Option<NormalizedPath>,
}

impl FreshContent {
    /// Whether the bytes came from a source that differs from `current`.
    pub fn replaces(&self, current: &[u8]) -> bool {
        self.source.is_some() && self.bytes != current
    }
}

#[derive(Debug, Clone)]
pub struct FreshnessSync {
    resolver: TopologyResolver,
    enabled: bool,
}

impl FreshnessSync {
    pub fn new(resolver: TopologyResolver, enabled: bool) -> Self {
        Self { resolver, enabled }
    }

    /// Pick the bytes to evaluate for `dist`, whose on-disk content is
    /// `current`. Nothing is written.
    pub async fn refresh(&self, dist: &NormalizedPath, current: &[u8]) -> dler_fs::Result<FreshContent> {
        let on_disk = || FreshContent {
            bytes: current.to_vec(),
            source: None,
        };

        if !self.enabled {
            return Ok(on_disk());
        }

        let Some(source) = self.resolver.resolve_source(dist).await else {
            debug!(path = %dist, "no source counterpart, evaluating on-disk content");
            return Ok(on_disk());
        };

        let bytes = io::read_bytes(&self.resolver.root().join(source.as_str())).await?;
        Ok(FreshContent {
            bytes,
            source: Some(source),
        })
    }
}
