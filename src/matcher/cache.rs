// src/matcher/cache.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::matcher::patterns::{MatchConfig, PatternMatcher};

/// Read-only view of the paths matched by the configured pattern.
///
/// Cache hits hand out clones of the same `Arc`, so callers can compare
/// results with [`Arc::ptr_eq`].
pub type MatchedFiles = Arc<[PathBuf]>;

/// Memoized pattern evaluation.
///
/// The first [`resolve`](MatchCache::resolve) scans the filesystem; later
/// calls return the stored result until [`invalidate`](MatchCache::invalidate)
/// is called. Nothing here watches the filesystem, so files added after the
/// first scan only show up after an explicit invalidation.
#[derive(Debug, Default)]
pub struct MatchCache {
    config: MatchConfig,
    matcher: Option<PatternMatcher>,
    cached: Option<MatchedFiles>,
}

impl MatchCache {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            matcher: None,
            cached: None,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Whether a resolved result is currently stored.
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Return the matched files, scanning the filesystem on a cache miss.
    ///
    /// Without a pattern this returns an empty list and touches nothing.
    pub fn resolve(&mut self, fs: &dyn FileSystem) -> Result<MatchedFiles> {
        if let Some(files) = &self.cached {
            return Ok(Arc::clone(files));
        }

        let Some(matcher) = self.matcher()? else {
            return Ok(empty());
        };

        debug!(pattern = matcher.pattern(), root = ?matcher.root(), "start: get matched files");
        let files: MatchedFiles = matcher.scan(fs)?.into();
        debug!(count = files.len(), "finish: get matched files");

        self.cached = Some(Arc::clone(&files));
        Ok(files)
    }

    /// Drop the stored result so the next `resolve` rescans.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!("cleared matched files cache");
        }
    }

    /// Keep the members of `changed` that match the pattern.
    ///
    /// Uses the same compiled matcher as `resolve`. Without a pattern
    /// nothing matches.
    pub fn filter_changed(&mut self, changed: &[PathBuf]) -> Result<Vec<PathBuf>> {
        match self.matcher()? {
            Some(matcher) => Ok(matcher.filter(changed)),
            None => Ok(Vec::new()),
        }
    }

    fn matcher(&mut self) -> Result<Option<&PatternMatcher>> {
        let Some(pattern) = self.config.pattern() else {
            return Ok(None);
        };
        if self.matcher.is_none() {
            self.matcher = Some(PatternMatcher::compile(pattern, self.config.options())?);
        }
        Ok(self.matcher.as_ref())
    }
}

fn empty() -> MatchedFiles {
    Arc::from(Vec::new())
}
