// src/host/local.rs

//! Minimal in-process host adapter.
//!
//! Useful when the "host" is a Rust program driving its own build passes:
//! it owns an optional [`ChangeTracker`] for watch mode and a plain
//! compilation record that collects file dependencies.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::host::watcher::ChangeTracker;
use crate::host::{Compilation, Host};

#[derive(Debug, Default)]
pub struct LocalHost {
    tracker: Option<ChangeTracker>,
}

impl LocalHost {
    /// A host without watch mode; every change query is empty.
    pub fn new() -> Self {
        Self { tracker: None }
    }

    pub fn with_tracker(tracker: ChangeTracker) -> Self {
        Self {
            tracker: Some(tracker),
        }
    }

    pub fn tracker(&self) -> Option<&ChangeTracker> {
        self.tracker.as_ref()
    }
}

impl Host for LocalHost {
    type Compilation = LocalCompilation;

    fn changed_files(&self) -> Vec<PathBuf> {
        match &self.tracker {
            Some(tracker) => tracker.take_changes().into_keys().collect(),
            None => Vec::new(),
        }
    }
}

/// Compilation record for [`LocalHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalCompilation {
    name: Option<String>,
    file_dependencies: BTreeSet<PathBuf>,
}

impl LocalCompilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            file_dependencies: BTreeSet::new(),
        }
    }

    pub fn file_dependencies(&self) -> &BTreeSet<PathBuf> {
        &self.file_dependencies
    }
}

impl Compilation for LocalCompilation {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.file_dependencies.insert(path.to_path_buf());
    }
}
