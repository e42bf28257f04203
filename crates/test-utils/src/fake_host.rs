use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use prebuild::host::{Compilation, Host};

/// A scripted host:
/// - each `changed_files()` call pops the next queued change set
///   (empty once the queue runs dry)
/// - counts how often the plugin asked for changes.
#[derive(Debug, Default)]
pub struct FakeHost {
    passes: Mutex<VecDeque<Vec<PathBuf>>>,
    queries: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the change set reported by the next `changed_files()` call.
    pub fn push_changes<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths = paths.into_iter().map(Into::into).collect();
        self.passes.lock().unwrap().push_back(paths);
    }

    /// How many times the plugin queried for changed files.
    pub fn change_queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Host for FakeHost {
    type Compilation = FakeCompilation;

    fn changed_files(&self) -> Vec<PathBuf> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.passes.lock().unwrap().pop_front().unwrap_or_default()
    }
}

/// Compilation that records every dependency registration, duplicates
/// included.
#[derive(Debug, Clone, Default)]
pub struct FakeCompilation {
    name: Option<String>,
    dependencies: Vec<PathBuf>,
}

impl FakeCompilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            dependencies: Vec::new(),
        }
    }

    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }
}

impl Compilation for FakeCompilation {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.dependencies.push(path.to_path_buf());
    }
}

/// Shared record of callback invocations and the files each one received.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, files: &[PathBuf]) {
        self.calls.lock().unwrap().push(files.to_vec());
    }

    pub fn calls(&self) -> Vec<Vec<PathBuf>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}
