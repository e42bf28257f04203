// src/host/watcher.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::errors::Result;

type MtimeMap = Arc<Mutex<BTreeMap<PathBuf, SystemTime>>>;

/// Records which files changed between watch passes.
///
/// Wraps a recursive `notify` watcher. Every create/modify event stores the
/// path with its last-modified time; [`take_changes`](Self::take_changes)
/// hands the accumulated map over and starts a fresh one. Dropping the
/// tracker stops file watching.
pub struct ChangeTracker {
    root: PathBuf,
    mtimes: MtimeMap,
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl ChangeTracker {
    /// Start watching `root` recursively.
    ///
    /// Must be called from within a Tokio runtime: events are forwarded from
    /// the notify callback into a spawned task that updates the map.
    pub fn spawn(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);

        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        eprintln!("prebuild: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("prebuild: file watch error: {err}");
                }
            },
            Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("change tracker started on {:?}", root);

        let mtimes: MtimeMap = Arc::new(Mutex::new(BTreeMap::new()));
        let task_mtimes = Arc::clone(&mtimes);

        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    continue;
                }
                debug!(?event, "recording changed paths");

                let mut map = task_mtimes.lock().unwrap_or_else(PoisonError::into_inner);
                for path in event.paths {
                    let Ok(meta) = std::fs::metadata(&path) else {
                        continue;
                    };
                    if !meta.is_file() {
                        continue;
                    }
                    let mtime = meta.modified().unwrap_or_else(|e| {
                        warn!("no mtime for {:?}: {}", path, e);
                        SystemTime::now()
                    });
                    map.insert(path, mtime);
                }
            }
            debug!("change tracker event loop finished");
        });

        Ok(Self {
            root,
            mtimes,
            _inner: watcher,
        })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Changes recorded so far, without clearing them.
    pub fn mtimes(&self) -> BTreeMap<PathBuf, SystemTime> {
        self.mtimes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hand over every change recorded since the last call.
    pub fn take_changes(&self) -> BTreeMap<PathBuf, SystemTime> {
        let mut map = self.mtimes.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *map)
    }
}
