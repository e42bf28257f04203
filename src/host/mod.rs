// src/host/mod.rs

//! Capabilities the plugin needs from the host build system.
//!
//! The engine never reaches into host internals. A host adapter implements
//! [`Host`] and [`Compilation`] and forwards its lifecycle moments to
//! [`crate::engine::PrebuildPlugin`].

use std::path::{Path, PathBuf};

pub mod local;
pub mod watcher;

pub use local::{LocalCompilation, LocalHost};
pub use watcher::ChangeTracker;

/// The host build system as seen from the plugin.
pub trait Host: Send + Sync {
    /// Per-pass compilation handle handed to every hook.
    type Compilation: Compilation;

    /// Paths whose modification time changed since the previous watch pass.
    fn changed_files(&self) -> Vec<PathBuf>;
}

/// A single compilation (one target of one build pass).
pub trait Compilation: Send {
    /// Name of the compilation target, if the host assigns one.
    fn name(&self) -> Option<&str>;

    /// Register `path` as an input so changes to it trigger a rebuild.
    fn add_file_dependency(&mut self, path: &Path);
}
