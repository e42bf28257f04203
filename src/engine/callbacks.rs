// src/engine/callbacks.rs

//! User callbacks and the options builder that carries them.
//!
//! Callbacks are boxed closures returning a boxed future, so both async and
//! synchronous work fit behind one signature:
//!
//! ```no_run
//! use prebuild::engine::PrebuildOptions;
//! use prebuild::host::LocalHost;
//!
//! let options = PrebuildOptions::<LocalHost>::new()
//!     .pattern("content/**/*.md")
//!     .build(|_host, _compilation, files| {
//!         Box::pin(async move {
//!             println!("{} content files", files.len());
//!             anyhow::Ok(())
//!         })
//!     })
//!     .watch_sync(|_host, _compilation, changed| {
//!         println!("changed: {changed:?}");
//!         Ok(())
//!     });
//! ```

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::engine::PluginSettings;
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::Host;
use crate::matcher::{MatchConfig, MatchOptions, MatchedFiles};

/// Future returned by user callbacks.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Invoked once with the matched files before the first build pass.
pub type BuildCallback<H> = Box<
    dyn for<'a> Fn(&'a H, &'a mut <H as Host>::Compilation, MatchedFiles) -> HookFuture<'a>
        + Send
        + Sync,
>;

/// Invoked on later watch passes with the changed files that match.
pub type WatchCallback<H> = Box<
    dyn for<'a> Fn(&'a H, &'a mut <H as Host>::Compilation, Vec<PathBuf>) -> HookFuture<'a>
        + Send
        + Sync,
>;

/// Everything needed to construct a [`crate::engine::PrebuildPlugin`].
pub struct PrebuildOptions<H: Host> {
    settings: PluginSettings,
    build: Option<BuildCallback<H>>,
    watch: Option<WatchCallback<H>>,
    fs: Arc<dyn FileSystem>,
}

impl<H: Host> fmt::Debug for PrebuildOptions<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrebuildOptions")
            .field("settings", &self.settings)
            .field("build", &self.build.is_some())
            .field("watch", &self.watch.is_some())
            .field("fs", &self.fs)
            .finish()
    }
}

impl<H: Host> Default for PrebuildOptions<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> PrebuildOptions<H> {
    pub fn new() -> Self {
        Self::from_settings(PluginSettings::default())
    }

    /// Seed the builder from settings loaded from a config file.
    pub fn from_settings(settings: PluginSettings) -> Self {
        Self {
            settings,
            build: None,
            watch: None,
            fs: Arc::new(RealFileSystem),
        }
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Required. Runs before the first build pass.
    pub fn build<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a H, &'a mut H::Compilation, MatchedFiles) -> HookFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.build = Some(Box::new(f));
        self
    }

    /// Synchronous variant of [`build`](Self::build).
    pub fn build_sync<F>(self, f: F) -> Self
    where
        F: Fn(&H, &mut H::Compilation, &[PathBuf]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.build(move |host, compilation, files| {
            let result = f(host, compilation, &files);
            Box::pin(std::future::ready(result))
        })
    }

    /// Optional. Runs when files matching the pattern change in watch mode.
    pub fn watch<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a H, &'a mut H::Compilation, Vec<PathBuf>) -> HookFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.watch = Some(Box::new(f));
        self
    }

    /// Synchronous variant of [`watch`](Self::watch).
    pub fn watch_sync<F>(self, f: F) -> Self
    where
        F: Fn(&H, &mut H::Compilation, &[PathBuf]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.watch(move |host, compilation, changed| {
            let result = f(host, compilation, &changed);
            Box::pin(std::future::ready(result))
        })
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        let options = self.settings.files.options().clone();
        self.settings.files = MatchConfig::new(Some(pattern.into()), options);
        self
    }

    pub fn match_options(mut self, options: MatchOptions) -> Self {
        let pattern = self.settings.files.pattern().map(str::to_string);
        self.settings.files = MatchConfig::new(pattern, options);
        self
    }

    pub fn files(mut self, files: MatchConfig) -> Self {
        self.settings.files = files;
        self
    }

    pub fn add_files_as_dependencies(mut self, val: bool) -> Self {
        self.settings.add_files_as_dependencies = val;
        self
    }

    pub fn clear_cache_on_update(mut self, val: bool) -> Self {
        self.settings.clear_cache_on_update = val;
        self
    }

    pub fn compilation_name_filter(mut self, name: impl Into<String>) -> Self {
        self.settings.compilation_name_filter = Some(name.into());
        self
    }

    /// Filesystem used for pattern evaluation (defaults to the real one).
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        PluginSettings,
        Option<BuildCallback<H>>,
        Option<WatchCallback<H>>,
        Arc<dyn FileSystem>,
    ) {
        (self.settings, self.build, self.watch, self.fs)
    }
}
