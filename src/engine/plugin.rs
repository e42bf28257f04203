// src/engine/plugin.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::callbacks::{BuildCallback, PrebuildOptions, WatchCallback};
use crate::engine::core::{ControllerCore, CoreCommand};
use crate::engine::state::RunState;
use crate::errors::{PrebuildError, Result};
use crate::fs::FileSystem;
use crate::host::{Compilation, Host};
use crate::matcher::{MatchCache, MatchedFiles};
use crate::types::LifecycleHook;

/// Runs the user's build step before the first pass and the watch step on
/// relevant changes.
///
/// This is the IO shell around [`ControllerCore`]: the core decides what
/// happens for each hook, this struct resolves matched files, talks to the
/// host and awaits the user callbacks. Hooks must be invoked sequentially,
/// which `&mut self` enforces.
pub struct PrebuildPlugin<H: Host> {
    core: ControllerCore,
    cache: MatchCache,
    fs: Arc<dyn FileSystem>,
    build: BuildCallback<H>,
    watch: Option<WatchCallback<H>>,
}

impl<H: Host> fmt::Debug for PrebuildPlugin<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrebuildPlugin")
            .field("core", &self.core)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<H: Host> PrebuildPlugin<H> {
    pub const NAME: &'static str = "PrebuildPlugin";

    /// Build a plugin instance.
    ///
    /// Fails with [`PrebuildError::ConfigError`] when no build callback was
    /// supplied; nothing else is checked until a hook fires.
    pub fn new(options: PrebuildOptions<H>) -> Result<Self> {
        let (settings, build, watch, fs) = options.into_parts();

        let Some(build) = build else {
            return Err(PrebuildError::ConfigError(format!(
                "{} expects a build callback; please provide one",
                Self::NAME
            )));
        };

        Ok(Self {
            core: ControllerCore::new(&settings),
            cache: MatchCache::new(settings.files),
            fs,
            build,
            watch,
        })
    }

    pub fn run_state(&self) -> RunState {
        self.core.run_state()
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Files matching the configured pattern, served from cache when
    /// possible.
    pub fn matched_files(&mut self) -> Result<MatchedFiles> {
        self.cache.resolve(self.fs.as_ref())
    }

    /// Force the next [`matched_files`](Self::matched_files) to rescan.
    pub fn invalidate_matches(&mut self) {
        self.cache.invalidate();
    }

    /// Host `beforeRun` moment.
    pub async fn before_run(&mut self, host: &H, compilation: &mut H::Compilation) -> Result<()> {
        self.dispatch(LifecycleHook::BeforeRun, host, compilation).await
    }

    /// Host `watchRun` moment.
    pub async fn watch_run(&mut self, host: &H, compilation: &mut H::Compilation) -> Result<()> {
        self.dispatch(LifecycleHook::WatchRun, host, compilation).await
    }

    /// Host `emit` moment.
    pub async fn emit(&mut self, host: &H, compilation: &mut H::Compilation) -> Result<()> {
        self.dispatch(LifecycleHook::Emit, host, compilation).await
    }

    /// Run one lifecycle hook to completion.
    pub async fn dispatch(
        &mut self,
        hook: LifecycleHook,
        host: &H,
        compilation: &mut H::Compilation,
    ) -> Result<()> {
        let step = self.core.step(hook, compilation.name());
        if step.skipped {
            debug!(%hook, compilation = ?compilation.name(), "compilation filtered out; skipping");
            return Ok(());
        }

        debug!("running \"{hook}\" hook for compilation: {:?}", compilation.name());

        for command in step.commands {
            self.execute_command(command, host, compilation).await?;
        }
        Ok(())
    }

    async fn execute_command(
        &mut self,
        command: CoreCommand,
        host: &H,
        compilation: &mut H::Compilation,
    ) -> Result<()> {
        match command {
            CoreCommand::ClearMatchCache => {
                debug!("clearing matched files cache");
                self.cache.invalidate();
            }
            CoreCommand::DispatchBuild => {
                self.run_initial_build(host, compilation).await?;
            }
            CoreCommand::InspectChanges => {
                self.run_watch(host, compilation).await?;
            }
            CoreCommand::ResolveMatches {
                register_dependencies,
            } => {
                self.resolve_for_emit(compilation, register_dependencies)?;
            }
        }
        Ok(())
    }

    async fn run_initial_build(&mut self, host: &H, compilation: &mut H::Compilation) -> Result<()> {
        let files = self.matched_files()?;
        if !self.core.mark_built() {
            return Ok(());
        }
        info!(matched = files.len(), "running build callback");
        (self.build)(host, compilation, files)
            .await
            .map_err(PrebuildError::Callback)
    }

    async fn run_watch(&mut self, host: &H, compilation: &mut H::Compilation) -> Result<()> {
        let changed = host.changed_files();
        if changed.is_empty() {
            debug!("no changed files reported");
            return Ok(());
        }

        let relevant = self.cache.filter_changed(&changed)?;
        if relevant.is_empty() {
            debug!(changed = changed.len(), "no changed file matches the pattern");
            return Ok(());
        }

        let Some(watch) = &self.watch else {
            debug!(relevant = relevant.len(), "no watch callback configured");
            return Ok(());
        };

        info!(?relevant, "running watch callback");
        watch(host, compilation, relevant)
            .await
            .map_err(PrebuildError::Callback)
    }

    fn resolve_for_emit(
        &mut self,
        compilation: &mut H::Compilation,
        register_dependencies: bool,
    ) -> Result<()> {
        let files = self.matched_files()?;
        if files.is_empty() || !register_dependencies {
            return Ok(());
        }

        for path in files.iter() {
            compilation.add_file_dependency(path);
        }
        debug!(count = files.len(), "registered matched files as file dependencies");
        Ok(())
    }
}
