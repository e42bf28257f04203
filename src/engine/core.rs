// src/engine/core.rs

//! Pure lifecycle state machine.
//!
//! [`ControllerCore`] consumes lifecycle hooks and produces a list of
//! [`CoreCommand`]s describing what the plugin shell should do next. It owns
//! the first-run state and the compilation-name filter, and performs no IO:
//! no filesystem access, no callbacks, no host queries.
//!
//! The async shell ([`crate::engine::PrebuildPlugin`]) executes the commands
//! in order.

use crate::engine::PluginSettings;
use crate::engine::state::RunState;
use crate::types::LifecycleHook;

/// Command produced by the core, executed by the plugin shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// Drop the matched-files cache before doing anything else.
    ClearMatchCache,
    /// Resolve matched files and invoke the build callback. The shell
    /// acknowledges with [`ControllerCore::mark_built`] once the files are
    /// resolved, right before the callback runs.
    DispatchBuild,
    /// Ask the host for changed files, filter them against the pattern and
    /// invoke the watch callback if anything is left.
    InspectChanges,
    /// Resolve matched files (cache permitting), optionally registering
    /// each one as a file dependency of the compilation.
    ResolveMatches { register_dependencies: bool },
}

/// Decision returned by the core after handling a single hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// True when the compilation-name filter rejected this dispatch.
    pub skipped: bool,
}

impl CoreStep {
    fn run(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            skipped: false,
        }
    }

    fn skip() -> Self {
        Self {
            commands: Vec::new(),
            skipped: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControllerCore {
    state: RunState,
    watches_files: bool,
    add_files_as_dependencies: bool,
    clear_cache_on_update: bool,
    compilation_name_filter: Option<String>,
}

impl ControllerCore {
    pub fn new(settings: &PluginSettings) -> Self {
        Self {
            state: RunState::default(),
            watches_files: settings.files.has_pattern(),
            add_files_as_dependencies: settings.add_files_as_dependencies,
            clear_cache_on_update: settings.clear_cache_on_update,
            compilation_name_filter: settings.compilation_name_filter.clone(),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Whether hooks for a compilation with this name should run.
    ///
    /// Unnamed compilations always run, as does everything when no filter
    /// is configured.
    pub fn accepts(&self, compilation_name: Option<&str>) -> bool {
        match (compilation_name, self.compilation_name_filter.as_deref()) {
            (Some(name), Some(filter)) => name == filter,
            _ => true,
        }
    }

    /// Record that the build callback is about to run.
    ///
    /// Performs the `AwaitingFirstRun -> Running` transition; returns
    /// `false` if it already happened. Until this is called every
    /// `beforeRun` and `watchRun` keeps asking for a build, so a pass that
    /// fails while resolving files is retried on the next one.
    pub fn mark_built(&mut self) -> bool {
        self.state.claim_first_run()
    }

    /// Handle a single lifecycle hook.
    pub fn step(&mut self, hook: LifecycleHook, compilation_name: Option<&str>) -> CoreStep {
        if !self.accepts(compilation_name) {
            return CoreStep::skip();
        }

        match hook {
            LifecycleHook::BeforeRun => self.before_run(),
            LifecycleHook::WatchRun => self.watch_run(),
            LifecycleHook::Emit => self.emit(),
        }
    }

    fn before_run(&mut self) -> CoreStep {
        if self.state.is_first_run_pending() {
            CoreStep::run(vec![CoreCommand::DispatchBuild])
        } else {
            CoreStep::run(Vec::new())
        }
    }

    fn watch_run(&mut self) -> CoreStep {
        let mut commands = Vec::new();

        if self.clear_cache_on_update {
            commands.push(CoreCommand::ClearMatchCache);
        }

        // The first pass only builds; changed files are not looked at.
        if self.state.is_first_run_pending() {
            commands.push(CoreCommand::DispatchBuild);
        } else if self.watches_files {
            commands.push(CoreCommand::InspectChanges);
        }

        CoreStep::run(commands)
    }

    fn emit(&mut self) -> CoreStep {
        if !self.watches_files {
            return CoreStep::run(Vec::new());
        }
        CoreStep::run(vec![CoreCommand::ResolveMatches {
            register_dependencies: self.add_files_as_dependencies,
        }])
    }
}
