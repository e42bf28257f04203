// src/engine/mod.rs

//! Lifecycle controller.
//!
//! This module ties together:
//! - the first-run state machine ([`state`])
//! - the pure decision core that maps hooks to commands ([`core`])
//! - user callbacks and the options builder ([`callbacks`])
//! - the async plugin shell that executes commands ([`plugin`])

use crate::matcher::MatchConfig;

/// Non-callback plugin settings, fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSettings {
    /// Pattern and evaluation options. No pattern disables matching.
    pub files: MatchConfig,
    /// Register matched files as file dependencies on `emit`.
    pub add_files_as_dependencies: bool,
    /// Drop the matched-files cache at the start of every watch pass.
    pub clear_cache_on_update: bool,
    /// Only act on the compilation with this name.
    pub compilation_name_filter: Option<String>,
}

pub mod callbacks;
pub mod core;
pub mod plugin;
pub mod state;

pub use callbacks::{BuildCallback, HookFuture, PrebuildOptions, WatchCallback};
pub use core::{ControllerCore, CoreCommand, CoreStep};
pub use plugin::PrebuildPlugin;
pub use state::RunState;
