// src/lib.rs

//! Run a user-supplied build step before a host build system starts
//! bundling, and a watch step whenever a file matching a glob pattern
//! changes between incremental rebuilds.
//!
//! The host adapter forwards three lifecycle moments to
//! [`PrebuildPlugin`]:
//! - `beforeRun` / the first `watchRun`: resolve matched files, run `build`
//! - later `watchRun`s: filter the host's changed files, run `watch`
//! - `emit`: optionally register matched files as file dependencies

pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod host;
pub mod logging;
pub mod matcher;
pub mod types;

use std::path::Path;

use tracing::debug;

pub use engine::{PluginSettings, PrebuildOptions, PrebuildPlugin, RunState};
pub use errors::{PrebuildError, Result};
pub use host::{Compilation, Host};
pub use matcher::{MatchConfig, MatchOptions, MatchedFiles};
pub use types::LifecycleHook;

/// Load and validate a TOML config file and seed a [`PrebuildOptions`]
/// builder with it. Callbacks still have to be attached by the caller.
pub fn options_from_config<H: Host>(path: impl AsRef<Path>) -> Result<PrebuildOptions<H>> {
    let path = path.as_ref();
    let cfg = config::load_and_validate(path)?;
    debug!(config = ?path, pattern = ?cfg.pattern(), "loaded prebuild config");
    Ok(PrebuildOptions::from_settings(cfg.settings()))
}
