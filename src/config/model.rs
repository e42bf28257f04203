// src/config/model.rs

use std::path::Path;

use serde::Deserialize;

use crate::engine::PluginSettings;
use crate::matcher::{MatchConfig, MatchOptions};

/// Raw configuration as read from a TOML file.
///
/// ```toml
/// clear_cache_on_update = false
/// compilation_name_filter = "client"
///
/// [files]
/// pattern = "**/*.json"
/// add_files_as_dependencies = true
///
/// [files.options]
/// cwd = "fixtures/files"
/// ```
///
/// All keys are optional. Callbacks cannot be expressed in TOML; they are
/// attached afterwards through [`crate::engine::PrebuildOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Invalidate the matched-files cache on every watch pass.
    #[serde(default)]
    pub clear_cache_on_update: bool,

    /// Only act on the compilation with this name.
    #[serde(default)]
    pub compilation_name_filter: Option<String>,

    /// `[files]` section.
    #[serde(default)]
    pub files: FilesSection,
}

/// `[files]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    /// Glob pattern; absent or empty disables matching and watching.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Options passed to pattern evaluation (`[files.options]`).
    #[serde(default)]
    pub options: MatchOptions,

    /// Register matched files as file dependencies on `emit`.
    #[serde(default)]
    pub add_files_as_dependencies: bool,
}

/// Validated configuration. Built through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    clear_cache_on_update: bool,
    compilation_name_filter: Option<String>,
    files: FilesSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        clear_cache_on_update: bool,
        compilation_name_filter: Option<String>,
        files: FilesSection,
    ) -> Self {
        Self {
            clear_cache_on_update,
            compilation_name_filter,
            files,
        }
    }

    pub fn files(&self) -> &FilesSection {
        &self.files
    }

    pub fn pattern(&self) -> Option<&str> {
        self.files.pattern.as_deref()
    }

    pub fn clear_cache_on_update(&self) -> bool {
        self.clear_cache_on_update
    }

    pub fn compilation_name_filter(&self) -> Option<&str> {
        self.compilation_name_filter.as_deref()
    }

    /// Anchor a relative `[files.options].cwd` at `dir`.
    pub fn resolve_cwd_against(&mut self, dir: &Path) {
        if let Some(cwd) = &self.files.options.cwd {
            if cwd.is_relative() {
                self.files.options.cwd = Some(dir.join(cwd));
            }
        }
    }

    /// Convert into the settings consumed by the plugin.
    pub fn settings(&self) -> PluginSettings {
        PluginSettings {
            files: MatchConfig::new(self.files.pattern.clone(), self.files.options.clone()),
            add_files_as_dependencies: self.files.add_files_as_dependencies,
            clear_cache_on_update: self.clear_cache_on_update,
            compilation_name_filter: self.compilation_name_filter.clone(),
        }
    }
}
