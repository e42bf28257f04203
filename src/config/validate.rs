// src/config/validate.rs

use crate::config::model::{ConfigFile, FilesSection, RawConfigFile};
use crate::errors::{PrebuildError, Result};
use crate::matcher::validate_patterns;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PrebuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let RawConfigFile {
            clear_cache_on_update,
            compilation_name_filter,
            mut files,
        } = raw;

        normalize_pattern(&mut files);
        validate_files(&files)?;
        validate_name_filter(compilation_name_filter.as_deref())?;

        Ok(ConfigFile::new_unchecked(
            clear_cache_on_update,
            compilation_name_filter,
            files,
        ))
    }
}

/// Validate a raw config without consuming it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    let mut files = cfg.files.clone();
    normalize_pattern(&mut files);
    validate_files(&files)?;
    validate_name_filter(cfg.compilation_name_filter.as_deref())
}

// An empty pattern means the same as no pattern.
fn normalize_pattern(files: &mut FilesSection) {
    if files.pattern.as_deref().is_some_and(|p| p.trim().is_empty()) {
        files.pattern = None;
    }
}

fn validate_files(files: &FilesSection) -> Result<()> {
    validate_patterns(files.pattern.as_deref(), &files.options)
        .map_err(|e| PrebuildError::ConfigError(format!("[files]: {e}")))?;

    if files.pattern.is_none() && files.add_files_as_dependencies {
        tracing::warn!("[files].add_files_as_dependencies has no effect without a pattern");
    }
    Ok(())
}

fn validate_name_filter(filter: Option<&str>) -> Result<()> {
    match filter {
        Some(name) if name.trim().is_empty() => Err(PrebuildError::ConfigError(
            "compilation_name_filter must not be blank; omit it to act on every compilation"
                .to_string(),
        )),
        _ => Ok(()),
    }
}
