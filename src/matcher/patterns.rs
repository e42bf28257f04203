// src/matcher/patterns.rs

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::trace;

use crate::errors::{PrebuildError, Result};
use crate::fs::FileSystem;
use crate::matcher::path_utils::{has_hidden_segment, normalize, relative_str, slash_str};

/// Options that shape how a pattern is evaluated.
///
/// Mirrors the `[files.options]` table of the config file:
///
/// ```toml
/// [files.options]
/// cwd = "fixtures/files"
/// realpath = true
/// ignore = ["node_modules/**"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchOptions {
    /// Base directory the pattern is evaluated against.
    ///
    /// `None` means the process working directory. A relative value is
    /// joined onto the working directory.
    pub cwd: Option<PathBuf>,

    /// Resolve each result through the filesystem (symlinks resolved).
    pub realpath: bool,

    /// Let `*` and `**` match path segments starting with a dot.
    pub dot: bool,

    /// Only return files, never directories.
    pub nodir: bool,

    /// Descend into symlinked directories while scanning.
    pub follow: bool,

    /// Case-insensitive matching.
    pub nocase: bool,

    /// Patterns whose matches are dropped from the result.
    pub ignore: Vec<String>,
}

impl MatchOptions {
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_realpath(mut self, val: bool) -> Self {
        self.realpath = val;
        self
    }

    pub fn with_dot(mut self, val: bool) -> Self {
        self.dot = val;
        self
    }

    pub fn with_nodir(mut self, val: bool) -> Self {
        self.nodir = val;
        self
    }

    pub fn with_follow(mut self, val: bool) -> Self {
        self.follow = val;
        self
    }

    pub fn with_nocase(mut self, val: bool) -> Self {
        self.nocase = val;
        self
    }

    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }
}

/// Pattern plus evaluation options. Immutable once a plugin is built.
///
/// An absent (or empty) pattern is valid and means "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchConfig {
    pattern: Option<String>,
    options: MatchOptions,
}

impl MatchConfig {
    pub fn new(pattern: Option<String>, options: MatchOptions) -> Self {
        let pattern = pattern.filter(|p| !p.is_empty());
        Self { pattern, options }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}

/// A compiled pattern bound to a base directory.
///
/// Relative patterns are matched against the path relative to the base
/// directory. Absolute patterns, and relative ones that climb out of the
/// base directory with `..`, are matched against the absolute path.
#[derive(Clone)]
pub struct PatternMatcher {
    pattern: String,
    root: PathBuf,
    /// Deepest directory named literally by the pattern; scans start here.
    base: PathBuf,
    glob: GlobMatcher,
    ignore: Option<GlobSet>,
    /// `glob` matches absolute, slash-separated paths.
    absolute: bool,
    explicit_dot: bool,
    options: MatchOptions,
}

impl fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternMatcher")
            .field("pattern", &self.pattern)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl PatternMatcher {
    /// Compile `pattern` (and the ignore list) against the base directory
    /// described by `options`.
    pub fn compile(pattern: &str, options: &MatchOptions) -> Result<Self> {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern).to_string();
        let root = resolve_root(options)?;

        let ignore = if options.ignore.is_empty() {
            None
        } else {
            Some(build_globset(&options.ignore, options)?)
        };

        let prefix = literal_prefix(&pattern);
        let (glob, base, absolute) = if Path::new(&pattern).is_absolute() {
            let glob = build_glob(&pattern, options)?;
            (glob, normalize(Path::new(&prefix)), true)
        } else if prefix.split('/').any(|seg| seg == "..") {
            // "../shared/*.json" leaves the root: anchor the glob at the
            // resolved base directory and match absolute paths.
            build_glob(&pattern, options)?;
            let base = normalize(&root.join(&prefix));
            let rest = pattern[prefix.len()..].trim_start_matches('/');
            let anchored = format!(
                "{}/{}",
                globset::escape(slash_str(&base).trim_end_matches('/')),
                rest
            );
            (build_glob(&anchored, options)?, base, true)
        } else {
            let glob = build_glob(&pattern, options)?;
            (glob, normalize(&root.join(&prefix)), false)
        };

        Ok(Self {
            explicit_dot: has_hidden_segment(&pattern),
            pattern,
            root,
            base,
            glob: glob.compile_matcher(),
            ignore,
            absolute,
            options: options.clone(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Absolute base directory results are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if `path` matches the pattern and is not ignored.
    ///
    /// Relative inputs are taken to be relative to [`Self::root`].
    pub fn is_match(&self, path: &Path) -> bool {
        let path: Cow<'_, Path> = if path.is_absolute() {
            Cow::Borrowed(path)
        } else {
            Cow::Owned(normalize(&self.root.join(path)))
        };

        // Absolute globs never need the root-relative form to match.
        let rel = if self.absolute {
            None
        } else {
            relative_str(&self.root, &path)
        };
        let candidate = match &rel {
            Some(rel) => rel.clone(),
            None => slash_str(&path),
        };

        if !self.glob.is_match(&candidate) {
            return false;
        }

        if let Some(ignore) = &self.ignore {
            let rel = match rel {
                Some(rel) => Some(rel),
                None if self.absolute => relative_str(&self.root, &path),
                None => None,
            };
            let ignored_rel = rel.as_deref().is_some_and(|r| ignore.is_match(r));
            if ignored_rel || ignore.is_match(&candidate) {
                return false;
            }
        }

        if !self.options.dot && !self.explicit_dot {
            let below_base =
                relative_str(&self.base, &path).unwrap_or_else(|| candidate.clone());
            if has_hidden_segment(&below_base) {
                return false;
            }
        }

        true
    }

    /// Keep the members of `paths` that match, preserving input order.
    pub fn filter(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths.iter().filter(|p| self.is_match(p)).cloned().collect()
    }

    /// Walk the filesystem below the pattern's literal base directory and
    /// return every matching path, absolute, sorted and de-duplicated.
    pub fn scan(&self, fs: &dyn FileSystem) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !fs.is_dir(&self.base) {
            trace!(base = ?self.base, "pattern base does not exist; nothing to match");
            return Ok(files);
        }

        let skip_hidden = !self.options.dot && !self.explicit_dot;
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut stack = vec![self.base.clone()];

        while let Some(dir) = stack.pop() {
            if self.options.follow {
                if let Ok(canon) = fs.canonicalize(&dir) {
                    if !visited.insert(canon) {
                        continue;
                    }
                }
            }

            let entries = fs
                .read_dir(&dir)
                .map_err(PrebuildError::PatternEvaluation)?;

            for path in entries {
                let hidden = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'));
                if skip_hidden && hidden {
                    continue;
                }

                if fs.is_dir(&path) {
                    if !self.options.nodir && self.is_match(&path) {
                        files.push(path.clone());
                    }
                    if self.options.follow || !fs.is_symlink(&path) {
                        stack.push(path);
                    }
                } else if fs.is_file(&path) && self.is_match(&path) {
                    files.push(path);
                }
            }
        }

        if self.options.realpath {
            files = files
                .iter()
                .map(|p| fs.canonicalize(p))
                .collect::<anyhow::Result<Vec<_>>>()
                .map_err(PrebuildError::PatternEvaluation)?;
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

/// Check the syntax of `pattern` and the ignore list without resolving a
/// base directory or touching the filesystem.
pub fn validate_patterns(pattern: Option<&str>, options: &MatchOptions) -> Result<()> {
    if let Some(pattern) = pattern {
        build_glob(pattern.strip_prefix("./").unwrap_or(pattern), options)?;
    }
    if !options.ignore.is_empty() {
        build_globset(&options.ignore, options)?;
    }
    Ok(())
}

fn resolve_root(options: &MatchOptions) -> Result<PathBuf> {
    match &options.cwd {
        Some(cwd) if cwd.is_absolute() => Ok(normalize(cwd)),
        other => {
            let current = std::env::current_dir().map_err(|e| {
                PrebuildError::PatternEvaluation(anyhow!("resolving working directory: {e}"))
            })?;
            Ok(match other {
                Some(rel) => normalize(&current.join(rel)),
                None => current,
            })
        }
    }
}

fn build_glob(pattern: &str, options: &MatchOptions) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .case_insensitive(options.nocase)
        .build()
        .map_err(|source| PrebuildError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build_globset(patterns: &[String], options: &MatchOptions) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let pat = pat.strip_prefix("./").unwrap_or(pat);
        builder.add(build_glob(pat, options)?);
    }
    builder.build().map_err(|source| PrebuildError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Leading directory segments of `pattern` that contain no glob syntax.
///
/// The final segment is never included, so `"data/config.json"` yields
/// `"data"` and `"/abs/**/*.json"` yields `"/abs"`.
fn literal_prefix(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();
    let dir_segments = &segments[..segments.len().saturating_sub(1)];

    let literal: Vec<&str> = dir_segments
        .iter()
        .take_while(|seg| !seg.contains(['*', '?', '[', '{', '\\']))
        .copied()
        .collect();

    let prefix = literal.join("/");
    if prefix.is_empty() && pattern.starts_with('/') {
        "/".to_string()
    } else {
        prefix
    }
}
