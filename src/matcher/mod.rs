// src/matcher/mod.rs

//! Pattern evaluation and the matched-files cache.
//!
//! This module is responsible for:
//! - Compiling the configured glob pattern (plus ignore list) with `globset`.
//! - Walking the filesystem to find every matching path.
//! - Memoizing that result until it is explicitly invalidated.
//! - Filtering a host-reported change set with the same glob semantics.
//!
//! It knows nothing about lifecycle hooks; the engine decides when to
//! resolve and when to invalidate.

pub mod cache;
pub mod path_utils;
pub mod patterns;

pub use cache::{MatchCache, MatchedFiles};
pub use patterns::{validate_patterns, MatchConfig, MatchOptions, PatternMatcher};
