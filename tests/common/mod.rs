#![allow(dead_code)]

pub use prebuild_test_utils::builders;
pub use prebuild_test_utils::fake_host;
pub use prebuild_test_utils::{init_tracing, with_timeout};

use std::path::{Path, PathBuf};

/// Sort a list of paths for order-insensitive comparison.
pub fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

/// Join each relative name onto `root`.
pub fn under(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| root.join(n)).collect()
}
