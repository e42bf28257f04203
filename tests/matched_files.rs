// tests/matched_files.rs

mod common;
use crate::common::{init_tracing, sorted, under};
use crate::common::builders::{fixture_dir, json_fixture, write_file};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use prebuild::errors::PrebuildError;
use prebuild::fs::mock::MockFileSystem;
use prebuild::fs::RealFileSystem;
use prebuild::matcher::{MatchCache, MatchConfig, MatchOptions, PatternMatcher};

type TestResult = Result<(), Box<dyn Error>>;

fn cache_for(pattern: Option<&str>, options: MatchOptions) -> MatchCache {
    MatchCache::new(MatchConfig::new(pattern.map(str::to_string), options))
}

#[test]
fn no_pattern_resolves_to_empty_without_filesystem_access() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.json", "{}");

    let mut cache = cache_for(None, MatchOptions::default().with_cwd("/proj"));
    let files = cache.resolve(&fs)?;

    assert!(files.is_empty());
    assert_eq!(fs.read_dir_calls(), 0);
    assert!(!cache.is_cached());

    Ok(())
}

#[test]
fn empty_pattern_behaves_like_no_pattern() -> TestResult {
    let config = MatchConfig::new(Some(String::new()), MatchOptions::default());
    assert!(!config.has_pattern());

    let fs = MockFileSystem::new();
    let mut cache = MatchCache::new(config);
    assert!(cache.resolve(&fs)?.is_empty());
    Ok(())
}

#[test]
fn json_pattern_returns_three_absolute_paths() -> TestResult {
    init_tracing();

    let dir = json_fixture();
    let mut cache = cache_for(
        Some("**/*.json"),
        MatchOptions::default().with_cwd(dir.path()),
    );

    let files = cache.resolve(&RealFileSystem)?;

    assert_eq!(files.len(), 3);
    for file in files.iter() {
        assert!(file.is_absolute(), "{file:?} is not absolute");
        assert!(file.is_file(), "{file:?} does not exist");
    }
    assert_eq!(
        files.to_vec(),
        sorted(under(dir.path(), &["one.json", "two.json", "nested/three.json"]))
    );

    Ok(())
}

#[test]
fn single_star_does_not_cross_directories() -> TestResult {
    let dir = json_fixture();
    let mut cache = cache_for(Some("*.json"), MatchOptions::default().with_cwd(dir.path()));

    let files = cache.resolve(&RealFileSystem)?;
    assert_eq!(files.to_vec(), under(dir.path(), &["one.json", "two.json"]));
    Ok(())
}

#[test]
fn literal_prefix_limits_the_scan() -> TestResult {
    let dir = json_fixture();
    let mut cache = cache_for(
        Some("nested/*.json"),
        MatchOptions::default().with_cwd(dir.path()),
    );

    let files = cache.resolve(&RealFileSystem)?;
    assert_eq!(files.to_vec(), under(dir.path(), &["nested/three.json"]));
    Ok(())
}

#[test]
fn absolute_pattern_ignores_cwd() -> TestResult {
    let dir = json_fixture();
    let pattern = format!("{}/**/*.json", dir.path().display());
    let mut cache = cache_for(Some(&pattern), MatchOptions::default().with_cwd("/nonexistent"));

    let files = cache.resolve(&RealFileSystem)?;
    assert_eq!(files.len(), 3);
    Ok(())
}

#[test]
fn missing_base_directory_matches_nothing() -> TestResult {
    let dir = json_fixture();
    let mut cache = cache_for(
        Some("**/*.json"),
        MatchOptions::default().with_cwd(dir.path().join("does-not-exist")),
    );
    assert!(cache.resolve(&RealFileSystem)?.is_empty());
    Ok(())
}

#[test]
fn cached_result_is_reused_until_invalidated() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/proj/one.json", "{}");
    fs.add_file("/proj/two.json", "{}");

    let mut cache = cache_for(Some("**/*.json"), MatchOptions::default().with_cwd("/proj"));

    let first = cache.resolve(&fs)?;
    let reads_after_first = fs.read_dir_calls();

    // A file appears between calls; the cache must not notice.
    fs.add_file("/proj/three.json", "{}");
    let second = cache.resolve(&fs)?;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 2);
    assert_eq!(fs.read_dir_calls(), reads_after_first);

    cache.invalidate();
    assert!(!cache.is_cached());

    let third = cache.resolve(&fs)?;
    assert_eq!(third.len(), 3);
    assert!(third.contains(&PathBuf::from("/proj/three.json")));

    Ok(())
}

#[test]
fn invalidation_reflects_removed_files() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/one.json", "{}");
    fs.add_file("/proj/two.json", "{}");

    let mut cache = cache_for(Some("*.json"), MatchOptions::default().with_cwd("/proj"));
    assert_eq!(cache.resolve(&fs)?.len(), 2);

    fs.remove("/proj/two.json");
    assert_eq!(cache.resolve(&fs)?.len(), 2);

    cache.invalidate();
    assert_eq!(
        cache.resolve(&fs)?.to_vec(),
        vec![PathBuf::from("/proj/one.json")]
    );
    Ok(())
}

#[test]
fn malformed_pattern_is_an_error_not_an_empty_match() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.json", "{}");

    let mut cache = cache_for(Some("[abc"), MatchOptions::default().with_cwd("/proj"));

    match cache.resolve(&fs) {
        Err(PrebuildError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "[abc"),
        Err(e) => panic!("Expected InvalidPattern, got: {:?}", e),
        Ok(files) => panic!("Expected error, got {:?}", files),
    }
}

#[test]
fn dot_segments_are_skipped_unless_requested() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/visible.json", "{}");
    fs.add_file("/proj/.cache/hidden.json", "{}");
    fs.add_file("/proj/.dotfile.json", "{}");

    let mut default_cache = cache_for(Some("**/*.json"), MatchOptions::default().with_cwd("/proj"));
    assert_eq!(
        default_cache.resolve(&fs)?.to_vec(),
        vec![PathBuf::from("/proj/visible.json")]
    );

    let mut dot_cache = cache_for(
        Some("**/*.json"),
        MatchOptions::default().with_cwd("/proj").with_dot(true),
    );
    assert_eq!(dot_cache.resolve(&fs)?.len(), 3);

    // Naming the dot directory in the pattern opts in explicitly.
    let mut explicit = cache_for(Some(".cache/*.json"), MatchOptions::default().with_cwd("/proj"));
    assert_eq!(
        explicit.resolve(&fs)?.to_vec(),
        vec![PathBuf::from("/proj/.cache/hidden.json")]
    );

    Ok(())
}

#[test]
fn ignore_patterns_drop_matches() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/a.json", "{}");
    fs.add_file("/proj/node_modules/pkg/package.json", "{}");

    let mut cache = cache_for(
        Some("**/*.json"),
        MatchOptions::default()
            .with_cwd("/proj")
            .with_ignore("node_modules/**"),
    );

    assert_eq!(
        cache.resolve(&fs)?.to_vec(),
        vec![PathBuf::from("/proj/src/a.json")]
    );
    Ok(())
}

#[test]
fn directories_are_returned_unless_nodir() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/data.d/inner.txt", "x");
    fs.add_file("/proj/other.d", "file, not dir");

    let mut with_dirs = cache_for(Some("*.d"), MatchOptions::default().with_cwd("/proj"));
    assert_eq!(with_dirs.resolve(&fs)?.len(), 2);

    let mut files_only = cache_for(
        Some("*.d"),
        MatchOptions::default().with_cwd("/proj").with_nodir(true),
    );
    assert_eq!(
        files_only.resolve(&fs)?.to_vec(),
        vec![PathBuf::from("/proj/other.d")]
    );
    Ok(())
}

#[test]
fn nocase_matches_regardless_of_case() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/UPPER.JSON", "{}");

    let mut strict = cache_for(Some("*.json"), MatchOptions::default().with_cwd("/proj"));
    assert!(strict.resolve(&fs)?.is_empty());

    let mut relaxed = cache_for(
        Some("*.json"),
        MatchOptions::default().with_cwd("/proj").with_nocase(true),
    );
    assert_eq!(relaxed.resolve(&fs)?.len(), 1);
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_directories_need_follow_and_realpath_resolves_links() -> TestResult {
    let dir = json_fixture();
    let outside = tempfile::tempdir()?;
    write_file(outside.path(), "linked.json", "{}");
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link"))?;

    let mut no_follow = cache_for(
        Some("link/**/*.json"),
        MatchOptions::default().with_cwd(dir.path()),
    );
    // The literal prefix `link` is the scan root, so it is read even
    // without `follow`; deeper symlinks are not.
    assert_eq!(no_follow.resolve(&RealFileSystem)?.len(), 1);

    let mut everywhere = cache_for(Some("**/*.json"), MatchOptions::default().with_cwd(dir.path()));
    assert_eq!(everywhere.resolve(&RealFileSystem)?.len(), 3);

    let mut followed = cache_for(
        Some("**/*.json"),
        MatchOptions::default().with_cwd(dir.path()).with_follow(true),
    );
    assert_eq!(followed.resolve(&RealFileSystem)?.len(), 4);

    let mut real = cache_for(
        Some("link/*.json"),
        MatchOptions::default().with_cwd(dir.path()).with_realpath(true),
    );
    let resolved = real.resolve(&RealFileSystem)?;
    assert_eq!(
        resolved.to_vec(),
        vec![outside.path().canonicalize()?.join("linked.json")]
    );

    Ok(())
}

#[test]
fn filter_keeps_only_matching_changed_paths() -> TestResult {
    let mut cache = cache_for(Some("**/*.json"), MatchOptions::default().with_cwd("/proj"));

    let changed = vec![
        PathBuf::from("/proj/data/a.json"),
        PathBuf::from("/proj/src/b.js"),
    ];
    let relevant = cache.filter_changed(&changed)?;

    assert_eq!(relevant, vec![PathBuf::from("/proj/data/a.json")]);
    Ok(())
}

#[test]
fn filter_accepts_relative_paths_and_paths_outside_root() -> TestResult {
    let matcher = PatternMatcher::compile("**/*.json", &MatchOptions::default().with_cwd("/proj"))?;

    assert!(matcher.is_match(&PathBuf::from("data/a.json")));
    assert!(matcher.is_match(&PathBuf::from("/elsewhere/b.json")));
    assert!(!matcher.is_match(&PathBuf::from("/proj/readme.md")));
    assert!(!matcher.is_match(&PathBuf::from("/proj/.git/config.json")));
    Ok(())
}

#[test]
fn filter_without_pattern_matches_nothing() -> TestResult {
    let mut cache = cache_for(None, MatchOptions::default());
    let relevant = cache.filter_changed(&[PathBuf::from("/proj/a.json")])?;
    assert!(relevant.is_empty());
    Ok(())
}

#[test]
fn parent_relative_pattern_scans_outside_the_base_directory() -> TestResult {
    init_tracing();

    let dir = fixture_dir(&[
        ("app/index.js", "console.log('app')"),
        ("shared/a.json", "{}"),
        ("shared/b.txt", "b"),
        ("shared/deep/c.json", "{}"),
    ]);

    let options = MatchOptions::default().with_cwd(dir.path().join("app"));
    let mut cache = cache_for(Some("../shared/*.json"), options);
    let files = cache.resolve(&RealFileSystem)?;

    assert_eq!(files.to_vec(), vec![dir.path().join("shared/a.json")]);
    Ok(())
}

#[test]
fn parent_relative_pattern_filters_changed_paths() -> TestResult {
    let options = MatchOptions::default().with_cwd("/proj/app");
    let matcher = PatternMatcher::compile("../shared/**/*.json", &options)?;

    let changed = vec![
        PathBuf::from("/proj/shared/a.json"),
        PathBuf::from("/proj/shared/deep/c.json"),
        PathBuf::from("/proj/app/a.json"),
        PathBuf::from("/proj/shared/b.txt"),
        PathBuf::from("../shared/z.json"),
    ];

    assert_eq!(
        matcher.filter(&changed),
        vec![
            PathBuf::from("/proj/shared/a.json"),
            PathBuf::from("/proj/shared/deep/c.json"),
            PathBuf::from("../shared/z.json"),
        ]
    );
    Ok(())
}

#[test]
fn absolute_pattern_still_applies_root_relative_ignores() -> TestResult {
    let options = MatchOptions::default()
        .with_cwd("/proj")
        .with_ignore("vendor/**");
    let matcher = PatternMatcher::compile("/proj/**/*.json", &options)?;

    let changed = vec![
        PathBuf::from("/proj/a.json"),
        PathBuf::from("/proj/vendor/b.json"),
        PathBuf::from("/elsewhere/c.json"),
    ];

    assert_eq!(matcher.filter(&changed), vec![PathBuf::from("/proj/a.json")]);
    Ok(())
}
