//! Containment tests for the path resolver.
//!
//! Every command argument must map to a path inside the local root;
//! traversal and symlink tricks that leave it are rejected before any
//! filesystem work happens.

use share_core::{Error, PathResolver, RootConfig};
use share_test_utils::TestRoots;
use std::path::Path;

fn config_for(roots: &TestRoots) -> RootConfig {
    RootConfig::with_roots(
        roots.local_root(),
        roots.shared_root(),
        roots.ignore_file(),
    )
    .unwrap()
}

#[test]
fn test_traversal_out_of_the_root_is_rejected() {
    let roots = TestRoots::new();
    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root());

    let err = resolver
        .resolve(Path::new("../../../../etc/passwd"), false)
        .unwrap_err();
    assert!(matches!(err, Error::OutsideRoot { .. }), "got {err}");
}

#[test]
fn test_absolute_path_outside_the_root_is_rejected() {
    let roots = TestRoots::new();
    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root());

    let err = resolver.resolve(Path::new("/etc/passwd"), false).unwrap_err();
    assert!(matches!(err, Error::OutsideRoot { .. }), "got {err}");
}

#[test]
fn test_shared_root_is_not_a_valid_argument_location() {
    // Arguments name local files; the shared counterpart is always
    // derived, never addressed directly.
    let roots = TestRoots::new();
    roots.write_shared("f.txt", "s");
    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root());

    let err = resolver
        .resolve(&roots.shared_root().join("f.txt"), false)
        .unwrap_err();
    assert!(matches!(err, Error::OutsideRoot { .. }), "got {err}");
}

#[test]
fn test_traversal_that_stays_inside_resolves() {
    let roots = TestRoots::new();
    roots.write_local("top.txt", "t");
    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root().join("proj"));

    let rel = resolver.resolve(Path::new("../top.txt"), false).unwrap();
    assert_eq!(rel.as_str(), "top.txt");
}

#[test]
fn test_absolute_path_inside_the_root_resolves_from_anywhere() {
    let roots = TestRoots::new();
    roots.write_local("sub/f.txt", "x");
    let config = config_for(&roots);
    // Base far away from either root.
    let resolver = PathResolver::new(&config, roots.base());

    let rel = resolver
        .resolve(&roots.local_root().join("sub/f.txt"), false)
        .unwrap();
    assert_eq!(rel.as_str(), "sub/f.txt");
}

#[test]
fn test_missing_local_source_is_reported_when_required() {
    let roots = TestRoots::new();
    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root());

    let err = resolver.resolve(Path::new("ghost.txt"), true).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err}");

    // The same argument is fine when existence is not required.
    let rel = resolver.resolve(Path::new("ghost.txt"), false).unwrap();
    assert_eq!(rel.as_str(), "ghost.txt");
}

#[cfg(unix)]
#[test]
fn test_symlink_escaping_the_root_is_rejected_even_for_new_leaves() {
    let roots = TestRoots::new();
    let outside = roots.base().join("elsewhere");
    std::fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, roots.local_root().join("link")).unwrap();

    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root());

    // The leaf does not exist; the symlinked ancestor still resolves
    // outside the root and must be caught.
    let err = resolver
        .resolve(Path::new("link/new_file.txt"), false)
        .unwrap_err();
    assert!(matches!(err, Error::OutsideRoot { .. }), "got {err}");
}

#[cfg(unix)]
#[test]
fn test_symlink_within_the_root_resolves_to_its_target() {
    let roots = TestRoots::new();
    roots.write_local("real/f.txt", "x");
    std::os::unix::fs::symlink(
        roots.local_root().join("real"),
        roots.local_root().join("alias"),
    )
    .unwrap();

    let config = config_for(&roots);
    let resolver = PathResolver::new(&config, roots.local_root());

    let rel = resolver.resolve(Path::new("alias/f.txt"), false).unwrap();
    assert_eq!(rel.as_str(), "real/f.txt");
}
