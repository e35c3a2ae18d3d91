//! Integration tests for directory traversal.
//!
//! These exercise the walker against real on-disk trees, including the
//! strict symlink-resolution behavior.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use adze::walk::{self, DirectoryIterator, WalkError};

/// root/
///   docs/readme.md
///   src/main.cpp
///   src/lib/util.cpp
///   src/lib/util.hpp
fn build_project_tree(root: &Path) {
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::create_dir_all(root.join("src").join("lib")).unwrap();
    fs::write(root.join("docs").join("readme.md"), "# readme\n").unwrap();
    fs::write(root.join("src").join("main.cpp"), "int main() {}\n").unwrap();
    fs::write(root.join("src").join("lib").join("util.cpp"), "\n").unwrap();
    fs::write(root.join("src").join("lib").join("util.hpp"), "\n").unwrap();
}

#[test]
fn recursive_walk_visits_everything_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    build_project_tree(dir.path());

    let entries = walk::list_children(dir.path(), true, false).unwrap();

    let unique: HashSet<&PathBuf> = entries.iter().collect();
    assert_eq!(unique.len(), entries.len(), "no duplicates expected");
    assert_eq!(entries.len(), 7);
    for entry in &entries {
        assert!(entry.exists());
        assert!(entry.starts_with(dir.path()));
    }
}

#[test]
fn flat_walk_stops_at_the_first_level() {
    let dir = tempfile::tempdir().unwrap();
    build_project_tree(dir.path());

    let mut entries = walk::list_children(dir.path(), false, false).unwrap();
    entries.sort();
    assert_eq!(entries, vec![dir.path().join("docs"), dir.path().join("src")]);
}

#[test]
fn ignore_predicate_prunes_whole_subtrees() {
    let dir = tempfile::tempdir().unwrap();
    build_project_tree(dir.path());

    let entries: Vec<PathBuf> = DirectoryIterator::new(dir.path())
        .recursive(true)
        .ignore(|p| p.file_name().is_some_and(|n| n == "lib"))
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(entries.iter().all(|p| !p.to_string_lossy().contains("util")));
    assert!(entries.iter().any(|p| p.ends_with("main.cpp")));
}

#[test]
fn walker_is_single_pass() {
    let dir = tempfile::tempdir().unwrap();
    build_project_tree(dir.path());

    let mut iter = DirectoryIterator::new(dir.path()).recursive(true);
    let first_pass: Vec<_> = iter.by_ref().collect();
    assert!(!first_pass.is_empty());
    assert!(iter.next().is_none(), "exhausted walker must stay exhausted");
}

#[test]
fn filter_children_selects_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    build_project_tree(dir.path());

    let sources = walk::filter_children(dir.path(), true, false, |p| {
        p.extension().is_some_and(|e| e == "cpp")
    })
    .unwrap();
    assert_eq!(sources.len(), 2);
}

#[cfg(unix)]
mod symlink_behavior {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn dangling_link_aborts_the_walk_when_following() {
        let dir = tempfile::tempdir().unwrap();
        build_project_tree(dir.path());
        symlink(dir.path().join("missing"), dir.path().join("docs").join("broken")).unwrap();

        let result = walk::list_children(dir.path(), true, true);
        match result {
            Err(WalkError::SymlinkResolution { path, .. }) => {
                assert!(path.ends_with("broken"));
            }
            other => panic!("expected symlink resolution failure, got {:?}", other),
        }
    }

    #[test]
    fn followed_links_pull_in_external_trees() {
        let dir = tempfile::tempdir().unwrap();
        build_project_tree(dir.path());

        let external = tempfile::tempdir().unwrap();
        fs::write(external.path().join("vendored.hpp"), "#pragma once\n").unwrap();
        symlink(external.path(), dir.path().join("vendor")).unwrap();

        let entries = walk::list_children(dir.path(), true, true).unwrap();
        assert!(entries.iter().any(|p| p.ends_with("vendor")));
        assert!(entries.iter().any(|p| p.ends_with("vendored.hpp")));
    }

    #[test]
    fn links_are_plain_entries_when_not_following() {
        let dir = tempfile::tempdir().unwrap();
        build_project_tree(dir.path());
        symlink(dir.path().join("missing"), dir.path().join("broken")).unwrap();

        let entries = walk::list_children(dir.path(), true, false).unwrap();
        assert!(entries.iter().any(|p| p.ends_with("broken")));
    }
}
