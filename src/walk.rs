//! Directory traversal primitives.
//!
//! The heart of this module is [`DirectoryIterator`], a lazy, single-pass
//! walk over a directory tree driven by an explicit frame stack: one frame
//! per directory holding its open [`std::fs::ReadDir`] cursor. Descent
//! pushes a frame, exhaustion pops one, and the walk ends when the stack
//! empties.
//!
//! Symlink following is strict: when enabled, a link that cannot be
//! resolved aborts the entire traversal rather than being skipped.
//! Directory-read failures likewise propagate unmodified.
//!
//! ```no_run
//! use adze::walk::DirectoryIterator;
//!
//! for entry in DirectoryIterator::new("src").recursive(true) {
//!     println!("{}", entry?.display());
//! }
//! # Ok::<(), adze::walk::WalkError>(())
//! ```

use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkError {
    /// Directory unreadable, file unreadable, permissions, etc.
    #[error("cannot access {}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Strict symlink resolution failed mid-walk.
    #[error("cannot resolve symlink {}", path.display())]
    SymlinkResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path is neither a regular file nor a directory.
    #[error("{} is neither a file nor a directory", path.display())]
    InvalidFileType { path: PathBuf },
}

/// One level of in-progress traversal: a directory path paired with its
/// open child cursor. Child paths are formed by joining onto `path`, so
/// yielded entries stay relative to whatever the walk was rooted at.
struct Frame {
    path: PathBuf,
    entries: ReadDir,
}

/// Lazy iterator over the entries of a directory tree.
///
/// Yields every file and directory beneath the root (directories are
/// yielded as entries *and* descended into when `recursive` is set).
/// Single-pass and non-restartable; after yielding an error the iterator
/// is exhausted.
pub struct DirectoryIterator<'a> {
    root: PathBuf,
    recursive: bool,
    follow_symlinks: bool,
    ignore: Option<Box<dyn FnMut(&Path) -> bool + 'a>>,
    stack: Vec<Frame>,
    started: bool,
}

impl<'a> DirectoryIterator<'a> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            root: path.into(),
            recursive: false,
            follow_symlinks: false,
            ignore: None,
            stack: Vec::new(),
            started: false,
        }
    }

    /// Descend into subdirectories. Off by default.
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    /// Resolve symlinks and descend into their targets. Off by default.
    /// Only meaningful together with [`recursive`](Self::recursive).
    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    /// Skip entries the predicate matches. Ignored directories are not
    /// descended into.
    pub fn ignore<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&Path) -> bool + 'a,
    {
        self.ignore = Some(Box::new(predicate));
        self
    }

    fn push(&mut self, path: PathBuf) -> Result<(), WalkError> {
        let entries = fs::read_dir(&path).map_err(|source| WalkError::Access {
            path: path.clone(),
            source,
        })?;
        self.stack.push(Frame { path, entries });
        Ok(())
    }

    fn advance(&mut self) -> Option<Result<PathBuf, WalkError>> {
        loop {
            let frame = self.stack.last_mut()?;
            let entry = match frame.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(source)) => {
                    let path = frame.path.clone();
                    self.stack.clear();
                    return Some(Err(WalkError::Access { path, source }));
                }
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            // `DirEntry::path` is the frame path joined with the child name.
            let candidate = entry.path();

            if let Some(ignore) = self.ignore.as_mut()
                && ignore(&candidate)
            {
                continue;
            }

            if self.recursive {
                let is_symlink = candidate
                    .symlink_metadata()
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false);

                if self.follow_symlinks && is_symlink {
                    // Strict resolution: a dangling link kills the walk.
                    let target = match candidate.canonicalize() {
                        Ok(target) => target,
                        Err(source) => {
                            self.stack.clear();
                            return Some(Err(WalkError::SymlinkResolution {
                                path: candidate,
                                source,
                            }));
                        }
                    };
                    if let Err(e) = self.push(target) {
                        self.stack.clear();
                        return Some(Err(e));
                    }
                } else if candidate.is_dir() {
                    if let Err(e) = self.push(candidate.clone()) {
                        self.stack.clear();
                        return Some(Err(e));
                    }
                }
            }

            return Some(Ok(candidate));
        }
    }
}

impl<'a> Iterator for DirectoryIterator<'a> {
    type Item = Result<PathBuf, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            let root = self.root.clone();
            if let Err(e) = self.push(root) {
                return Some(Err(e));
            }
        }
        self.advance()
    }
}

/// Materialize a full traversal into a `Vec`.
pub fn list_children(
    path: impl AsRef<Path>,
    recursive: bool,
    follow_symlinks: bool,
) -> Result<Vec<PathBuf>, WalkError> {
    DirectoryIterator::new(path.as_ref())
        .recursive(recursive)
        .follow_symlinks(follow_symlinks)
        .collect()
}

/// Materialize only the entries the filter accepts.
pub fn filter_children<F>(
    path: impl AsRef<Path>,
    recursive: bool,
    follow_symlinks: bool,
    mut filter: F,
) -> Result<Vec<PathBuf>, WalkError>
where
    F: FnMut(&Path) -> bool,
{
    let mut out = Vec::new();
    for entry in DirectoryIterator::new(path.as_ref())
        .recursive(recursive)
        .follow_symlinks(follow_symlinks)
    {
        let entry = entry?;
        if filter(&entry) {
            out.push(entry);
        }
    }
    Ok(out)
}

/// Count the immediate children of a directory without materializing paths.
pub fn count_directory_contents(path: impl AsRef<Path>) -> Result<usize, WalkError> {
    let path = path.as_ref();
    let entries = fs::read_dir(path).map_err(|source| WalkError::Access {
        path: path.to_path_buf(),
        source,
    })?;
    let mut n = 0;
    for entry in entries {
        entry.map_err(|source| WalkError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        n += 1;
    }
    Ok(n)
}

/// A directory is empty when it has no children; a file is empty at size
/// zero. Anything else is an [`WalkError::InvalidFileType`].
pub fn is_empty(path: impl AsRef<Path>) -> Result<bool, WalkError> {
    let path = path.as_ref();
    if path.is_dir() {
        let mut entries = fs::read_dir(path).map_err(|source| WalkError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(entries.next().is_none())
    } else if path.is_file() {
        let meta = path.metadata().map_err(|source| WalkError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(meta.len() == 0)
    } else {
        Err(WalkError::InvalidFileType {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    /// a/, a/one.txt, a/b/, a/b/two.txt, three.txt
    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("a").join("b")).unwrap();
        touch(&root.join("a").join("one.txt"));
        touch(&root.join("a").join("b").join("two.txt"));
        touch(&root.join("three.txt"));
    }

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.sort();
        paths
    }

    #[test]
    fn flat_listing_returns_immediate_entries() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        let children = sorted(list_children(dir.path(), false, false).unwrap());
        assert_eq!(
            children,
            vec![dir.path().join("a"), dir.path().join("three.txt")]
        );
    }

    #[test]
    fn recursive_listing_visits_every_entry_once() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        let children = sorted(list_children(dir.path(), true, false).unwrap());
        assert_eq!(
            children,
            vec![
                dir.path().join("a"),
                dir.path().join("a").join("b"),
                dir.path().join("a").join("b").join("two.txt"),
                dir.path().join("a").join("one.txt"),
                dir.path().join("three.txt"),
            ]
        );
        for child in &children {
            assert!(child.exists(), "{} should exist", child.display());
        }
    }

    #[test]
    fn ignore_everything_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        let walked: Result<Vec<_>, _> = DirectoryIterator::new(dir.path())
            .recursive(true)
            .ignore(|_| true)
            .collect();
        assert!(walked.unwrap().is_empty());
    }

    #[test]
    fn ignored_directories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        let walked: Vec<PathBuf> = DirectoryIterator::new(dir.path())
            .recursive(true)
            .ignore(|p| p.file_name().is_some_and(|n| n == "b"))
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(!walked.iter().any(|p| p.ends_with("two.txt")));
        assert!(walked.iter().any(|p| p.ends_with("one.txt")));
    }

    #[test]
    fn non_recursive_does_not_descend() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        let children = list_children(dir.path(), false, false).unwrap();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn missing_root_propagates_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_children(dir.path().join("nope"), true, false);
        assert!(matches!(result, Err(WalkError::Access { .. })));
    }

    #[test]
    fn filter_children_applies_predicate() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        let txt = filter_children(dir.path(), true, false, |p| {
            p.extension().is_some_and(|e| e == "txt")
        })
        .unwrap();
        assert_eq!(txt.len(), 3);
    }

    #[test]
    fn count_directory_contents_is_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());

        assert_eq!(count_directory_contents(dir.path()).unwrap(), 2);
        assert_eq!(count_directory_contents(dir.path().join("a")).unwrap(), 2);
    }

    #[test]
    fn is_empty_classifies_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let empty_dir = dir.path().join("empty");
        fs::create_dir(&empty_dir).unwrap();
        let empty_file = dir.path().join("empty.txt");
        touch(&empty_file);
        let full_file = dir.path().join("full.txt");
        fs::write(&full_file, b"data").unwrap();

        assert!(is_empty(&empty_dir).unwrap());
        assert!(is_empty(&empty_file).unwrap());
        assert!(!is_empty(&full_file).unwrap());
        assert!(!is_empty(dir.path()).unwrap());
        assert!(matches!(
            is_empty(dir.path().join("missing")),
            Err(WalkError::InvalidFileType { .. })
        ));
    }

    #[cfg(unix)]
    mod symlinks {
        use super::*;
        use std::os::unix::fs::symlink;

        #[test]
        fn dangling_symlink_aborts_when_following() {
            let dir = tempfile::tempdir().unwrap();
            build_tree(dir.path());
            symlink(dir.path().join("gone"), dir.path().join("a").join("dangling")).unwrap();

            let result = list_children(dir.path(), true, true);
            assert!(matches!(result, Err(WalkError::SymlinkResolution { .. })));
        }

        #[test]
        fn dangling_symlink_is_listed_when_not_following() {
            let dir = tempfile::tempdir().unwrap();
            build_tree(dir.path());
            symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

            let children = list_children(dir.path(), true, false).unwrap();
            assert!(children.iter().any(|p| p.ends_with("dangling")));
        }

        #[test]
        fn followed_symlink_descends_into_target() {
            let dir = tempfile::tempdir().unwrap();
            build_tree(dir.path());
            let other = tempfile::tempdir().unwrap();
            fs::write(other.path().join("inner.txt"), b"x").unwrap();
            symlink(other.path(), dir.path().join("linked")).unwrap();

            let children = list_children(dir.path(), true, true).unwrap();
            assert!(children.iter().any(|p| p.ends_with("inner.txt")));
        }
    }
}
