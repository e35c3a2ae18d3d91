//! Source line counting.
//!
//! Expands directory arguments through the directory walker, keeps only
//! C/C++ source files, and counts lines per file in parallel. Unreadable
//! files count as zero rather than failing the whole run.

use anyhow::Result;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::walk;

const SOURCE_EXTENSIONS: &[&str] = &["cpp", "hpp", "c", "h", "cc", "cxx", "hh", "hxx"];

#[derive(Debug, Default)]
pub struct CountOptions {
    /// Skip blank lines.
    pub productive_only: bool,
    /// Only count files whose path matches.
    pub pattern: Option<Regex>,
    /// Search directories recursively.
    pub recursive: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CountResult {
    pub files: usize,
    pub lines: usize,
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_string_lossy().as_ref()))
}

fn count_file(path: &Path, productive_only: bool) -> Option<usize> {
    let content = fs::read_to_string(path).ok()?;
    let count = if productive_only {
        content.lines().filter(|line| !line.trim().is_empty()).count()
    } else {
        content.lines().count()
    };
    Some(count)
}

/// Count lines across files and directory trees.
pub fn count_lines(paths: &[PathBuf], options: &CountOptions) -> Result<CountResult> {
    let mut files: Vec<PathBuf> = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(walk::filter_children(path, options.recursive, false, |p| {
                p.is_file() && is_source_file(p)
            })?);
        } else {
            files.push(path.clone());
        }
    }

    if let Some(pattern) = &options.pattern {
        files.retain(|p| pattern.is_match(&p.to_string_lossy()));
    }

    let lines: usize = files
        .par_iter()
        .map(|path| count_file(path, options.productive_only).unwrap_or(0))
        .sum();

    Ok(CountResult {
        files: files.len(),
        lines,
    })
}
