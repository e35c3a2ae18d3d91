//! Git helpers built on the `git` executable.
//!
//! Every operation shells out to `git -C <repo>` and inspects the text
//! output, mirroring what a developer would type. stderr containing
//! `fatal:` or `error:` marks the invocation as failed; parse helpers are
//! pure functions over the captured stdout so they stay testable.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use crate::ui;

static FATAL_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new("fatal:").unwrap());
static ERROR_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new("error:").unwrap());

const STATUS_MODIFIED: &str = "modified:";
const STATUS_NEW_FILE: &str = "new file:";
const STATUS_DELETED: &str = "deleted:";

fn stderr_ok(stderr: &str) -> bool {
    !FATAL_LINE.is_match(stderr) && !ERROR_LINE.is_match(stderr)
}

/// Run a git subcommand. `Ok(None)` means git itself reported failure
/// (already logged unless quiet); `Err` means git could not be launched.
fn run_git(repo_root: &Path, args: &[&str], quiet: bool) -> Result<Option<String>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(args)
        .output()
        .context("failed to launch git")?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let name = args.first().copied().unwrap_or("");

    if !stderr_ok(&stderr) {
        if !quiet && !stderr.trim().is_empty() {
            ui::log_error(format!("git {}\n\t{}", name, stderr.trim()));
        }
        return Ok(None);
    }

    if !quiet && !stdout.trim().is_empty() {
        ui::log_info(format!("git {}\n\t{}", name, stdout.trim()));
    }
    Ok(Some(stdout))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchList {
    pub current: String,
    pub branches: Vec<String>,
}

/// Parse `git branch` output; the `*` prefix marks the current branch.
fn parse_branches(stdout: &str) -> BranchList {
    let mut current = String::new();
    let mut branches = Vec::new();
    for line in stdout.lines() {
        let mut s = line.trim();
        if let Some(rest) = s.strip_prefix('*') {
            s = rest.trim();
            current = s.to_string();
        }
        if !s.is_empty() {
            branches.push(s.to_string());
        }
    }
    BranchList { current, branches }
}

pub fn branches(repo_root: &Path, quiet: bool) -> Result<Option<BranchList>> {
    let Some(stdout) = run_git(repo_root, &["branch"], quiet)? else {
        return Ok(None);
    };
    Ok(Some(parse_branches(&stdout)))
}

pub fn create_branch(name: &str, repo_root: &Path, quiet: bool) -> Result<bool> {
    Ok(run_git(repo_root, &["branch", name], quiet)?.is_some())
}

pub fn delete_branch(name: &str, force: bool, repo_root: &Path, quiet: bool) -> Result<bool> {
    let flag = if force { "-D" } else { "-d" };
    Ok(run_git(repo_root, &["branch", flag, name], quiet)?.is_some())
}

pub fn rename_branch(new_name: &str, repo_root: &Path, quiet: bool) -> Result<bool> {
    Ok(run_git(repo_root, &["branch", "-m", new_name], quiet)?.is_some())
}

pub fn checkout(name: &str, repo_root: &Path, quiet: bool) -> Result<bool> {
    Ok(run_git(repo_root, &["checkout", "-q", name], quiet)?.is_some())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Modified,
    New,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub file: PathBuf,
    pub kind: ChangeType,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusResult {
    pub staged: Vec<Change>,
    pub unstaged: Vec<Change>,
}

impl StatusResult {
    /// Staged and unstaged changes, deduplicated by file.
    pub fn all(&self) -> Vec<&Change> {
        let mut all: Vec<&Change> = self.staged.iter().collect();
        for change in &self.unstaged {
            if !all.iter().any(|c| c.file == change.file) {
                all.push(change);
            }
        }
        all
    }
}

/// Which section of `git status` output a change line belongs to.
enum Section {
    Staged,
    Unstaged,
    Other,
}

fn parse_status(stdout: &str) -> StatusResult {
    let mut result = StatusResult::default();
    let mut section = Section::Other;

    for line in stdout.lines() {
        let s = line.trim();

        if s.starts_with("Changes to be committed:") {
            section = Section::Staged;
        } else if s.starts_with("Changes not staged for commit:") {
            section = Section::Unstaged;
        } else if s.starts_with("Untracked files:") {
            section = Section::Other;
        }

        let parsed = [
            (STATUS_MODIFIED, ChangeType::Modified),
            (STATUS_NEW_FILE, ChangeType::New),
            (STATUS_DELETED, ChangeType::Deleted),
        ]
        .iter()
        .find_map(|(marker, kind)| {
            s.strip_prefix(marker).map(|rest| Change {
                file: PathBuf::from(rest.split_whitespace().next().unwrap_or_default()),
                kind: *kind,
            })
        });

        if let Some(change) = parsed {
            match section {
                Section::Staged => result.staged.push(change),
                Section::Unstaged => result.unstaged.push(change),
                Section::Other => {}
            }
        }
    }

    result
}

pub fn status(repo_root: &Path, quiet: bool) -> Result<Option<StatusResult>> {
    let Some(stdout) = run_git(repo_root, &["status"], quiet)? else {
        return Ok(None);
    };
    Ok(Some(parse_status(&stdout)))
}

pub fn add(pattern: &str, repo_root: &Path, quiet: bool) -> Result<bool> {
    Ok(run_git(repo_root, &["add", pattern], quiet)?.is_some())
}

pub fn commit(message: &str, repo_root: &Path, quiet: bool) -> Result<bool> {
    Ok(run_git(repo_root, &["commit", "-m", message], quiet)?.is_some())
}

pub fn push(
    auto_set_upstream: bool,
    remote_name: &str,
    repo_root: &Path,
    quiet: bool,
) -> Result<bool> {
    if auto_set_upstream {
        let Some(list) = branches(repo_root, true)? else {
            return Ok(false);
        };
        let args = ["push", "--set-upstream", remote_name, list.current.as_str()];
        return Ok(run_git(repo_root, &args, quiet)?.is_some());
    }
    Ok(run_git(repo_root, &["push"], quiet)?.is_some())
}

pub fn pull(repo_root: &Path, quiet: bool) -> Result<bool> {
    Ok(run_git(repo_root, &["pull"], quiet)?.is_some())
}

/// Checks if a directory is a git repository by probing for `.git`.
pub fn is_local_repo(repo_root: &Path) -> bool {
    repo_root.is_dir() && repo_root.join(".git").is_dir()
}
