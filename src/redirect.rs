//! Redirect-script generation.
//!
//! Emits `.sh` and/or `.bat` wrappers that live inside a repository,
//! locate the repo root via a relative `..` chain from their own
//! directory, and forward every argument to a target script. Both
//! relative paths are validated by re-resolving them before anything is
//! written.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectOptions {
    pub shell: bool,
    pub batch: bool,
}

impl RedirectOptions {
    /// Neither flag set means generate everything.
    fn effective(self) -> (bool, bool) {
        if !self.shell && !self.batch {
            (true, true)
        } else {
            (self.shell, self.batch)
        }
    }
}

fn posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// The `..` chain climbing from `dir` (inside `root`) back up to `root`.
fn path_to_root(dir: &Path, root: &Path) -> Result<PathBuf> {
    let relative = dir.strip_prefix(root).with_context(|| {
        format!(
            "output script {} must live under the repo root {}",
            dir.display(),
            root.display()
        )
    })?;
    let mut up = PathBuf::new();
    for component in relative.components() {
        if matches!(component, Component::Normal(_)) {
            up.push("..");
        }
    }
    if up.as_os_str().is_empty() {
        up.push(".");
    }
    Ok(up)
}

/// Generate redirect scripts next to `name`, forwarding into `script`.
/// Returns the paths written.
pub fn generate_redirects(
    script: &Path,
    name: &Path,
    repo_root: &Path,
    options: RedirectOptions,
) -> Result<Vec<PathBuf>> {
    let repo_root = repo_root.canonicalize().with_context(|| {
        format!(
            "cannot find repo root directory, path given = {}",
            repo_root.display()
        )
    })?;
    if !repo_root.is_dir() {
        bail!("repo root path given isn't a directory");
    }

    let script = script.canonicalize().with_context(|| {
        format!("cannot find target script, path given = {}", script.display())
    })?;
    if !script.is_file() {
        bail!("target script given isn't a regular file");
    }

    let name = absolutize(name)?;
    let out_dir = name
        .parent()
        .context("output name has no parent directory")?;

    let to_root = path_to_root(out_dir, &repo_root)?;
    // Sanity check: climbing the chain must land back on the root.
    let climbed = out_dir.join(&to_root).canonicalize().with_context(|| {
        "failed to determine relative path from output script to repo root".to_string()
    })?;
    if climbed != repo_root {
        bail!("failed to determine relative path from output script to repo root");
    }

    let script_rel = script.strip_prefix(out_dir).with_context(|| {
        format!(
            "target script {} must live under the wrapper directory {}",
            script.display(),
            out_dir.display()
        )
    })?;

    let (make_shell, make_batch) = options.effective();
    let mut written = Vec::new();

    if make_shell {
        let out_path = name.with_extension("sh");
        let lines = [
            "#!/bin/sh".to_string(),
            "set -e".to_string(),
            String::new(),
            "# Path to this script's parent directory".to_string(),
            "SCRIPT_DIR=$(dirname \"$0\")".to_string(),
            String::new(),
            "# Path to the repo's root directory".to_string(),
            format!("REPO_ROOT=${{SCRIPT_DIR}}/{}", posix(&to_root)),
            String::new(),
            "# Path to the script this redirects into".to_string(),
            format!("TARGET_SCRIPT=${{SCRIPT_DIR}}/{}", posix(script_rel)),
            String::new(),
            "# Invoke the target script and forward in given args".to_string(),
            "\"${TARGET_SCRIPT}\" \"$@\"".to_string(),
            String::new(),
            "# Forward exit code".to_string(),
            "exit $?".to_string(),
        ];
        fs::write(&out_path, lines.join("\n") + "\n")?;
        written.push(out_path);
    }

    if make_batch {
        let out_path = name.with_extension("bat");
        let lines = [
            "@ECHO OFF".to_string(),
            "SETLOCAL".to_string(),
            String::new(),
            ":: Path to this script's directory".to_string(),
            "set SCRIPT_DIR=%~dp0".to_string(),
            String::new(),
            ":: Path to the repo's root directory".to_string(),
            format!("set REPO_ROOT=%SCRIPT_DIR%/{}", posix(&to_root)),
            String::new(),
            ":: Path to the script this redirects into".to_string(),
            format!("set TARGET_SCRIPT=%SCRIPT_DIR%/{}", posix(script_rel)),
            String::new(),
            ":: Invoke the target script".to_string(),
            "call %TARGET_SCRIPT% %*".to_string(),
            "exit /B %errorlevel%".to_string(),
        ];
        fs::write(&out_path, lines.join("\n") + "\n")?;
        written.push(out_path);
    }

    Ok(written)
}
