//! Shebang rewriting for shell scripts.
//!
//! Replaces the first line of a script that already starts with `#`.
//! Recursive mode rewrites every `.sh` file found under a directory.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::walk;

/// Idiot-proof the replacement: trim it and force the leading `!`.
pub fn normalize_shebang(raw: &str) -> String {
    let s = raw.trim();
    if s.starts_with('!') {
        s.to_string()
    } else {
        format!("!{}", s)
    }
}

/// Replace the first line of `path` with `#<shebang>`.
pub fn replace_shebang(path: &Path, shebang: &str) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;

    if !contents.starts_with('#') {
        bail!("no shebang to replace in file at path {}", path.display());
    }

    let rest = match contents.find('\n') {
        Some(pos) => &contents[pos + 1..],
        None => "",
    };
    let updated = format!("#{}\n{}", shebang, rest);
    fs::write(path, updated).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

/// Replace shebangs in one file, or in every `.sh` file under a
/// directory when `recursive` is set. Returns how many files changed.
pub fn replace_shebangs(path: &Path, shebang: &str, recursive: bool) -> Result<usize> {
    if recursive {
        let scripts = walk::filter_children(path, true, false, |p| {
            p.extension().is_some_and(|ext| ext == "sh")
        })?;
        for script in &scripts {
            replace_shebang(script, shebang)?;
        }
        Ok(scripts.len())
    } else {
        replace_shebang(path, shebang)?;
        Ok(1)
    }
}
