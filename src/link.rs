//! Symbolic link creation.
//!
//! The target must already exist; its directory-ness is forwarded on
//! Windows where file and directory links are distinct. An existing link
//! is only a warning, and missing permissions can be downgraded to one.

use anyhow::{Result, bail};
use std::io;
use std::path::Path;

use crate::ui;

#[cfg(unix)]
fn symlink(target: &Path, link_name: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link_name)
}

#[cfg(windows)]
fn symlink(target: &Path, link_name: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link_name)
    } else {
        std::os::windows::fs::symlink_file(target, link_name)
    }
}

pub fn create_symlink(target: &Path, link_name: &Path, ignore_perms: bool) -> Result<()> {
    let target = match target.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => bail!(
            "cannot create link as target does not exist. Target = {}",
            target.display()
        ),
    };

    match symlink(&target, link_name) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            ui::log_warn(format!(
                "Link already exists. \"{}\" -> \"{}\"",
                target.display(),
                link_name.display()
            ));
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            if ignore_perms {
                ui::log_warn("Missing permissions to create symlink");
                Ok(())
            } else {
                bail!("missing permissions to create symlink");
            }
        }
        Err(e) => Err(e.into()),
    }
}
