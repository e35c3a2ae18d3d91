//! System package manager abstraction.
//!
//! A thin middleman over whatever the platform ships: apt-get on Linux,
//! Chocolatey on Windows (the GitHub Windows runners have choco
//! preinstalled). Install output is appended to a log file in the working
//! directory instead of flooding the terminal.

use std::fs::OpenOptions;
use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

const INSTALL_LOG: &str = "adze-install.log";

#[derive(Debug, Error)]
pub enum PacmanError {
    #[error("unsupported platform for package management")]
    UnsupportedPlatform,

    #[error("failed to launch {manager}")]
    Launch {
        manager: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("cannot open install log")]
    Log(#[source] io::Error),
}

pub trait PackageManager {
    fn name(&self) -> &'static str;

    /// Install a package; `Ok(false)` means the manager reported failure.
    fn install(&self, package: &str) -> Result<bool, PacmanError>;

    /// Search for a package, returning the manager's raw listing.
    fn search(&self, package: &str) -> Result<String, PacmanError>;
}

fn open_install_log() -> Result<std::fs::File, PacmanError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(INSTALL_LOG)
        .map_err(PacmanError::Log)
}

fn run_install(manager: &'static str, args: &[&str]) -> Result<bool, PacmanError> {
    let log = open_install_log()?;
    let status = Command::new(manager)
        .args(args)
        .stdout(Stdio::from(log))
        .status()
        .map_err(|source| PacmanError::Launch { manager, source })?;
    Ok(status.success())
}

fn run_search(manager: &'static str, args: &[&str]) -> Result<String, PacmanError> {
    let output = Command::new(manager)
        .args(args)
        .output()
        .map_err(|source| PacmanError::Launch { manager, source })?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub struct AptGet;

impl PackageManager for AptGet {
    fn name(&self) -> &'static str {
        "apt-get"
    }

    fn install(&self, package: &str) -> Result<bool, PacmanError> {
        run_install("apt-get", &["install", "-y", package])
    }

    fn search(&self, package: &str) -> Result<String, PacmanError> {
        run_search("apt-cache", &["search", package])
    }
}

pub struct Choco;

impl PackageManager for Choco {
    fn name(&self) -> &'static str {
        "choco"
    }

    fn install(&self, package: &str) -> Result<bool, PacmanError> {
        run_install("choco", &["install", "-y", package])
    }

    fn search(&self, package: &str) -> Result<String, PacmanError> {
        run_search("choco", &["search", package])
    }
}

/// Pick the package manager for the current platform.
pub fn detect() -> Result<Box<dyn PackageManager>, PacmanError> {
    if cfg!(target_os = "linux") {
        Ok(Box::new(AptGet))
    } else if cfg!(windows) {
        Ok(Box::new(Choco))
    } else {
        Err(PacmanError::UnsupportedPlatform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_matches_platform() {
        match detect() {
            Ok(manager) => {
                assert!(matches!(manager.name(), "apt-get" | "choco"));
            }
            Err(PacmanError::UnsupportedPlatform) => {
                assert!(!cfg!(target_os = "linux") && !cfg!(windows));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
