//! CMake configure/build wrapper.
//!
//! Composes and runs `cmake` command lines, exporting `CC`/`CXX` for the
//! selected compiler, then post-processes the output: `warning:` lines are
//! counted, `FAILED:` lines mark the run as failed even when the exit code
//! lies.

use anyhow::{Context, Result, bail};
use colored::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;
use std::time::Duration;

use crate::ui;

static WARNING_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new("warning:").unwrap());
static FAILED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new("FAILED:").unwrap());

pub const DEFAULT_GENERATOR: &str = "Ninja";
pub const DEFAULT_BUILD_ROOT: &str = "build";
pub const DEFAULT_LOG_LEVEL: &str = "VERBOSE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    Clang,
    Gcc,
}

impl Compiler {
    pub fn from_name(name: &str) -> Option<Compiler> {
        match name {
            "clang" | "clang++" => Some(Compiler::Clang),
            "gcc" | "g++" => Some(Compiler::Gcc),
            _ => None,
        }
    }

    fn c(self) -> &'static str {
        match self {
            Compiler::Clang => "clang",
            Compiler::Gcc => "gcc",
        }
    }

    fn cpp(self) -> &'static str {
        match self {
            Compiler::Clang => "clang++",
            Compiler::Gcc => "g++",
        }
    }
}

/// A `-DNAME=VALUE` cache definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeDef {
    pub name: String,
    pub value: String,
}

impl CMakeDef {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Boolean definitions render as ON/OFF.
    pub fn flag(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, if value { "ON" } else { "OFF" })
    }

    /// Parse a `NAME=VALUE` argument. A bare `NAME` means ON.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((name, value)) => Self::new(name, value),
            None => Self::flag(raw, true),
        }
    }

    pub fn render(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

#[derive(Debug)]
pub struct GenerateOptions {
    pub definitions: Vec<CMakeDef>,
    pub generator: String,
    pub source_root: PathBuf,
    pub build_root: PathBuf,
    pub log_level: String,
    pub compiler: Option<Compiler>,
    pub dev_output: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            generator: DEFAULT_GENERATOR.to_string(),
            source_root: PathBuf::from("."),
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            compiler: None,
            dev_output: false,
        }
    }
}

/// Compose the full `cmake` configure command line.
pub fn make_generate_command(options: &GenerateOptions) -> Vec<String> {
    let mut command = vec!["cmake".to_string()];
    if !options.dev_output {
        command.push("-Wno-dev".to_string());
    }
    command.push("-G".to_string());
    command.push(options.generator.clone());
    command.push(format!("--log-level={}", options.log_level));
    for def in &options.definitions {
        command.push(def.render());
    }
    command.push("-S".to_string());
    command.push(options.source_root.display().to_string());
    command.push("-B".to_string());
    command.push(options.build_root.display().to_string());
    command
}

/// Run the configure step.
pub fn generate(options: &GenerateOptions) -> Result<()> {
    let command = make_generate_command(options);
    ui::log_debug(format!("{:?}", command));

    let mut cmd = Command::new(&command[0]);
    cmd.args(&command[1..]);
    if let Some(compiler) = options.compiler {
        cmd.env("CC", compiler.c()).env("CXX", compiler.cpp());
        ui::log_debug(format!("CC = {}", compiler.c()));
        ui::log_debug(format!("CXX = {}", compiler.cpp()));
    }

    let output = run_with_spinner(cmd, "Configuring with CMake...")?;
    report(&output, "configure")
}

/// Run `cmake --build` on a configured build directory.
pub fn build(build_root: &Path) -> Result<()> {
    let mut cmd = Command::new("cmake");
    cmd.arg("--build").arg(build_root);

    let output = run_with_spinner(cmd, "Building...")?;
    report(&output, "build")
}

fn run_with_spinner(mut cmd: Command, message: &str) -> Result<Output> {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());

    let output = cmd.output().context("failed to launch cmake")?;
    pb.finish_and_clear();
    Ok(output)
}

fn report(output: &Output, phase: &str) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let warnings = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|line| WARNING_LINE.is_match(line))
        .count();
    let failed = stdout
        .lines()
        .chain(stderr.lines())
        .any(|line| FAILED_LINE.is_match(line));

    if !output.status.success() || failed {
        println!("{} CMake {} failed:", "x".red(), phase);
        let err = stderr.trim();
        if !err.is_empty() {
            println!("{}", err);
        }
        bail!("cmake {} failed", phase);
    }

    if warnings > 0 {
        println!(
            "{} CMake {} finished with {} warning(s)",
            "!".yellow(),
            phase,
            warnings
        );
    } else {
        println!("{} CMake {} finished", "✓".green(), phase);
    }
    Ok(())
}
