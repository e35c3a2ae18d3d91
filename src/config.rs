//! Configuration file parsing (`adze.toml`).
//!
//! Looked up in the working directory first, then `~/.adze/config.toml`.
//! Everything is optional; a missing file is an empty config.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "adze.toml";

#[derive(Deserialize, Debug, Default)]
pub struct AdzeConfig {
    pub build: Option<BuildConfig>,
    pub walk: Option<WalkConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct BuildConfig {
    /// CMake generator name.
    pub generator: Option<String>,
    /// Build directory root.
    pub build_root: Option<PathBuf>,
    /// Compiler exported via CC/CXX (clang or gcc).
    pub compiler: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct WalkConfig {
    /// Patterns merged into every `adze list` ignore set.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::home_dir()
        .map(|home| home.join(".adze").join("config.toml"))
        .filter(|path| path.exists())
}

pub fn load() -> Result<AdzeConfig> {
    let Some(path) = config_path() else {
        return Ok(AdzeConfig::default());
    };
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let raw = r#"
[build]
generator = "Ninja"
build_root = "_build"
compiler = "clang"

[walk]
ignore = ["\\.git", "build"]
"#;
        let config: AdzeConfig = toml::from_str(raw).unwrap();
        let build = config.build.unwrap();
        assert_eq!(build.generator.as_deref(), Some("Ninja"));
        assert_eq!(build.build_root, Some(PathBuf::from("_build")));
        assert_eq!(config.walk.unwrap().ignore.len(), 2);
    }

    #[test]
    fn empty_config_is_fine() {
        let config: AdzeConfig = toml::from_str("").unwrap();
        assert!(config.build.is_none());
        assert!(config.walk.is_none());
    }
}
