//! C++ library module scaffolding.
//!
//! Lays out the module shape the rest of the toolbox expects: a public
//! header under `include/<name>/`, an implementation under `source/`, and
//! a CMakeLists.txt wired with the usual source/include/link variables.

use anyhow::{Result, bail};
use colored::*;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static INVALID_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z_\-]").unwrap());

pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty() && !INVALID_NAME.is_match(name)
}

fn make_cmakelists(name: &str) -> String {
    format!(
        r#"cmake_minimum_required(VERSION 3.12)

project({name}
	VERSION 0.1)

# The library's sources
set(_sources
	source/{name}.cpp)

# The library's public linked libraries
set(_link_public
	)

# The library's private linked libraries
set(_link_private
	)

# The library's public include directories
set(_include_public
	include)

# The library's private include directories
set(_include_private
	source)

add_library(${{PROJECT_NAME}} STATIC ${{_sources}})

target_include_directories(${{PROJECT_NAME}}
	PUBLIC ${{_include_public}}
	PRIVATE ${{_include_private}})

target_link_libraries(${{PROJECT_NAME}}
	PUBLIC ${{_link_public}}
	PRIVATE ${{_link_private}})

install(TARGETS ${{PROJECT_NAME}}
	DESTINATION lib/)
"#
    )
}

fn make_header(name: &str) -> String {
    format!(
        r#"#pragma once

namespace {name}
{{
}}
"#
    )
}

fn make_source(name: &str) -> String {
    format!("#include <{name}/{name}.hpp>\n")
}

/// Create a new module skeleton under `root/<name>`.
pub fn new_module(name: &str, root: &Path) -> Result<()> {
    if !is_valid_module_name(name) {
        bail!(
            "invalid module name '{}' (letters, underscore, and dash only)",
            name
        );
    }

    let module_root = root.join(name);
    if module_root.exists() {
        bail!("module directory '{}' already exists", module_root.display());
    }

    let include_dir = module_root.join("include").join(name);
    let source_dir = module_root.join("source");
    fs::create_dir_all(&include_dir)?;
    fs::create_dir_all(&source_dir)?;

    fs::write(include_dir.join(format!("{name}.hpp")), make_header(name))?;
    fs::write(source_dir.join(format!("{name}.cpp")), make_source(name))?;
    fs::write(module_root.join("CMakeLists.txt"), make_cmakelists(name))?;

    println!(
        "{} Created module '{}' at {}",
        "✓".green(),
        name.bold(),
        module_root.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_module_names() {
        assert!(is_valid_module_name("audio_engine"));
        assert!(is_valid_module_name("net-core"));
        assert!(!is_valid_module_name(""));
        assert!(!is_valid_module_name("bad name"));
        assert!(!is_valid_module_name("v2.0"));
    }

    #[test]
    fn creates_the_module_layout() {
        let dir = tempfile::tempdir().unwrap();
        new_module("widget", dir.path()).unwrap();

        let root = dir.path().join("widget");
        assert!(root.join("include").join("widget").join("widget.hpp").exists());
        assert!(root.join("source").join("widget.cpp").exists());

        let cmake = fs::read_to_string(root.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("project(widget"));
        assert!(cmake.contains("source/widget.cpp"));
        assert!(cmake.contains("add_library(${PROJECT_NAME} STATIC"));
    }

    #[test]
    fn refuses_existing_directories() {
        let dir = tempfile::tempdir().unwrap();
        new_module("widget", dir.path()).unwrap();
        assert!(new_module("widget", dir.path()).is_err());
    }
}
