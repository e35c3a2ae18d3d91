//! # adze - C/C++ Developer Toolbox
//!
//! adze is a grab-bag of the small utilities C/C++ repositories keep
//! re-inventing: directory traversal, source line counting, enum codegen,
//! and thin wrappers around the usual external tools (cmake, doxygen, git,
//! the system package manager).
//!
//! ## Quick Start
//!
//! ```bash
//! # List a tree, skipping build output
//! adze list src -r --ignore build
//!
//! # Turn an enum into a name lookup table
//! adze enum ActionResult include/result.hpp --table
//! ```
//!
//! ## Module Organization
//!
//! - [`walk`] - Recursive directory traversal with symlink handling
//! - [`cpp`] - C++ source parsing and boilerplate generation
//! - [`linecount`] - Line counting over source trees
//! - [`cmake`] / [`doxy`] / [`git`] / [`pacman`] - External tool wrappers

/// CMake configure/build wrapper.
pub mod cmake;

/// Configuration file parsing (`adze.toml`).
pub mod config;

/// C++ source parsing and codegen (enums, types).
pub mod cpp;

/// Doxygen wrapper and Doxyfile editing.
pub mod doxy;

/// Git helpers built on the `git` executable.
pub mod git;

/// Source line counting.
pub mod linecount;

/// Symbolic link creation.
pub mod link;

/// System package manager abstraction.
pub mod pacman;

/// Redirect-script generation (.sh/.bat wrappers).
pub mod redirect;

/// C++ library module scaffolding.
pub mod scaffold;

/// Shebang rewriting for shell scripts.
pub mod shebang;

/// Terminal output utilities (logger, tables).
pub mod ui;

/// Directory traversal primitives.
pub mod walk;
