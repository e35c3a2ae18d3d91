//! C++ source parsing and boilerplate generation.
//!
//! Text-level helpers only; nothing here evaluates C++. Comment stripping
//! runs before any structural parsing so comments can never leak into
//! parsed names or values.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub mod enums;
pub mod types;

#[derive(Debug, Error)]
pub enum CppError {
    #[error("invalid type: {0}")]
    InvalidType(String),
}

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//.*").unwrap());
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""[^"]*""#).unwrap());

/// Remove every `/* ... */` section, multi-line included.
pub fn strip_block_comments(source: &str) -> String {
    BLOCK_COMMENT.replace_all(source, "").into_owned()
}

/// Remove `//` comments to end of line.
pub fn strip_line_comments(source: &str) -> String {
    LINE_COMMENT.replace_all(source, "").into_owned()
}

/// Remove double-quoted string literals from a single line.
pub fn strip_string_literals(line: &str) -> String {
    STRING_LITERAL.replace_all(line, "").into_owned()
}
