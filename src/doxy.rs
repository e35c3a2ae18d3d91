//! Doxygen wrapper and Doxyfile editing.
//!
//! Ensures a Doxyfile exists, applies `NAME = value` attribute overrides
//! to it, and runs `doxygen` behind a spinner. Attribute values follow
//! Doxyfile quoting: whitespace separates parts, double quotes group a
//! part containing spaces.

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;

pub const DOXYFILE: &str = "Doxyfile";

pub fn doxygen_exists() -> bool {
    Command::new("doxygen").arg("--version").output().is_ok()
}

/// Split a raw attribute value into parts, honoring double-quoted
/// segments. Quotes are stripped; empty parts are dropped.
pub fn split_attribute_values(raw: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in raw.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if !in_quotes => {} // line continuation marker
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Join parts back into Doxyfile syntax: parts containing spaces are
/// quoted, multiple parts continue across lines.
pub fn join_attribute_values(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| {
            if v.contains(' ') {
                format!("\"{}\"", v)
            } else {
                v.clone()
            }
        })
        .collect();
    quoted.join(" \\\n\t")
}

/// One `NAME = value` Doxyfile attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoxygenAttribute {
    pub name: String,
    pub values: Vec<String>,
}

impl DoxygenAttribute {
    pub fn new(name: impl Into<String>, raw_value: &str) -> Self {
        Self {
            name: name.into(),
            values: split_attribute_values(raw_value),
        }
    }

    /// Parse a `NAME=VALUE` override argument.
    pub fn parse(raw: &str) -> Option<Self> {
        let (name, value) = raw.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value.trim()))
    }

    pub fn render(&self) -> String {
        format!("{} = {}", self.name, join_attribute_values(&self.values))
    }
}

/// Apply overrides to Doxyfile text: existing attribute lines are
/// replaced, missing attributes are appended.
pub fn apply_attributes(doxyfile: &str, attributes: &[DoxygenAttribute]) -> String {
    let mut remaining: Vec<&DoxygenAttribute> = attributes.iter().collect();
    let mut out_lines: Vec<String> = Vec::new();

    for line in doxyfile.lines() {
        let trimmed = line.trim_start();
        let replaced = remaining.iter().position(|attr| {
            !trimmed.starts_with('#')
                && trimmed
                    .strip_prefix(attr.name.as_str())
                    .is_some_and(|rest| rest.trim_start().starts_with('='))
        });
        match replaced {
            Some(index) => {
                let attr = remaining.remove(index);
                out_lines.push(attr.render());
            }
            None => out_lines.push(line.to_string()),
        }
    }
    for attr in remaining {
        out_lines.push(attr.render());
    }

    let mut out = out_lines.join("\n");
    out.push('\n');
    out
}

fn ensure_doxyfile() -> Result<()> {
    if Path::new(DOXYFILE).exists() {
        return Ok(());
    }

    println!("   Creating default Doxyfile...");
    let project_name = std::env::current_dir()?
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let contents = format!(
        r#"PROJECT_NAME           = "{}"
OUTPUT_DIRECTORY       = docs
INPUT                  = source include
RECURSIVE              = YES
GENERATE_HTML          = YES
GENERATE_LATEX         = NO
EXTRACT_ALL            = YES
"#,
        project_name
    );
    fs::write(DOXYFILE, contents)?;
    Ok(())
}

fn run_doxygen() -> Result<Output> {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Running Doxygen...");

    let output = Command::new("doxygen").output()?;
    pb.finish_and_clear();
    Ok(output)
}

/// Generate documentation, applying attribute overrides first.
pub fn generate_docs(overrides: &[DoxygenAttribute]) -> Result<()> {
    println!("{} Generating documentation...", "📚".magenta());

    if !doxygen_exists() {
        println!("{} Doxygen not found. Please install it first.", "x".red());
        return Ok(());
    }

    ensure_doxyfile()?;

    if !overrides.is_empty() {
        let current = fs::read_to_string(DOXYFILE).context("failed to read Doxyfile")?;
        fs::write(DOXYFILE, apply_attributes(&current, overrides))?;
    }

    let output = run_doxygen()?;

    if output.status.success() {
        println!(
            "{} Documentation generated in docs/html/index.html",
            "✓".green()
        );
    } else {
        println!("{} Doxygen failed:", "x".red());
        println!("{}", String::from_utf8_lossy(&output.stderr));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_and_quoted_parts() {
        assert_eq!(split_attribute_values("a b c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_attribute_values(r#"src "My Project" include"#),
            vec!["src", "My Project", "include"]
        );
    }

    #[test]
    fn split_drops_continuations_and_blanks() {
        assert_eq!(
            split_attribute_values("one \\\n\ttwo"),
            vec!["one", "two"]
        );
        assert!(split_attribute_values("   ").is_empty());
    }

    #[test]
    fn join_quotes_parts_with_spaces() {
        let values = vec!["src".to_string(), "My Project".to_string()];
        assert_eq!(join_attribute_values(&values), "src \\\n\t\"My Project\"");
    }

    #[test]
    fn split_then_join_round_trips() {
        let raw = r#"src "My Project" include"#;
        let rejoined = join_attribute_values(&split_attribute_values(raw));
        assert_eq!(split_attribute_values(&rejoined), split_attribute_values(raw));
    }

    #[test]
    fn apply_replaces_existing_attribute() {
        let doxyfile = "PROJECT_NAME = old\nINPUT = src\n";
        let attrs = vec![DoxygenAttribute::new("PROJECT_NAME", "new")];
        let updated = apply_attributes(doxyfile, &attrs);
        assert!(updated.contains("PROJECT_NAME = new"));
        assert!(!updated.contains("old"));
        assert!(updated.contains("INPUT = src"));
    }

    #[test]
    fn apply_appends_missing_attribute() {
        let updated = apply_attributes(
            "INPUT = src\n",
            &[DoxygenAttribute::new("GENERATE_XML", "YES")],
        );
        assert!(updated.ends_with("GENERATE_XML = YES\n"));
    }

    #[test]
    fn comment_lines_are_never_replaced() {
        let doxyfile = "# INPUT = ignored\nINPUT = src\n";
        let updated = apply_attributes(doxyfile, &[DoxygenAttribute::new("INPUT", "include")]);
        assert!(updated.contains("# INPUT = ignored"));
        assert!(updated.contains("INPUT = include"));
    }

    #[test]
    fn parse_override_argument() {
        let attr = DoxygenAttribute::parse("OUTPUT_DIRECTORY=docs").unwrap();
        assert_eq!(attr.name, "OUTPUT_DIRECTORY");
        assert_eq!(attr.values, vec!["docs"]);
        assert!(DoxygenAttribute::parse("nonsense").is_none());
    }
}
