//! Enum extraction and enum<->string conversion table generation.
//!
//! Scans C++-ish source text for an `enum class` declaration, collects its
//! members, and can re-emit either the declaration or a static
//! `std::array<std::pair<T, const char*>, N>` lookup table so callers get
//! name conversion without runtime reflection.

use super::{strip_block_comments, strip_line_comments};
use regex::Regex;
use std::sync::LazyLock;

static ENUM_CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"enum class ([a-zA-Z_]*)").unwrap());
static VALUE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z_]*").unwrap());

/// One enumerator: a name plus the raw literal after `=`, if any.
/// The value text is never evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("{} = {}", self.name, value),
            None => self.name.clone(),
        }
    }
}

/// A parsed enum declaration. Member order matches declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

impl Enum {
    /// Locate `enum class <type_name>` in `source` and parse from there.
    /// `None` when the name does not occur; never a partial result.
    pub fn parse_from_source(type_name: &str, source: &str) -> Option<Enum> {
        let anchor = format!("enum class {}", type_name);
        let start = source.find(&anchor)?;
        Some(parse_enum(&source[start..]))
    }

    /// Re-emit the declaration as C++ source.
    pub fn render_declaration(&self) -> String {
        let members: Vec<String> = self
            .values
            .iter()
            .map(|v| format!("\t{}", v.render()))
            .collect();
        format!(
            "enum class {}\n{{\n{}\n}};\n",
            self.name,
            members.join(",\n")
        )
    }

    /// Emit a statically-sized `(enum, name)` pair array in declaration
    /// order, suitable for pasting into a translation unit.
    pub fn render_conversion_table(&self) -> String {
        let pair_type = make_pair_type(&self.name, "const char*");
        let entries: Vec<String> = self
            .values
            .iter()
            .map(|v| format!("{}{{ {}::{}, \"{}\" }}", pair_type, self.name, v.name, v.name))
            .collect();
        format!(
            "{}\n{{\n{}\n}}\n",
            make_array_type(&pair_type, entries.len()),
            entries.join(",\n")
        )
    }
}

pub fn make_pair_type(lhs: &str, rhs: &str) -> String {
    format!("std::pair<{}, {}>", lhs, rhs)
}

pub fn make_array_type(element: &str, len: usize) -> String {
    format!("std::array<{}, {}>", element, len)
}

/// Line-scanner states. The scan starts before the body, enters it at a
/// `{` line, and is finished at the first `};` line.
enum ScanState {
    SeekingOpen,
    InBody,
    Done,
}

/// Parse an enum declaration from text starting at or before it.
///
/// Comments are stripped up front and blank lines skipped. Every scanned
/// line re-matches the `enum class <name>` pattern, so the last matching
/// line wins. A body that never opens or never closes degrades to an
/// empty or partial member list.
pub fn parse_enum(text: &str) -> Enum {
    let stripped = strip_line_comments(&strip_block_comments(text));

    let mut name = String::new();
    let mut member_lines: Vec<String> = Vec::new();
    let mut state = ScanState::SeekingOpen;

    for raw in stripped.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(captures) = ENUM_CLASS_NAME.captures(line) {
            name = captures[1].to_string();
        }

        match state {
            ScanState::InBody => {
                if line.starts_with("};") {
                    state = ScanState::Done;
                } else {
                    let member = line.strip_suffix(',').unwrap_or(line);
                    member_lines.push(member.to_string());
                }
            }
            ScanState::SeekingOpen => {
                if line.starts_with('{') {
                    state = ScanState::InBody;
                } else if line.starts_with("};") {
                    state = ScanState::Done;
                }
            }
            ScanState::Done => {}
        }

        if matches!(state, ScanState::Done) {
            break;
        }
    }

    let mut values = Vec::new();
    for line in &member_lines {
        let value_name = VALUE_NAME
            .find(line)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        // Cut at the first `=`; everything after it is the raw value.
        let value = line
            .split_once('=')
            .map(|(_, rest)| rest.trim().to_string());
        values.push(EnumValue::new(value_name, value));
    }

    Enum { name, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTION_RESULT: &str = r#"
/**
 * @brief Result type returned by action callback functions.
*/
enum class ActionResult : i32
{
	ok = 0,
	error = 1,
	/**
	 * @brief Action was invalid.
	*/
	invalid_action_error,
	/**
	 * @brief Offset for user defined action result codes.
	*/
	user_result = 1000,
};
"#;

    #[test]
    fn parses_simple_enum() {
        let source = "enum class Color\n{\n\tred,\n\tgreen,\n\tblue = 10,\n};";
        let parsed = Enum::parse_from_source("Color", source).unwrap();
        assert_eq!(parsed.name, "Color");
        assert_eq!(
            parsed.values,
            vec![
                EnumValue::new("red", None),
                EnumValue::new("green", None),
                EnumValue::new("blue", Some("10".to_string())),
            ]
        );
    }

    #[test]
    fn parses_enum_with_underlying_type() {
        let source = "enum class Status : i32\n{\n\tok = 0,\n\terror = 1,\n};";
        let parsed = Enum::parse_from_source("Status", source).unwrap();
        assert_eq!(parsed.name, "Status");
        assert_eq!(parsed.values[0].value.as_deref(), Some("0"));
        assert_eq!(parsed.values[1].value.as_deref(), Some("1"));
    }

    #[test]
    fn doc_comments_never_reach_members() {
        let parsed = Enum::parse_from_source("ActionResult", ACTION_RESULT).unwrap();
        let names: Vec<&str> = parsed.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["ok", "error", "invalid_action_error", "user_result"]
        );
        for value in &parsed.values {
            assert!(!value.name.contains('@'));
            if let Some(v) = &value.value {
                assert!(!v.contains('*'));
            }
        }
    }

    #[test]
    fn absent_name_is_none() {
        assert!(Enum::parse_from_source("Missing", ACTION_RESULT).is_none());
    }

    #[test]
    fn malformed_body_degrades_to_empty_members() {
        let parsed = parse_enum("enum class Lonely;\n");
        assert_eq!(parsed.name, "Lonely");
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn last_enum_class_line_wins() {
        let source = "enum class First;\nenum class Second\n{\n\ta,\n};";
        let parsed = parse_enum(source);
        assert_eq!(parsed.name, "Second");
        assert_eq!(parsed.values.len(), 1);
    }

    #[test]
    fn multiple_equals_cut_at_first() {
        let parsed = parse_enum("enum class E\n{\n\ta = Mask::x | Mask::y,\n\tb = 1 == 1,\n};");
        assert_eq!(parsed.values[0].value.as_deref(), Some("Mask::x | Mask::y"));
        assert_eq!(parsed.values[1].value.as_deref(), Some("1 == 1"));
    }

    #[test]
    fn declaration_render_round_trips() {
        let parsed = Enum::parse_from_source("ActionResult", ACTION_RESULT).unwrap();
        let rendered = parsed.render_declaration();
        let reparsed = parse_enum(&rendered);
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn conversion_table_lists_members_in_order() {
        let parsed = Enum::parse_from_source("Status", "enum class Status\n{\n\tok,\n\tbad,\n};")
            .unwrap();
        let table = parsed.render_conversion_table();
        assert!(table.starts_with("std::array<std::pair<Status, const char*>, 2>"));
        let ok_pos = table.find("Status::ok").unwrap();
        let bad_pos = table.find("Status::bad").unwrap();
        assert!(ok_pos < bad_pos);
        assert!(table.contains("\"ok\""));
        assert!(table.contains("\"bad\""));
    }
}
