//! C++ type name handling.
//!
//! Splits a type name like `const int*&` into ordered parts and answers
//! pointer/reference/const questions about the outermost level. West-const
//! spellings are normalized so `const int` and `int const` compare equal.

use super::CppError;
use std::fmt;

/// Split a type name on `*` and `&` (kept as parts) and whitespace
/// (discarded), then normalize const placement: a leading `const` moves
/// after the root name and doubled `const` collapses.
fn split_type_name(name: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in name.chars() {
        match c {
            '*' | '&' => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
                parts.push(c.to_string());
            }
            c if c.is_whitespace() => {
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

    if parts.len() > 1 {
        if parts[0] == "const" {
            let leading = parts.remove(0);
            parts.insert(1, leading);
        }
        parts.dedup_by(|a, b| a == "const" && b == "const");
    }

    parts
}

/// A C++ type, held as its normalized part list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    name: String,
    parts: Vec<String>,
    root: String,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let parts = split_type_name(&name);
        let root = parts.first().cloned().unwrap_or_default();
        Self { name, parts, root }
    }

    /// The name string this type was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The root type name, without qualifiers or declarators.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_const(&self) -> bool {
        self.parts.last().is_some_and(|p| p == "const")
    }

    /// The outermost declarator, looking past a trailing `const`.
    fn last_declarator(&self) -> Option<&str> {
        let mut index = self.parts.len().checked_sub(1)?;
        if self.is_const() {
            index = index.checked_sub(1)?;
        }
        self.parts.get(index).map(String::as_str)
    }

    pub fn is_pointer(&self) -> bool {
        self.last_declarator() == Some("*")
    }

    pub fn is_reference(&self) -> bool {
        self.last_declarator() == Some("&")
    }

    pub fn add_pointer(&mut self) -> Result<(), CppError> {
        if self.is_reference() {
            return Err(CppError::InvalidType(format!(
                "cannot make a pointer to reference type '{}'",
                self
            )));
        }
        self.parts.push("*".to_string());
        Ok(())
    }

    pub fn add_reference(&mut self) {
        self.parts.push("&".to_string());
    }

    pub fn add_const(&mut self) -> Result<(), CppError> {
        if self.is_reference() {
            return Err(CppError::InvalidType(format!(
                "cannot make a const reference type '{}'",
                self
            )));
        }
        if !self.is_const() {
            self.parts.push("const".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join(" "))
    }
}

/// A typed variable, rendered as a C++ definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    ty: Type,
    name: String,
}

impl Variable {
    pub fn new(ty: Type, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_definition(&self) -> String {
        format!("{} {}", self.ty, self.name)
    }
}
