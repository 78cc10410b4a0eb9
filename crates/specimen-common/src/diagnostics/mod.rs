//! Diagnostic types, message lookup and the per-run accumulator.
//!
//! Message templates live in `data.rs` and use `{0}`, `{1}`, ... placeholders.
//! Every synthesis call owns its own [`Diagnostics`]; nothing here is global,
//! so concurrent runs never see each other's records.

use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DiagnosticCategory {
    Message = 0,
    Warning = 1,
    Error = 2,
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// One record produced while synthesizing a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
    /// Display name of the type being synthesized when the record was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl Diagnostic {
    /// Build a diagnostic from the message table.
    ///
    /// Unknown codes still produce a record (as an error) so that a missing
    /// table entry never hides a failure.
    #[must_use]
    pub fn from_code(code: u32, type_name: &str, args: &[&str]) -> Self {
        let (category, text) = match get_diagnostic_message(code) {
            Some(msg) => (msg.category, format_message(msg.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            category,
            code,
            message_text: text,
            type_name: Some(type_name.to_string()),
        }
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

// =============================================================================
// Diagnostics - per-run accumulator
// =============================================================================

/// Append-only list of diagnostics recorded during one synthesis run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Record a table-driven diagnostic for `type_name`.
    pub fn report(&mut self, code: u32, type_name: &str, args: &[&str]) {
        self.push(Diagnostic::from_code(code, type_name, args));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any record is at least `category`.
    pub fn has_at_least(&self, category: DiagnosticCategory) -> bool {
        self.entries.iter().any(|d| d.category >= category)
    }

    pub fn has_warnings(&self) -> bool {
        self.has_at_least(DiagnosticCategory::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.has_at_least(DiagnosticCategory::Error)
    }

    /// Returns `true` if any record carries `code`.
    pub fn contains_code(&self, code: u32) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
