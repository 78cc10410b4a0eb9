use colored::Colorize;
use specimen_synth::{Diagnostic, DiagnosticCategory};

/// Renders diagnostics as `Type - category SPcode: message` lines.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render<'a>(&self, diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.into_iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let category = self.format_category(diagnostic.category);
        let code = self.format_code(diagnostic.code);

        let mut output = String::new();
        output.push_str(diagnostic.type_name.as_deref().unwrap_or("<unknown>"));
        output.push_str(" - ");
        output.push_str(&category);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        output
    }

    /// One-line outcome, e.g. `Synthesized 3 of 4 type(s); 1 failed.`
    pub fn format_summary(&self, succeeded: usize, failed: usize) -> String {
        let total = succeeded + failed;
        let line = if failed == 0 {
            format!("Synthesized {succeeded} of {total} type(s).")
        } else {
            format!("Synthesized {succeeded} of {total} type(s); {failed} failed.")
        };
        if !self.color {
            return line;
        }
        if failed == 0 {
            line.green().to_string()
        } else {
            line.red().bold().to_string()
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("SP{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
