//! Rendering of diagnostics against their source.

use ariadne::{Label, Report, ReportKind, Source};
use matoy_diagnostic::{Severity, SourceDiagnostic};

/// Prints the diagnostics to stderr with their source excerpts.
pub fn render(source_name: &str, text: &str, diagnostics: &[SourceDiagnostic]) {
    for diagnostic in diagnostics {
        let kind = match diagnostic.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let start = char_offset(text, diagnostic.span.start as usize);
        let end = char_offset(text, diagnostic.span.end as usize);

        let mut report = Report::build(kind, source_name, start)
            .with_message(&diagnostic.message)
            .with_label(
                Label::new((source_name, start..end)).with_message(&diagnostic.message),
            );
        if !diagnostic.hints.is_empty() {
            report = report.with_help(diagnostic.hints.join("\n"));
        }

        let _ = report.finish().eprint((source_name, Source::from(text)));
    }
}

/// Converts a byte offset into the char offset ariadne labels expect.
fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}
