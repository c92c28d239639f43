//! Diagnostics for parsing and evaluation.
//!
//! Errors start out as plain messages ([`StrResult`]) or messages with
//! hints ([`HintedResult`]) deep inside the evaluator, where no source
//! location is known. The [`At`] trait attaches a span on the way up,
//! turning them into located [`SourceDiagnostic`]s that a frontend can
//! render against the source text.

use std::fmt;

use matoy_syntax::{Span, SyntaxError};

/// Severity of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    /// The problem prevented evaluation.
    Error,
    /// The problem did not prevent evaluation.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// An error or warning located in the source.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceDiagnostic {
    /// Whether the diagnostic is an error or a warning.
    pub severity: Severity,
    /// The erroneous range in the source text.
    pub span: Span,
    /// What went wrong.
    pub message: String,
    /// Additional advice on resolving the problem.
    pub hints: Vec<String>,
}

impl SourceDiagnostic {
    /// Creates a new error diagnostic.
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
            hints: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic.
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            message: message.into(),
            hints: Vec::new(),
        }
    }

    /// Adds a hint.
    pub fn hint(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    /// Adds a hint, builder-style.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint(hint);
        self
    }
}

impl From<SyntaxError> for SourceDiagnostic {
    fn from(error: SyntaxError) -> Self {
        Self {
            severity: Severity::Error,
            span: error.span,
            message: error.message,
            hints: error.hints,
        }
    }
}

/// An error message with optional hints, not yet located in the source.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct HintedString {
    /// What went wrong.
    message: String,
    /// Additional advice on resolving the problem.
    hints: Vec<String>,
}

impl HintedString {
    /// Creates a new hinted message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), hints: Vec::new() }
    }

    /// The message without hints.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The hints.
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Adds a hint, builder-style.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl From<String> for HintedString {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HintedString {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl fmt::Display for HintedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A result whose error is a plain message.
pub type StrResult<T> = Result<T, String>;

/// A result whose error is a message with hints.
pub type HintedResult<T> = Result<T, HintedString>;

/// A result whose errors are located in the source.
pub type SourceResult<T> = Result<T, Vec<SourceDiagnostic>>;

/// Creates the diagnostic list for a single error at the given span.
#[must_use]
pub fn source_error(span: Span, message: impl Into<String>) -> Vec<SourceDiagnostic> {
    vec![SourceDiagnostic::error(span, message)]
}

/// Attaches a source location to an unlocated error.
pub trait At<T> {
    /// Locates the error at the given span.
    fn at(self, span: Span) -> SourceResult<T>;
}

impl<T, S: Into<HintedString>> At<T> for Result<T, S> {
    fn at(self, span: Span) -> SourceResult<T> {
        self.map_err(|error| {
            let HintedString { message, hints } = error.into();
            vec![SourceDiagnostic { severity: Severity::Error, span, message, hints }]
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn syntax_errors_convert_to_diagnostics() {
        let error = SyntaxError::new(Span::new(3, 7), "unclosed delimiter");
        let diag = SourceDiagnostic::from(error);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.span, Span::new(3, 7));
        assert_eq!(diag.message, "unclosed delimiter");
        assert!(diag.hints.is_empty());
    }

    #[test]
    fn at_locates_plain_messages() {
        let result: StrResult<i64> = Err("cannot add int and bool".into());
        let located = result.at(Span::new(1, 6));
        let diags = located.unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].span, Span::new(1, 6));
        assert_eq!(diags[0].message, "cannot add int and bool");
    }

    #[test]
    fn at_keeps_hints() {
        let result: HintedResult<i64> =
            Err(HintedString::new("unknown variable: x").with_hint("declare it first"));
        let diags = result.at(Span::point(4)).unwrap_err();
        assert_eq!(diags[0].hints, vec!["declare it first".to_string()]);
    }

    #[test]
    fn ok_passes_through() {
        let result: StrResult<i64> = Ok(5);
        assert_eq!(result.at(Span::point(0)), Ok(5));
    }

    #[test]
    fn severity_displays_lowercase() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
