use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A problem found while reading a document, tied to the byte range of
/// the source it concerns.
///
/// Errors stop the parse. Warnings ride along on the finished
/// [`CommandTree`](crate::CommandTree) and are only shown on request.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ParseError {
    fn new(severity: Severity, message: String, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message,
            span,
            file_id,
            severity,
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(Severity::Error, message.into(), span, file_id)
    }

    pub fn warning(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(Severity::Warning, message.into(), span, file_id)
    }

    /// Attach an explanation shown below the source snippet.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity <= Severity::Warning
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let label = Label::primary(self.file_id, self.span.clone());
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![label])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_decides_warning() {
        let warning = ParseError::warning("heading 'x' is unreachable", 3..9, 0);
        let error = ParseError::error("document is empty", 0..0, 0).with_note("add a heading");
        assert!(warning.is_warning());
        assert!(!error.is_warning());
        assert_eq!(error.to_string(), "document is empty");
        assert_eq!(error.to_diagnostic().notes, ["add a heading"]);
    }
}
