use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A problem found while importing Markdown, with its source location.
#[derive(Debug, Clone)]
pub struct ImportError {
    pub message: String,
    /// Byte range in the Markdown source.
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ImportError {
    fn new(severity: Severity, message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ImportError {
            message: message.into(),
            span,
            file_id,
            severity,
            notes: Vec::new(),
        }
    }

    /// Fails the import.
    pub fn error(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(Severity::Error, message, span, file_id)
    }

    /// Reported, but the import still produces blocks.
    pub fn warning(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(Severity::Warning, message, span, file_id)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }

    /// 1-based line on which the span starts.
    pub fn line(&self, source: &str) -> usize {
        let end = self.span.start.min(source.len());
        source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ImportError {}
