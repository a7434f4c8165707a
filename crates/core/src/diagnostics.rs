//! Diagnostics collection shared by every pipeline stage.
//!
//! Stages push into one [`Diagnostics`] collector; [`Diagnostics::finish`]
//! orders everything by span. Nothing recorded here ever stops a scan.

use crate::span::Span;
use crate::types::{Diagnostic, DiagnosticKind, Severity};

#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        self.items.push(Diagnostic { severity, kind, span, message: message.into() });
    }

    pub fn warning(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        self.push(Severity::Warning, kind, span, message);
    }

    pub fn error(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        self.push(Severity::Error, kind, span, message);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// All diagnostics ordered by span start, then end. Ties keep the order in
    /// which stages reported them.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.items.sort_by_key(|d| (d.span.start, d.span.end));
        self.items
    }
}
