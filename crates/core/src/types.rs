//! Public result types: definition records, diagnostics, and the per-file
//! scan result with its outline queries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::profile::ProfileId;
use crate::span::Span;

// ---------------------------------------------------------------------------
// Definition kinds
// ---------------------------------------------------------------------------

/// The kind of a recognized definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Function,
    Method,
    Class,
    Struct,
    Enum,
    Trait,
    Interface,
    Impl,
    Module,
    Block,
}

impl DefinitionKind {
    pub fn label(&self) -> &'static str {
        match self {
            DefinitionKind::Function => "fn",
            DefinitionKind::Method => "method",
            DefinitionKind::Class => "class",
            DefinitionKind::Struct => "struct",
            DefinitionKind::Enum => "enum",
            DefinitionKind::Trait => "trait",
            DefinitionKind::Interface => "interface",
            DefinitionKind::Impl => "impl",
            DefinitionKind::Module => "module",
            DefinitionKind::Block => "block",
        }
    }

    /// Map a definition keyword (case-insensitive) to a kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword.to_ascii_lowercase().as_str() {
            "function" | "func" | "fn" | "def" | "sub" | "procedure" | "proc" => {
                DefinitionKind::Function
            }
            "class" | "object" | "record" => DefinitionKind::Class,
            "struct" | "union" | "table" | "type" => DefinitionKind::Struct,
            "enum" => DefinitionKind::Enum,
            "trait" => DefinitionKind::Trait,
            "interface" | "protocol" => DefinitionKind::Interface,
            "impl" | "extension" => DefinitionKind::Impl,
            "namespace" | "module" | "mod" | "package" => DefinitionKind::Module,
            "view" | "trigger" | "index" | "macro_rules" => DefinitionKind::Block,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether definitions nested directly inside this kind are members
    /// (functions become methods).
    pub fn holds_members(&self) -> bool {
        matches!(
            self,
            DefinitionKind::Class
                | DefinitionKind::Struct
                | DefinitionKind::Trait
                | DefinitionKind::Interface
                | DefinitionKind::Impl
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, DefinitionKind::Function | DefinitionKind::Method)
    }
}

// ---------------------------------------------------------------------------
// Definition records
// ---------------------------------------------------------------------------

/// One recognized definition. Records live in [`ScanResult::definitions`] and
/// refer to their parent by index.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionRecord {
    pub kind: DefinitionKind,
    /// May be empty (anonymous classes, `struct {`) or non-ASCII.
    pub name: String,
    pub signature_span: Span,
    /// `None` when no body was ever opened (truncated input or a
    /// declaration-only form such as `struct Unit;`).
    pub body_span: Option<Span>,
    pub depth: usize,
    /// Index of the enclosing record, always smaller than this record's index.
    pub parent: Option<usize>,
    /// 1-based first line of the signature.
    pub start_line: usize,
    /// 1-based last line covered by the body (or the signature when bodiless).
    pub end_line: usize,
    /// One-line signature with whitespace collapsed.
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Doc comment tags such as `@param` and `@returns`, keyed without the `@`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub doc_tags: BTreeMap<String, Vec<String>>,
}

impl DefinitionRecord {
    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Full extent of the definition: signature through end of body.
    pub fn extent(&self) -> (usize, usize) {
        let end = self
            .body_span
            .map(|b| b.end.max(self.signature_span.end))
            .unwrap_or(self.signature_span.end);
        (self.signature_span.start, end)
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnbalancedDelimiter,
    UnterminatedLiteral,
    UnterminatedComment,
    /// A signature that could not be resolved (lookahead overflow, truncated
    /// header, missing header terminator).
    UnknownConstruct,
    /// The classifier fell back to the generic profile.
    UnrecognizedProfile,
    /// Leading whitespace mixes tabs and spaces.
    MixedIndentation,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnbalancedDelimiter => "unbalanced_delimiter",
            DiagnosticKind::UnterminatedLiteral => "unterminated_literal",
            DiagnosticKind::UnterminatedComment => "unterminated_comment",
            DiagnosticKind::UnknownConstruct => "unknown_construct",
            DiagnosticKind::UnrecognizedProfile => "unrecognized_profile",
            DiagnosticKind::MixedIndentation => "mixed_indentation",
        }
    }
}

/// A non-fatal issue found while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Scan result
// ---------------------------------------------------------------------------

/// How the profile for a file was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifiedBy {
    Override,
    Extension,
    Shebang,
    Content,
    Fallback,
}

/// Everything a scan produced for one file. Definitions are in source order.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub profile: ProfileId,
    pub classified_by: ClassifiedBy,
    pub definitions: Vec<DefinitionRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    /// All definitions with this exact name.
    pub fn find(&self, name: &str) -> Vec<&DefinitionRecord> {
        self.definitions.iter().filter(|d| d.name == name).collect()
    }

    /// First function or method with this name.
    pub fn find_function(&self, name: &str) -> Option<&DefinitionRecord> {
        self.definitions.iter().find(|d| d.kind.is_callable() && d.name == name)
    }

    /// Innermost function or method whose lines include `line` (1-based).
    pub fn function_at_line(&self, line: usize) -> Option<&DefinitionRecord> {
        self.definitions
            .iter()
            .filter(|d| d.kind.is_callable() && d.contains_line(line))
            .max_by_key(|d| d.depth)
    }

    pub fn functions(&self) -> Vec<&DefinitionRecord> {
        self.definitions.iter().filter(|d| d.kind.is_callable()).collect()
    }

    /// Records without a parent.
    pub fn top_level(&self) -> Vec<&DefinitionRecord> {
        self.definitions.iter().filter(|d| d.parent.is_none()).collect()
    }

    /// Indices of the direct children of the record at `index`.
    pub fn children(&self, index: usize) -> Vec<usize> {
        self.definitions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Dotted name through all ancestors, e.g. `Outer.Inner.method`.
    pub fn qualified_name(&self, index: usize) -> Option<String> {
        let mut parts = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let record = self.definitions.get(i)?;
            if !record.name.is_empty() {
                parts.push(record.name.as_str());
            }
            cursor = record.parent;
        }
        parts.reverse();
        Some(parts.join("."))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}
