//! Language classifier: picks the source profile for a file.
//!
//! Resolution order: explicit override, extension (caller map first, then the
//! built-in table), shebang, content sniffing, and finally the generic
//! profile. Classification is a pure function of its inputs and never fails.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::{profile_for_extension, ProfileId};
use crate::types::ClassifiedBy;

/// Number of leading lines inspected by shebang and content sniffing.
pub const SNIFF_LINES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub profile: ProfileId,
    pub classified_by: ClassifiedBy,
}

impl Classification {
    fn new(profile: ProfileId, classified_by: ClassifiedBy) -> Self {
        Classification { profile, classified_by }
    }
}

pub fn classify(
    filename: &str,
    content: &[u8],
    profile_override: Option<ProfileId>,
    extensions: &BTreeMap<String, ProfileId>,
) -> Classification {
    if let Some(id) = profile_override {
        return Classification::new(id, ClassifiedBy::Override);
    }
    if let Some(id) = by_filename(filename, extensions) {
        return Classification::new(id, ClassifiedBy::Extension);
    }
    let head = leading_lines(content, SNIFF_LINES);
    if let Some(id) = by_shebang(&head) {
        return Classification::new(id, ClassifiedBy::Shebang);
    }
    if let Some(id) = by_content(&head) {
        return Classification::new(id, ClassifiedBy::Content);
    }
    Classification::new(ProfileId::Generic, ClassifiedBy::Fallback)
}

fn by_filename(filename: &str, extensions: &BTreeMap<String, ProfileId>) -> Option<ProfileId> {
    let path = Path::new(filename);
    let base = path.file_name().and_then(|n| n.to_str()).unwrap_or(filename);
    if matches!(base, ".bashrc" | ".bash_profile" | ".zshrc" | ".profile" | "PKGBUILD") {
        return Some(ProfileId::Shell);
    }
    let ext = path.extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
    extensions.get(&ext).copied().or_else(|| profile_for_extension(&ext))
}

fn leading_lines(content: &[u8], max_lines: usize) -> String {
    let end = content
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'\n')
        .nth(max_lines.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    String::from_utf8_lossy(&content[..end]).into_owned()
}

// ---------------------------------------------------------------------------
// Shebang
// ---------------------------------------------------------------------------

fn by_shebang(head: &str) -> Option<ProfileId> {
    let first = head.lines().next()?.strip_prefix("#!")?;
    let mut tokens = first.split_whitespace();
    let mut interpreter = basename(tokens.next()?);
    if interpreter == "env" {
        interpreter = tokens.find(|t| !t.starts_with('-')).map(basename)?;
    }
    let name = interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
    match name {
        "python" | "pypy" => Some(ProfileId::Python),
        "node" | "nodejs" | "deno" | "bun" | "ts-node" => Some(ProfileId::JavaScript),
        "sh" | "bash" | "zsh" | "ksh" | "dash" | "ash" => Some(ProfileId::Shell),
        "rust-script" => Some(ProfileId::Rust),
        _ => None,
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ---------------------------------------------------------------------------
// Content sniffing
// ---------------------------------------------------------------------------

static RUST_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+\w+\s*[<(]|impl(?:<[^>]*>)?\s+\w+.*\{\s*$|use\s+(?:crate|std|super|self)::|#!?\[(?:derive|cfg|allow|test)\b)",
    )
    .unwrap()
});

static GO_PACKAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^package\s+\w+\s*$").unwrap());
static GO_FUNC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^func\s").unwrap());

static PYTHON_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:(?:async\s+)?def\s+\w+\s*\(.*\)\s*(?:->.*)?|class\s+\w+(?:\(.*\))?)\s*:\s*$")
        .unwrap()
});

static SQL_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^\s*(?:CREATE\s+(?:OR\s+REPLACE\s+)?(?:TABLE|VIEW|FUNCTION|PROCEDURE|INDEX|TRIGGER)|INSERT\s+INTO|ALTER\s+TABLE|SELECT\s+.+\s+FROM)\b",
    )
    .unwrap()
});

static C_FAMILY_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:#\s*(?:include|define|pragma)\b|(?:public|private|protected)\s+(?:static\s+)?(?:final\s+)?(?:class|void|int)\b|(?:static\s+)?(?:void|int|char|long|double|float|bool|unsigned|size_t)\s+\**\w+\s*\([^;]*\)\s*\{?\s*$)",
    )
    .unwrap()
});

static JS_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^\s*(?:(?:export\s+)?(?:default\s+)?(?:async\s+)?function\b|(?:export\s+)?(?:const|let|var)\s+\w+\s*=\s*(?:async\s*)?(?:\([^)]*\)|\w+)\s*=>|import\s+.*\s+from\s+['"]|module\.exports\b|.*\brequire\(['"])"#,
    )
    .unwrap()
});

fn by_content(head: &str) -> Option<ProfileId> {
    if RUST_MARKERS.is_match(head) {
        return Some(ProfileId::Rust);
    }
    if GO_PACKAGE.is_match(head) && GO_FUNC.is_match(head) {
        return Some(ProfileId::Go);
    }
    if PYTHON_HEADER.is_match(head) {
        return Some(ProfileId::Python);
    }
    if SQL_STATEMENT.is_match(head) {
        return Some(ProfileId::Sql);
    }
    if C_FAMILY_MARKERS.is_match(head) {
        return Some(ProfileId::CFamily);
    }
    if JS_MARKERS.is_match(head) {
        return Some(ProfileId::JavaScript);
    }
    None
}
