//! Per-definition metadata: parameter lists, decorators/attributes and
//! documentation text.

use std::collections::BTreeMap;

use crate::matcher::{collapse_whitespace, Candidate};
use crate::profile::SourceProfile;
use crate::scrub::{MaskedText, RegionKind};
use crate::span::{LineIndex, Span};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub parameters: Option<String>,
    pub decorators: Vec<String>,
    pub doc: Option<String>,
    /// `@param`-style tags of a doc comment, by tag name, in source order.
    pub doc_tags: BTreeMap<String, Vec<String>>,
}

pub fn extract(
    source: &[u8],
    masked: &MaskedText,
    index: &LineIndex,
    profile: &SourceProfile,
    candidate: &Candidate,
    body: Option<Span>,
) -> Metadata {
    let parameters = if candidate.kind.is_callable() {
        parameters(source, masked.as_bytes(), candidate)
    } else {
        None
    };

    let (decorators, first_decorator_line) = decorators(source, index, profile, candidate.line);
    let (doc, doc_tags) = if profile.doc.docstrings {
        (body.and_then(|b| docstring(source, masked, b)), BTreeMap::new())
    } else {
        let doc = comment_doc(source, masked, index, profile, first_decorator_line);
        let tags = doc.as_deref().map(doc_tags).unwrap_or_default();
        (doc, tags)
    };

    Metadata { parameters, decorators, doc, doc_tags }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Text of the first top-level parenthesis group after the name, skipping a
/// generic list such as `<T: Fn(u8)>`.
fn parameters(source: &[u8], masked: &[u8], candidate: &Candidate) -> Option<String> {
    let sig = &masked[..candidate.signature_end];
    let mut j = candidate.name_end.max(candidate.signature_start);
    while j < sig.len() && sig[j].is_ascii_whitespace() {
        j += 1;
    }
    if sig.get(j) == Some(&b'<') {
        let mut angle = 0usize;
        while j < sig.len() {
            match sig[j] {
                b'<' => angle += 1,
                b'>' if sig[j - 1] != b'-' => {
                    angle = angle.saturating_sub(1);
                    if angle == 0 {
                        j += 1;
                        break;
                    }
                }
                _ => {}
            }
            j += 1;
        }
    }

    let open = j + sig.get(j..)?.iter().position(|&b| b == b'(')?;
    let mut depth = 0usize;
    for (k, &b) in sig.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(collapse_whitespace(&source[open + 1..k]));
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Decorators
// ---------------------------------------------------------------------------

/// Contiguous decorator lines directly above `header_line`, top to bottom,
/// plus the first line of that run (the header line when there is none).
fn decorators(
    source: &[u8],
    index: &LineIndex,
    profile: &SourceProfile,
    header_line: usize,
) -> (Vec<String>, usize) {
    let mut found = Vec::new();
    let mut line = header_line;
    while line > 0 && !profile.decorator_prefixes.is_empty() {
        let text = line_text(source, index, line - 1);
        if !profile.decorator_prefixes.iter().any(|p| text.starts_with(p)) {
            break;
        }
        found.push(text);
        line -= 1;
    }
    found.reverse();
    (found, line)
}

// ---------------------------------------------------------------------------
// Documentation
// ---------------------------------------------------------------------------

/// A string literal as the first statement of the body.
fn docstring(source: &[u8], masked: &MaskedText, body: Span) -> Option<String> {
    let mut p = body.start;
    while p < body.end {
        if source[p].is_ascii_whitespace() {
            p += 1;
            continue;
        }
        match masked.region_at(p) {
            Some(region) if region.kind == RegionKind::Comment => p = region.end,
            _ => break,
        }
    }
    if p >= body.end {
        return None;
    }

    // string prefixes such as r""" or u'
    let prefix = source[p..body.end.min(source.len())]
        .iter()
        .take(2)
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    let region = masked.region_at(p + prefix)?;
    if region.kind != RegionKind::Literal || region.start != p + prefix {
        return None;
    }

    let raw = String::from_utf8_lossy(&source[region.start..region.end]).into_owned();
    let quote = ["\"\"\"", "'''", "\"", "'"].into_iter().find(|q| raw.starts_with(q))?;
    let inner = raw.strip_prefix(quote)?;
    let inner = inner.strip_suffix(quote).unwrap_or(inner);
    clean_doc(inner.lines().map(str::trim))
}

/// Line doc comments (`///`) or a block doc comment (`/** */`) directly above
/// `line`.
fn comment_doc(
    source: &[u8],
    masked: &MaskedText,
    index: &LineIndex,
    profile: &SourceProfile,
    line: usize,
) -> Option<String> {
    if line == 0 {
        return None;
    }
    let above = line_text(source, index, line - 1);

    if let Some(open) = profile.doc.block_open {
        if above.ends_with("*/") {
            let (_, end) = index.line_bounds(line - 1, source);
            let region = masked.region_at(end.checked_sub(1)?)?;
            let text = String::from_utf8_lossy(&source[region.start..region.end]).into_owned();
            if region.kind == RegionKind::Comment && text.starts_with(open) && !text.starts_with("/**/") {
                let inner = text.trim_start_matches(open).trim_end_matches("*/");
                return clean_doc(inner.lines().map(|l| {
                    let l = l.trim();
                    l.strip_prefix('*').map(str::trim_start).unwrap_or(l)
                }));
            }
        }
    }

    let prefix = profile.doc.line_prefixes.iter().find(|p| is_doc_line(&above, p))?;
    let mut lines = Vec::new();
    let mut cursor = line;
    while cursor > 0 {
        let text = line_text(source, index, cursor - 1);
        if !is_doc_line(&text, prefix) {
            break;
        }
        let body = text[prefix.len()..].strip_prefix(' ').unwrap_or(&text[prefix.len()..]);
        lines.push(body.trim_end().to_string());
        cursor -= 1;
    }
    lines.reverse();
    clean_doc(lines.iter().map(String::as_str))
}

fn is_doc_line(text: &str, prefix: &str) -> bool {
    // `////` banners and shebangs are not doc comments
    if text.starts_with("#!") {
        return false;
    }
    (text.starts_with(prefix) && !text[prefix.len()..].starts_with(prefix.chars().last().unwrap_or(' ')))
        || text == prefix
}

/// `@name value` lines; following lines up to a blank line or the next tag
/// continue the value.
fn doc_tags(doc: &str) -> BTreeMap<String, Vec<String>> {
    let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current: Option<String> = None;
    for line in doc.lines().map(str::trim) {
        if let Some(tagged) = line.strip_prefix('@') {
            let (name, value) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
            if name.is_empty() {
                current = None;
                continue;
            }
            tags.entry(name.to_string()).or_default().push(value.trim().to_string());
            current = Some(name.to_string());
        } else if line.is_empty() {
            current = None;
        } else if let Some(value) = current.as_ref().and_then(|n| tags.get_mut(n)).and_then(|v| v.last_mut()) {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line);
        }
    }
    tags
}

/// Drop leading and trailing blank lines; `None` when nothing is left.
fn clean_doc<'a>(lines: impl Iterator<Item = &'a str>) -> Option<String> {
    let lines: Vec<&str> = lines.collect();
    let first = lines.iter().position(|l| !l.trim().is_empty())?;
    let last = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(lines[first..=last].join("\n"))
}

fn line_text(source: &[u8], index: &LineIndex, line: usize) -> String {
    let (start, end) = index.line_bounds(line, source);
    String::from_utf8_lossy(&source[start..end]).trim().to_string()
}
