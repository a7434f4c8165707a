//! Lexical scrubber: masks comments and string/char literals.
//!
//! Masked bytes are overwritten with spaces so downstream regexes and the
//! delimiter trackers never see keywords, braces or colons inside comments or
//! literals. Line terminators (`\n`, `\r`) survive so line numbers and
//! indentation stay intact, and the output is always exactly as long as the
//! input: an offset into the masked text is the same offset in the original.

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::profile::{BlockComment, Escape, LexicalRules, LiteralRule};
use crate::span::{LineIndex, Span};
use crate::types::DiagnosticKind;

const MASK: u8 = b' ';
const MAX_CPP_DELIMITER: usize = 16;
const MAX_ESCAPED_CHAR_LITERAL: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Comment,
    Literal,
}

/// One masked stretch of the original buffer, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaskedRegion {
    pub kind: RegionKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct MaskedText {
    bytes: Vec<u8>,
    regions: Vec<MaskedRegion>,
}

impl MaskedText {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Masked regions in source order; they never overlap.
    pub fn regions(&self) -> &[MaskedRegion] {
        &self.regions
    }

    pub fn region_at(&self, offset: usize) -> Option<&MaskedRegion> {
        let idx = self.regions.partition_point(|r| r.end <= offset);
        self.regions.get(idx).filter(|r| r.start <= offset && offset < r.end)
    }
}

/// Mask `source` according to `rules`. Unterminated constructs are reported
/// into `diags`; this never fails.
pub fn mask(
    source: &[u8],
    rules: &LexicalRules,
    index: &LineIndex,
    diags: &mut Diagnostics,
) -> MaskedText {
    let mut scrubber = Scrubber { src: source, out: source.to_vec(), regions: Vec::new(), index, diags };
    let mut i = 0;
    while i < source.len() {
        if let Some(block) = rules.block_comment {
            if starts_with(source, i, block.open) {
                i = scrubber.block_comment(i, block);
                continue;
            }
        }
        let line_comment = rules.line_comments.iter().any(|c| {
            starts_with(source, i, c.marker) && (!c.needs_boundary || at_word_boundary(source, i))
        });
        if line_comment {
            i = scrubber.line_comment(i);
            continue;
        }
        if let Some(next) = rules.literals.iter().find_map(|rule| scrubber.literal(i, rule)) {
            i = next;
            continue;
        }
        i += 1;
    }
    MaskedText { bytes: scrubber.out, regions: scrubber.regions }
}

// ---------------------------------------------------------------------------
// Scrubber state machine
// ---------------------------------------------------------------------------

struct Scrubber<'a> {
    src: &'a [u8],
    out: Vec<u8>,
    regions: Vec<MaskedRegion>,
    index: &'a LineIndex,
    diags: &'a mut Diagnostics,
}

impl Scrubber<'_> {
    fn cover(&mut self, kind: RegionKind, start: usize, end: usize) {
        let end = end.min(self.out.len());
        for b in &mut self.out[start..end] {
            if *b != b'\n' && *b != b'\r' {
                *b = MASK;
            }
        }
        if end > start {
            self.regions.push(MaskedRegion { kind, start, end });
        }
    }

    fn line_comment(&mut self, start: usize) -> usize {
        let end = memchr_newline(self.src, start).unwrap_or(self.src.len());
        self.cover(RegionKind::Comment, start, end);
        end
    }

    fn block_comment(&mut self, start: usize, block: BlockComment) -> usize {
        let mut depth = 1usize;
        let mut j = start + block.open.len();
        while j < self.src.len() {
            if block.nested && starts_with(self.src, j, block.open) {
                depth += 1;
                j += block.open.len();
            } else if starts_with(self.src, j, block.close) {
                depth -= 1;
                j += block.close.len();
                if depth == 0 {
                    self.cover(RegionKind::Comment, start, j);
                    return j;
                }
            } else {
                j += 1;
            }
        }
        let end = self.src.len();
        self.cover(RegionKind::Comment, start, end);
        self.diags.error(
            DiagnosticKind::UnterminatedComment,
            Span::new(start, end, self.index),
            format!("block comment opened with '{}' is never closed", block.open),
        );
        end
    }

    /// Try `rule` at `start`; `Some(next)` when a literal was consumed.
    fn literal(&mut self, start: usize, rule: &LiteralRule) -> Option<usize> {
        match *rule {
            LiteralRule::Quoted { open, close, escape, multiline } => {
                self.quoted(start, open, close, escape, multiline)
            }
            LiteralRule::RustRaw => self.rust_raw(start),
            LiteralRule::CppRaw => self.cpp_raw(start),
            LiteralRule::CharOrLifetime => self.char_literal(start),
            LiteralRule::CChar => self.c_char(start),
            LiteralRule::JsRegex => self.js_regex(start),
        }
    }

    fn quoted(
        &mut self,
        start: usize,
        open: &str,
        close: &str,
        escape: Escape,
        multiline: bool,
    ) -> Option<usize> {
        if !starts_with(self.src, start, open) {
            return None;
        }
        let mut j = start + open.len();
        while j < self.src.len() {
            let b = self.src[j];
            if escape == Escape::Backslash && b == b'\\' {
                let at_line_end = matches!(self.src.get(j + 1), Some(b'\n' | b'\r'));
                if multiline || !at_line_end {
                    j += 2;
                    continue;
                }
                // a trailing backslash does not carry a single-line literal over
                let eol = memchr_newline(self.src, j).unwrap_or(self.src.len());
                return Some(self.unterminated_at_eol(start, eol, open));
            }
            if starts_with(self.src, j, close) {
                if escape == Escape::Doubled && starts_with(self.src, j + close.len(), close) {
                    j += 2 * close.len();
                    continue;
                }
                let end = j + close.len();
                self.cover(RegionKind::Literal, start, end);
                return Some(end);
            }
            if b == b'\n' && !multiline {
                return Some(self.unterminated_at_eol(start, j, open));
            }
            j += 1;
        }
        Some(self.unterminated_at_eof(start, open))
    }

    fn rust_raw(&mut self, start: usize) -> Option<usize> {
        if start > 0 && is_ident_byte(self.src[start - 1]) {
            return None;
        }
        let mut j = start;
        if self.src.get(j) == Some(&b'b') {
            j += 1;
        }
        if self.src.get(j) != Some(&b'r') {
            return None;
        }
        j += 1;
        let hashes = self.src[j..].iter().take_while(|&&b| b == b'#').count();
        j += hashes;
        if self.src.get(j) != Some(&b'"') {
            return None;
        }
        j += 1;
        while j < self.src.len() {
            if self.src[j] == b'"'
                && self.src[j + 1..].iter().take(hashes).filter(|&&b| b == b'#').count() == hashes
            {
                let end = j + 1 + hashes;
                self.cover(RegionKind::Literal, start, end);
                return Some(end);
            }
            j += 1;
        }
        Some(self.unterminated_at_eof(start, "raw string"))
    }

    fn cpp_raw(&mut self, start: usize) -> Option<usize> {
        if !starts_with(self.src, start, "R\"") {
            return None;
        }
        if start > 0 {
            let prev = self.src[start - 1];
            let prefixed = matches!(prev, b'L' | b'u' | b'U' | b'8');
            if is_ident_byte(prev) && !prefixed {
                return None;
            }
        }
        let delim_start = start + 2;
        let paren = self.src[delim_start..]
            .iter()
            .take(MAX_CPP_DELIMITER + 1)
            .position(|&b| b == b'(')?;
        let delim = &self.src[delim_start..delim_start + paren];
        if delim.iter().any(|&b| b.is_ascii_whitespace() || matches!(b, b'\\' | b')' | b'"')) {
            return None;
        }
        let mut closing = Vec::with_capacity(delim.len() + 2);
        closing.push(b')');
        closing.extend_from_slice(delim);
        closing.push(b'"');

        let mut j = delim_start + paren + 1;
        while j < self.src.len() {
            if self.src[j..].starts_with(&closing) {
                let end = j + closing.len();
                self.cover(RegionKind::Literal, start, end);
                return Some(end);
            }
            j += 1;
        }
        Some(self.unterminated_at_eof(start, "raw string"))
    }

    /// `'x'`, `'\n'`, `'\u{1F600}'` are literals; a quote that does not close
    /// right after one character (lifetimes, apostrophes) is left alone.
    fn char_literal(&mut self, start: usize) -> Option<usize> {
        if self.src[start] != b'\'' {
            return None;
        }
        let next = *self.src.get(start + 1)?;
        let end = match next {
            b'\\' => {
                let limit = (start + MAX_ESCAPED_CHAR_LITERAL).min(self.src.len());
                let from = (start + 3).min(limit);
                let rel = self.src[from..limit].iter().position(|&b| b == b'\'' || b == b'\n')?;
                if self.src[from + rel] != b'\'' {
                    return None;
                }
                from + rel + 1
            }
            b'\n' | b'\r' | b'\'' => return None,
            _ => {
                let close = start + 1 + utf8_width(next);
                if self.src.get(close) != Some(&b'\'') {
                    return None;
                }
                close + 1
            }
        };
        self.cover(RegionKind::Literal, start, end);
        Some(end)
    }

    fn c_char(&mut self, start: usize) -> Option<usize> {
        if self.src[start] != b'\'' {
            return None;
        }
        let word_start = self.src[..start].iter().rposition(|&b| !is_ident_byte(b)).map_or(0, |p| p + 1);
        let prefix = &self.src[word_start..start];
        if !matches!(prefix, b"" | b"L" | b"u" | b"U" | b"u8") {
            return None;
        }
        self.quoted(start, "'", "'", Escape::Backslash, false)
    }

    /// A regex that does not close on its own line is left unmasked.
    fn js_regex(&mut self, start: usize) -> Option<usize> {
        if self.src[start] != b'/' || !regex_may_start(self.src, start) {
            return None;
        }
        let mut j = start + 1;
        let mut in_class = false;
        loop {
            match *self.src.get(j)? {
                b'\n' | b'\r' => return None,
                b'\\' => {
                    if matches!(self.src.get(j + 1), None | Some(b'\n' | b'\r')) {
                        return None;
                    }
                    j += 2;
                    continue;
                }
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => break,
                _ => {}
            }
            j += 1;
        }
        let flags = self.src[j + 1..].iter().take_while(|b| b.is_ascii_alphabetic()).count();
        let end = j + 1 + flags;
        self.cover(RegionKind::Literal, start, end);
        Some(end)
    }

    /// Mask a single-line literal up to the newline at `eol`; scanning
    /// resumes there.
    fn unterminated_at_eol(&mut self, start: usize, eol: usize, open: &str) -> usize {
        self.cover(RegionKind::Literal, start, eol);
        self.diags.warning(
            DiagnosticKind::UnterminatedLiteral,
            Span::new(start, eol, self.index),
            format!("literal opened with {open} is not closed before end of line"),
        );
        eol
    }

    fn unterminated_at_eof(&mut self, start: usize, what: &str) -> usize {
        let end = self.src.len();
        self.cover(RegionKind::Literal, start, end);
        self.diags.warning(
            DiagnosticKind::UnterminatedLiteral,
            Span::new(start, end, self.index),
            format!("literal opened with {what} runs to end of input"),
        );
        end
    }
}

// ---------------------------------------------------------------------------
// Byte helpers
// ---------------------------------------------------------------------------

fn starts_with(src: &[u8], at: usize, pat: &str) -> bool {
    src.get(at..).is_some_and(|rest| rest.starts_with(pat.as_bytes()))
}

fn memchr_newline(src: &[u8], from: usize) -> Option<usize> {
    src[from..].iter().position(|&b| b == b'\n').map(|p| from + p)
}

/// Keywords after which `/` starts a regex rather than a division.
const REGEX_PRECEDING_KEYWORDS: &[&[u8]] = &[
    b"return", b"typeof", b"instanceof", b"case", b"do", b"else", b"in", b"of", b"new", b"delete",
    b"void", b"throw", b"yield", b"await",
];

/// A `/` after an operand (identifier, number, closing bracket, string) is
/// division; anywhere else an operand is expected and it opens a regex.
fn regex_may_start(src: &[u8], slash: usize) -> bool {
    let line_start = src[..slash].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    let before = &src[line_start..slash];
    let Some(last) = before.iter().rposition(|b| !b.is_ascii_whitespace()) else {
        return true;
    };
    match before[last] {
        b')' | b']' | b'"' | b'\'' | b'`' | b'.' => false,
        b if is_ident_byte(b) => {
            let word_start = before[..last].iter().rposition(|&b| !is_ident_byte(b)).map_or(0, |p| p + 1);
            REGEX_PRECEDING_KEYWORDS.contains(&&before[word_start..=last])
        }
        _ => true,
    }
}

/// Shell-style comment markers only count at the start of a word.
fn at_word_boundary(src: &[u8], at: usize) -> bool {
    at == 0 || matches!(src[at - 1], b' ' | b'\t' | b'\n' | b'\r' | b';' | b'|' | b'&' | b'(' | b')')
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}
