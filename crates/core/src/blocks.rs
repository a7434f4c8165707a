//! Block tracker: resolves the body span of every candidate.
//!
//! Brace profiles run one pass over the masked text with a stack of open
//! braces; indentation profiles compare indentation columns line by line;
//! statement profiles look for the next top-level `;`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::ProfileTunables;
use crate::diagnostics::Diagnostics;
use crate::matcher::{Candidate, Opening};
use crate::profile::BlockStyle;
use crate::span::{LineIndex, Span};
use crate::types::DiagnosticKind;

/// Body span per candidate, parallel to `candidates`.
pub fn resolve_bodies(
    masked: &[u8],
    index: &LineIndex,
    style: BlockStyle,
    tunables: ProfileTunables,
    candidates: &[Candidate],
    diags: &mut Diagnostics,
) -> Vec<Option<Span>> {
    match style {
        BlockStyle::Brace => brace_bodies(masked, index, candidates, diags),
        BlockStyle::Indent => indent_bodies(masked, index, tunables.tab_width, candidates, diags),
        BlockStyle::Statement => statement_bodies(masked, index, candidates, diags),
    }
}

// ---------------------------------------------------------------------------
// Brace style
// ---------------------------------------------------------------------------

fn brace_bodies(
    masked: &[u8],
    index: &LineIndex,
    candidates: &[Candidate],
    diags: &mut Diagnostics,
) -> Vec<Option<Span>> {
    let owners: HashMap<usize, usize> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c.opening {
            Opening::Brace(offset) => Some((offset, i)),
            _ => None,
        })
        .collect();

    let mut bodies = vec![None; candidates.len()];
    let mut stack: Vec<(usize, Option<usize>)> = Vec::new();

    for (j, &b) in masked.iter().enumerate() {
        match b {
            b'{' => stack.push((j, owners.get(&j).copied())),
            b'}' => match stack.pop() {
                Some((open, owner)) => {
                    if let Some(i) = owner {
                        bodies[i] = Some(Span::new(open, j + 1, index));
                    }
                }
                None => diags.error(
                    DiagnosticKind::UnbalancedDelimiter,
                    Span::new(j, j + 1, index),
                    "'}' has no matching '{'",
                ),
            },
            _ => {}
        }
    }

    for (open, owner) in stack {
        let span = Span::new(open, masked.len(), index);
        diags.error(
            DiagnosticKind::UnbalancedDelimiter,
            span,
            format!("'{{' opened on line {} is never closed", span.line),
        );
        if let Some(i) = owner {
            bodies[i] = Some(span);
        }
    }

    bodies
}

// ---------------------------------------------------------------------------
// Indent style
// ---------------------------------------------------------------------------

/// Indentation facts for one line.
#[derive(Debug, Clone, Copy)]
struct LineShape {
    /// Column of the first non-blank byte, `None` for blank, fully masked
    /// or bracket-continuation lines.
    indent: Option<usize>,
    content_end: usize,
}

/// An opener still unclosed when the next definition head starts (or at
/// end of input) is reported and forgotten, so one stray bracket cannot hide
/// every later body.
fn line_shapes(
    masked: &[u8],
    index: &LineIndex,
    tab_width: usize,
    heads: &HashSet<usize>,
    diags: &mut Diagnostics,
) -> Vec<LineShape> {
    let mut shapes = Vec::with_capacity(index.line_count());
    let mut open: Vec<usize> = Vec::new();

    for line in 0..index.line_count() {
        let (start, end) = index.line_bounds(line, masked);
        if heads.contains(&line) {
            report_unclosed(masked, index, &mut open, diags);
        }
        let bytes = &masked[start..end];
        let lead = bytes.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
        let blank = bytes[lead..].iter().all(|b| b.is_ascii_whitespace());
        let continuation = !open.is_empty();

        let indent = if blank || continuation {
            None
        } else {
            let leading = &bytes[..lead];
            if leading.contains(&b' ') && leading.contains(&b'\t') {
                diags.warning(
                    DiagnosticKind::MixedIndentation,
                    Span::new(start, start + lead, index),
                    "indentation mixes tabs and spaces",
                );
            }
            Some(indent_column(leading, tab_width))
        };

        for (k, &b) in bytes.iter().enumerate() {
            match b {
                b'(' | b'[' | b'{' => open.push(start + k),
                b')' | b']' | b'}' => {
                    open.pop();
                }
                _ => {}
            }
        }
        shapes.push(LineShape { indent, content_end: end });
    }
    report_unclosed(masked, index, &mut open, diags);
    shapes
}

fn report_unclosed(masked: &[u8], index: &LineIndex, open: &mut Vec<usize>, diags: &mut Diagnostics) {
    let Some(&first) = open.first() else {
        return;
    };
    let span = Span::new(first, first + 1, index);
    diags.warning(
        DiagnosticKind::UnbalancedDelimiter,
        span,
        format!("'{}' opened on line {} is never closed", masked[first] as char, span.line),
    );
    open.clear();
}

fn indent_column(leading: &[u8], tab_width: usize) -> usize {
    leading.iter().fold(0, |col, &b| {
        if b == b'\t' {
            (col / tab_width + 1) * tab_width
        } else {
            col + 1
        }
    })
}

fn indent_bodies(
    masked: &[u8],
    index: &LineIndex,
    tab_width: usize,
    candidates: &[Candidate],
    diags: &mut Diagnostics,
) -> Vec<Option<Span>> {
    let heads: HashSet<usize> = candidates.iter().map(|c| c.line).collect();
    let shapes = line_shapes(masked, index, tab_width.max(1), &heads, diags);

    candidates
        .iter()
        .map(|c| {
            let body_start = match c.opening {
                Opening::Colon(offset) | Opening::HeaderEnd(offset) => offset,
                _ => return None,
            };
            let header_indent = shapes.get(c.line).and_then(|s| s.indent).unwrap_or(0);
            let header_last = index.line_of(body_start.saturating_sub(1));

            // `def f(): return 1` keeps its inline body
            let inline_end = shapes
                .get(header_last)
                .map(|s| s.content_end)
                .filter(|&end| end > body_start && !masked[body_start..end].iter().all(|b| b.is_ascii_whitespace()));

            let mut body_end = inline_end;
            for shape in shapes.iter().skip(header_last + 1) {
                match shape.indent {
                    None => continue,
                    Some(indent) if indent > header_indent => body_end = Some(shape.content_end),
                    Some(_) => break,
                }
            }

            let end = body_end.map(|e| trim_end(masked, body_start, e)).unwrap_or(body_start);
            Some(Span::new(body_start, end, index))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Statement style
// ---------------------------------------------------------------------------

fn statement_bodies(
    masked: &[u8],
    index: &LineIndex,
    candidates: &[Candidate],
    diags: &mut Diagnostics,
) -> Vec<Option<Span>> {
    candidates
        .iter()
        .map(|c| {
            let Opening::Statement(from) = c.opening else {
                return None;
            };
            let mut depth = 0usize;
            for (j, &b) in masked.iter().enumerate().skip(from) {
                match b {
                    b'(' => depth += 1,
                    b')' => depth = depth.saturating_sub(1),
                    b';' if depth == 0 => return Some(Span::new(from, j + 1, index)),
                    _ => {}
                }
            }
            let span = Span::new(from, masked.len(), index);
            diags.warning(
                DiagnosticKind::UnbalancedDelimiter,
                span,
                format!("statement defining '{}' has no terminating ';'", c.name),
            );
            Some(span)
        })
        .collect()
}

fn trim_end(bytes: &[u8], start: usize, end: usize) -> usize {
    let mut end = end.min(bytes.len());
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

// ---------------------------------------------------------------------------
// Delimiter balance
// ---------------------------------------------------------------------------

/// Unmatched opener and closer counts for one delimiter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DelimiterCount {
    pub unclosed: usize,
    pub unopened: usize,
}

impl DelimiterCount {
    pub fn is_balanced(&self) -> bool {
        self.unclosed == 0 && self.unopened == 0
    }

    fn open(&mut self) {
        self.unclosed += 1;
    }

    fn close(&mut self) {
        if self.unclosed > 0 {
            self.unclosed -= 1;
        } else {
            self.unopened += 1;
        }
    }
}

/// Delimiter balance of masked text, each pair counted independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub braces: DelimiterCount,
    pub parens: DelimiterCount,
    pub brackets: DelimiterCount,
}

impl Balance {
    pub fn is_balanced(&self) -> bool {
        self.braces.is_balanced() && self.parens.is_balanced() && self.brackets.is_balanced()
    }
}

pub fn check_balance(masked: &[u8]) -> Balance {
    let mut balance = Balance::default();
    for &b in masked {
        match b {
            b'{' => balance.braces.open(),
            b'}' => balance.braces.close(),
            b'(' => balance.parens.open(),
            b')' => balance.parens.close(),
            b'[' => balance.brackets.open(),
            b']' => balance.brackets.close(),
            _ => {}
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_candidates;
    use crate::profile::{ProfileId, ProfileSet};
    use crate::scrub::mask;
    use crate::types::Diagnostic;

    fn bodies(src: &str, id: ProfileId) -> (Vec<Candidate>, Vec<Option<Span>>, Vec<Diagnostic>) {
        let profile = ProfileSet::builtin().get(id);
        let tunables = ProfileTunables::default();
        let index = LineIndex::new(src.as_bytes());
        let mut diags = Diagnostics::new();
        let masked = mask(src.as_bytes(), &profile.lexical, &index, &mut diags);
        let found = find_candidates(&masked, &index, profile, tunables, &mut diags);
        let spans =
            resolve_bodies(masked.as_bytes(), &index, profile.block_style, tunables, &found, &mut diags);
        (found, spans, diags.finish())
    }

    fn text(src: &str, span: Option<Span>) -> &str {
        let span = span.expect("body span");
        &src[span.start..span.end]
    }

    #[test]
    fn test_brace_bodies_nest() {
        let src = "impl A {\n    fn f() {\n        if x { }\n    }\n}\n";
        let (found, spans, diags) = bodies(src, ProfileId::Rust);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(found.len(), 2);
        assert!(text(src, spans[0]).starts_with('{') && text(src, spans[0]).ends_with('}'));
        assert_eq!(text(src, spans[1]), "{\n        if x { }\n    }");
    }

    #[test]
    fn test_unclosed_brace_extends_to_eof_with_one_diagnostic() {
        let src = "fn open() {\n    let x = 1;\n";
        let (_, spans, diags) = bodies(src, ProfileId::Rust);
        assert_eq!(diags.len(), 1, "exactly one diagnostic expected: {diags:?}");
        assert_eq!(diags[0].kind, DiagnosticKind::UnbalancedDelimiter);
        assert_eq!(spans[0].map(|s| s.end), Some(src.len()));
    }

    #[test]
    fn test_stray_close_brace_is_reported() {
        let src = "}\nfn ok() {}\n";
        let (_, spans, diags) = bodies(src, ProfileId::Rust);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].span.start, 0);
        assert_eq!(text(src, spans[0]), "{}");
    }

    #[test]
    fn test_indent_bodies() {
        let src = "def a():\n    x = 1\n\n    # note\n    return x\ndef b():\nc = 2\n";
        let (found, spans, diags) = bodies(src, ProfileId::Python);
        assert!(diags.is_empty());
        assert_eq!(found.len(), 2);
        assert_eq!(text(src, spans[0]), "\n    x = 1\n\n    # note\n    return x");
        let empty = spans[1].expect("empty body is still present");
        assert!(empty.is_empty(), "immediate dedent gives an empty body");
    }

    #[test]
    fn test_indent_inline_body_and_bracket_continuation() {
        let src = "def one(): return 1\ndef two():\n    x = [\n1, 2]\n    return x\n";
        let (_, spans, _) = bodies(src, ProfileId::Python);
        assert_eq!(text(src, spans[0]), " return 1");
        assert!(text(src, spans[1]).ends_with("return x"), "continuation lines do not end the body");
    }

    #[test]
    fn test_unclosed_bracket_is_dropped_at_next_definition() {
        let src = "x = foo(\ndef a():\n    pass\ndef b():\n    pass\n";
        let (found, spans, diags) = bodies(src, ProfileId::Python);
        assert_eq!(found.len(), 2);
        assert_eq!(text(src, spans[0]), "\n    pass");
        assert_eq!(text(src, spans[1]), "\n    pass");
        assert_eq!(diags.len(), 1, "one report for the stray bracket: {diags:?}");
        assert_eq!(diags[0].kind, DiagnosticKind::UnbalancedDelimiter);
        assert_eq!(diags[0].severity, crate::types::Severity::Warning);
        assert_eq!(diags[0].span.start, src.find('(').expect("paren"));
    }

    #[test]
    fn test_unclosed_bracket_at_end_of_input_is_reported() {
        let src = "def a():\n    return [1,\n";
        let (_, spans, diags) = bodies(src, ProfileId::Python);
        assert!(text(src, spans[0]).ends_with("[1,"));
        assert_eq!(diags.len(), 1, "diagnostics: {diags:?}");
        assert_eq!(diags[0].kind, DiagnosticKind::UnbalancedDelimiter);
    }

    #[test]
    fn test_tabs_count_as_tab_width_columns() {
        assert_eq!(indent_column(b"\t", 4), 4);
        assert_eq!(indent_column(b"  \t", 4), 4);
        assert_eq!(indent_column(b"    \t ", 8), 9);
    }

    #[test]
    fn test_mixed_indentation_is_reported_per_line() {
        let src = "def f():\n \tx = 1\n \ty = 2\n";
        let (_, _, diags) = bodies(src, ProfileId::Python);
        let mixed: Vec<_> = diags.iter().filter(|d| d.kind == DiagnosticKind::MixedIndentation).collect();
        assert_eq!(mixed.len(), 2);
    }

    #[test]
    fn test_statement_bodies() {
        let src = "CREATE TABLE t (\n  a int, b text\n);\nCREATE VIEW v AS SELECT 1\n";
        let (found, spans, diags) = bodies(src, ProfileId::Sql);
        assert_eq!(found.len(), 2);
        assert!(text(src, spans[0]).ends_with(");"));
        assert_eq!(spans[1].map(|s| s.end), Some(src.len()));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnbalancedDelimiter);
    }

    #[test]
    fn test_check_balance() {
        assert!(check_balance(b"fn f(a: [u8; 2]) { }").is_balanced());
        let balance = check_balance(b"f(a)) { [");
        assert_eq!(balance.parens, DelimiterCount { unclosed: 0, unopened: 1 });
        assert_eq!(balance.braces.unclosed, 1);
        assert_eq!(balance.brackets.unclosed, 1);
        assert!(!balance.is_balanced());
    }
}
