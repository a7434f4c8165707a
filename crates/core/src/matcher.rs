//! Definition matcher: finds definition heads line by line over masked text
//! and resolves each head's full signature with a forward scan.
//!
//! Every pattern in a profile is anchored at a line start, so each physical
//! line yields at most one candidate. The forward scan tracks `()`/`[]` depth
//! so parameter lists may span lines; it stops at the first token that opens
//! a body, ends a declaration, or shows the head was not a definition.

use crate::config::ProfileTunables;
use crate::diagnostics::Diagnostics;
use crate::profile::{BlockStyle, DefinitionPattern, KindRule, SourceProfile};
use crate::scrub::{is_ident_byte, MaskedText};
use crate::span::{LineIndex, Span};
use crate::types::{DefinitionKind, DiagnosticKind};

/// How a candidate's body begins, as found by the forward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// Offset of the `{` that opens the body.
    Brace(usize),
    /// Offset just past the header's `:`.
    Colon(usize),
    /// Indented header with no `:`; offset of the header's line end.
    HeaderEnd(usize),
    /// Statement body; the tracker searches for the terminator from here.
    Statement(usize),
    /// Accepted declaration form with no body.
    Declaration,
    /// Input ended before any body opened.
    Truncated,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind: DefinitionKind,
    pub name: String,
    /// First non-blank byte of the header line.
    pub signature_start: usize,
    /// Exclusive end of the signature, trailing whitespace trimmed.
    pub signature_end: usize,
    /// End of the name (or keyword) in the header; the forward scan starts here.
    pub name_end: usize,
    /// 0-based line of the header.
    pub line: usize,
    pub opening: Opening,
}

/// Result of matching one masked line against the pattern table.
struct Head {
    kind: DefinitionKind,
    name: String,
    /// Line-relative offset where the forward scan starts.
    scan_from: usize,
    allows_declaration: bool,
    call_like: bool,
}

enum Resolution {
    Found { opening: Opening, end: usize },
    Declaration { end: usize },
    MissingColon { end: usize },
    /// The head turned out not to be a definition.
    Dropped,
    Overflow { at: usize },
    Truncated,
}

// ---------------------------------------------------------------------------
// Candidate discovery
// ---------------------------------------------------------------------------

/// Find every definition candidate in source order.
pub fn find_candidates(
    masked: &MaskedText,
    index: &LineIndex,
    profile: &SourceProfile,
    tunables: ProfileTunables,
    diags: &mut Diagnostics,
) -> Vec<Candidate> {
    let text = masked.as_bytes();
    let mut candidates = Vec::new();
    let mut line = 0;

    while line < index.line_count() {
        let (start, end) = index.line_bounds(line, text);
        let Some(head) = match_line(profile, &text[start..end]) else {
            line += 1;
            continue;
        };

        let indent = text[start..end].iter().take_while(|b| b.is_ascii_whitespace()).count();
        let signature_start = start + indent;
        let scan_from = start + head.scan_from;
        let resolution = resolve_signature(text, scan_from, profile.block_style, &head, tunables);

        let (opening, signature_end) = match resolution {
            Resolution::Found { opening, end } => (opening, end),
            Resolution::Declaration { end } if head.allows_declaration => (Opening::Declaration, end),
            Resolution::MissingColon { end } => {
                diags.warning(
                    DiagnosticKind::UnknownConstruct,
                    Span::new(signature_start, end, index),
                    format!("header of '{}' has no terminating ':'", head.name),
                );
                (Opening::HeaderEnd(end), end)
            }
            Resolution::Truncated => {
                diags.warning(
                    DiagnosticKind::UnknownConstruct,
                    Span::new(signature_start, text.len(), index),
                    format!("input ends inside the signature of '{}'", head.name),
                );
                (Opening::Truncated, text.len())
            }
            Resolution::Overflow { at } => {
                diags.warning(
                    DiagnosticKind::UnknownConstruct,
                    Span::new(signature_start, at, index),
                    format!(
                        "signature of '{}' spans more than {} lines; skipped",
                        head.name, tunables.max_signature_lookahead
                    ),
                );
                line += 1;
                continue;
            }
            Resolution::Declaration { .. } | Resolution::Dropped => {
                line += 1;
                continue;
            }
        };

        let signature_end = trim_end(text, signature_start, signature_end);
        candidates.push(Candidate {
            kind: head.kind,
            name: head.name,
            signature_start,
            signature_end,
            name_end: scan_from,
            line,
            opening,
        });

        let last = signature_end.saturating_sub(1).max(signature_start);
        line = (index.line_of(last) + 1).max(line + 1);
    }

    candidates
}

/// Try the profile's patterns in priority order against one masked line.
fn match_line(profile: &SourceProfile, line: &[u8]) -> Option<Head> {
    profile.patterns.iter().find_map(|pattern| match_pattern(profile, pattern, line))
}

fn match_pattern(profile: &SourceProfile, pattern: &DefinitionPattern, line: &[u8]) -> Option<Head> {
    let caps = pattern.regex.captures(line)?;
    let name_match = caps.name("name");
    let name = name_match.map(|m| collapse_whitespace(m.as_bytes())).unwrap_or_default();
    if !name.is_empty() && profile.is_reserved(&name) {
        return None;
    }
    if let Some(pre) = caps.name("pre") {
        let pre = String::from_utf8_lossy(pre.as_bytes());
        if pre.split_whitespace().next().is_some_and(|w| profile.is_reserved(w)) {
            return None;
        }
    }

    let keyword = caps.name("kw");
    let kind = match pattern.kind {
        KindRule::Fixed(kind) => kind,
        KindRule::Keyword => {
            let kw = String::from_utf8_lossy(keyword?.as_bytes()).into_owned();
            DefinitionKind::from_keyword(kw.split_whitespace().next()?)?
        }
    };

    let scan_from = name_match
        .map(|m| m.end())
        .or_else(|| keyword.map(|m| m.end()))
        .or_else(|| caps.get(0).map(|m| m.end()))
        .unwrap_or(line.len());

    Some(Head {
        kind,
        name,
        scan_from,
        allows_declaration: pattern.allows_declaration,
        call_like: pattern.call_like,
    })
}

// ---------------------------------------------------------------------------
// Forward scan
// ---------------------------------------------------------------------------

fn resolve_signature(
    text: &[u8],
    from: usize,
    style: BlockStyle,
    head: &Head,
    tunables: ProfileTunables,
) -> Resolution {
    match style {
        BlockStyle::Brace => scan_brace_header(text, from, head, tunables.max_signature_lookahead),
        BlockStyle::Indent => scan_indent_header(text, from, tunables.max_signature_lookahead),
        BlockStyle::Statement => {
            let end = text[from..].iter().position(|&b| b == b'\n').map_or(text.len(), |p| from + p);
            Resolution::Found { opening: Opening::Statement(from), end }
        }
    }
}

fn scan_brace_header(text: &[u8], from: usize, head: &Head, lookahead: usize) -> Resolution {
    let mut depth = 0usize;
    let mut inner_braces = 0usize;
    let mut newlines = 0usize;

    for j in from..text.len() {
        match text[j] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'{' if depth == 0 => return Resolution::Found { opening: Opening::Brace(j), end: j },
            b'{' => inner_braces += 1,
            b'}' if depth > 0 => inner_braces = inner_braces.saturating_sub(1),
            b';' | b'}' if depth == 0 => return Resolution::Declaration { end: j + 1 },
            b'\n' => {
                newlines += 1;
                if newlines > lookahead {
                    return Resolution::Overflow { at: j };
                }
                // a block opened inside the argument list and left open: a callback
                if head.call_like && inner_braces > 0 {
                    return Resolution::Dropped;
                }
                if depth == 0 && !continues_signature(text, j) {
                    return Resolution::Dropped;
                }
            }
            _ => {}
        }
    }
    Resolution::Truncated
}

fn scan_indent_header(text: &[u8], from: usize, lookahead: usize) -> Resolution {
    let mut depth = 0usize;
    let mut newlines = 0usize;
    let mut j = from;

    while j < text.len() {
        match text[j] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => return Resolution::Found { opening: Opening::Colon(j + 1), end: j + 1 },
            b'\\' if is_line_continuation(text, j) => {
                newlines += 1;
                if newlines > lookahead {
                    return Resolution::Overflow { at: j };
                }
                j += if text.get(j + 1) == Some(&b'\r') { 3 } else { 2 };
                continue;
            }
            b'\n' if depth == 0 => return Resolution::MissingColon { end: j },
            b'\n' => {
                newlines += 1;
                if newlines > lookahead {
                    return Resolution::Overflow { at: j };
                }
            }
            _ => {}
        }
        j += 1;
    }
    Resolution::Truncated
}

fn is_line_continuation(text: &[u8], at: usize) -> bool {
    match text.get(at + 1) {
        Some(b'\n') => true,
        Some(b'\r') => text.get(at + 2) == Some(&b'\n'),
        _ => false,
    }
}

const CONTINUATION_STARTS: &[&str] = &[
    "{", ":", ",", "->", "=>", "where", "throws", "const", "noexcept", "override", "final",
    "extends", "implements", "requires",
];
const CONTINUATION_ENDS: &[&str] = &[",", ":", "->", "=>", "=", "where"];

/// A brace-style header crossing the newline at `nl` (at paren depth 0) only
/// continues when the surrounding lines look like more signature.
fn continues_signature(text: &[u8], nl: usize) -> bool {
    let line_start = text[..nl].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    let current = trim_ascii(&text[line_start..nl]);
    if CONTINUATION_ENDS.iter().any(|e| ends_with_token(current, e)) {
        return true;
    }

    let mut next = nl + 1;
    while next < text.len() {
        let end = text[next..].iter().position(|&b| b == b'\n').map_or(text.len(), |p| next + p);
        let line = trim_ascii(&text[next..end]);
        if !line.is_empty() {
            return CONTINUATION_STARTS.iter().any(|s| starts_with_token(line, s));
        }
        next = end + 1;
    }
    // only blank lines remain; let the scan run into end of input
    true
}

fn starts_with_token(line: &[u8], token: &str) -> bool {
    let token = token.as_bytes();
    if !line.starts_with(token) {
        return false;
    }
    let word = token.last().is_some_and(|&b| is_ident_byte(b));
    !word || line.get(token.len()).map_or(true, |&b| !is_ident_byte(b))
}

fn ends_with_token(line: &[u8], token: &str) -> bool {
    let token = token.as_bytes();
    if !line.ends_with(token) {
        return false;
    }
    let before = line.len() - token.len();
    let word = token.first().is_some_and(|&b| is_ident_byte(b));
    if word {
        return before == 0 || !is_ident_byte(line[before - 1]);
    }
    // `==` or `>=` is an expression, not a signature ending in `=`
    !(token == b"=" && before > 0 && matches!(line[before - 1], b'=' | b'!' | b'<' | b'>'))
}

// ---------------------------------------------------------------------------
// Byte helpers
// ---------------------------------------------------------------------------

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |p| p + 1);
    &bytes[start..end]
}

fn trim_end(text: &[u8], start: usize, end: usize) -> usize {
    let mut end = end.min(text.len());
    while end > start && text[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

pub(crate) fn collapse_whitespace(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileId, ProfileSet};
    use crate::scrub::mask;
    use crate::types::Diagnostic;

    fn candidates(src: &str, id: ProfileId) -> (Vec<Candidate>, Vec<Diagnostic>) {
        candidates_with(src, id, ProfileTunables::default())
    }

    fn candidates_with(
        src: &str,
        id: ProfileId,
        tunables: ProfileTunables,
    ) -> (Vec<Candidate>, Vec<Diagnostic>) {
        let profile = ProfileSet::builtin().get(id);
        let index = LineIndex::new(src.as_bytes());
        let mut diags = Diagnostics::new();
        let masked = mask(src.as_bytes(), &profile.lexical, &index, &mut diags);
        let found = find_candidates(&masked, &index, profile, tunables, &mut diags);
        (found, diags.finish())
    }

    fn names(found: &[Candidate]) -> Vec<&str> {
        found.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_multi_line_c_signature() {
        let src = "int add(int a,\n        int b,\n        int c) {\n    return a + b + c;\n}\n";
        let (found, diags) = candidates(src, ProfileId::CFamily);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(names(&found), vec!["add"]);
        assert_eq!(found[0].kind, DefinitionKind::Function);
        let brace = src.find('{').expect("brace");
        assert_eq!(found[0].opening, Opening::Brace(brace));
        assert_eq!(&src[found[0].signature_start..found[0].signature_end], "int add(int a,\n        int b,\n        int c)");
    }

    #[test]
    fn test_calls_and_prototypes_are_not_definitions() {
        let src = "int proto(int x);\nvoid run(void) {\n    if (x) {\n        call(1);\n    }\n    return helper(2);\n}\n";
        let (found, _) = candidates(src, ProfileId::CFamily);
        assert_eq!(names(&found), vec!["run"], "only the real definition should match");
    }

    #[test]
    fn test_allman_brace_and_initializer_list() {
        let src = "Widget::Widget(int x)\n    : x_(x),\n      y_(0)\n{\n}\n";
        let (found, _) = candidates(src, ProfileId::CFamily);
        assert_eq!(names(&found), vec!["Widget::Widget"]);
        assert!(matches!(found[0].opening, Opening::Brace(_)));
    }

    #[test]
    fn test_keywords_in_comments_and_strings_are_ignored() {
        let src = "// fn commented() {}\nlet s = \"fn quoted() {}\";\nfn real() {}\n";
        let (found, _) = candidates(src, ProfileId::Rust);
        assert_eq!(names(&found), vec!["real"]);
    }

    #[test]
    fn test_rust_declaration_forms() {
        let src = "struct Unit;\nstruct Pair(u8, u8);\nmod tests;\ntrait T {\n    fn required(&self);\n}\n";
        let (found, _) = candidates(src, ProfileId::Rust);
        assert_eq!(names(&found), vec!["Unit", "Pair", "T"], "mod and trait method declarations are skipped");
        assert_eq!(found[0].opening, Opening::Declaration);
        assert_eq!(found[1].opening, Opening::Declaration);
    }

    #[test]
    fn test_class_named_like_a_keyword() {
        let (found, _) = candidates("class Function {\n}\n", ProfileId::JavaScript);
        assert_eq!(names(&found), vec!["Function"]);
        assert_eq!(found[0].kind, DefinitionKind::Class);
    }

    #[test]
    fn test_js_callbacks_are_not_methods() {
        let src = "describe('suite', () => {\n  it('works', () => {\n  });\n});\nfunction real() {\n}\n";
        let (found, _) = candidates(src, ProfileId::JavaScript);
        assert_eq!(names(&found), vec!["real"]);
    }

    #[test]
    fn test_python_headers() {
        let src = "class A(Base):\n    def method(self,\n               x: int) -> None:\n        pass\n";
        let (found, diags) = candidates(src, ProfileId::Python);
        assert!(diags.is_empty());
        assert_eq!(names(&found), vec!["A", "method"]);
        assert!(matches!(found[1].opening, Opening::Colon(_)));
        assert_eq!(found[1].line, 1);
    }

    #[test]
    fn test_python_missing_colon_is_lenient() {
        let (found, diags) = candidates("def broken(x)\n    return x\n", ProfileId::Python);
        assert_eq!(names(&found), vec!["broken"]);
        assert!(matches!(found[0].opening, Opening::HeaderEnd(_)));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnknownConstruct);
    }

    #[test]
    fn test_truncated_signature_is_recorded_without_body() {
        let (found, diags) = candidates("fn cut(a: u8,", ProfileId::Rust);
        assert_eq!(names(&found), vec!["cut"]);
        assert_eq!(found[0].opening, Opening::Truncated);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnknownConstruct);
    }

    #[test]
    fn test_lookahead_overflow_discards_candidate() {
        let mut src = String::from("void long_one(\n");
        for i in 0..10 {
            src.push_str(&format!("    int a{i},\n"));
        }
        src.push_str(") {\n}\n");
        let tunables = ProfileTunables { max_signature_lookahead: 5, ..ProfileTunables::default() };
        let (found, diags) = candidates_with(&src, ProfileId::CFamily, tunables);
        assert!(found.is_empty(), "overflowing signature must be dropped: {:?}", names(&found));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnknownConstruct);

        let (found, diags) = candidates(&src, ProfileId::CFamily);
        assert_eq!(names(&found), vec!["long_one"], "the default lookahead fits");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_go_and_shell_and_sql_heads() {
        let (found, _) = candidates("func (s *Server) Start(ctx context.Context) error {\n}\n", ProfileId::Go);
        assert_eq!(names(&found), vec!["Start"]);
        assert_eq!(found[0].kind, DefinitionKind::Method);

        let (found, _) = candidates("deploy() {\n  echo hi\n}\nif true; then\n  :\nfi\n", ProfileId::Shell);
        assert_eq!(names(&found), vec!["deploy"]);

        let (found, _) = candidates("create table users (\n  id int\n);\n", ProfileId::Sql);
        assert_eq!(names(&found), vec!["users"]);
        assert_eq!(found[0].kind, DefinitionKind::Struct);
        assert!(matches!(found[0].opening, Opening::Statement(_)));
    }

    #[test]
    fn test_garbage_terminates() {
        let src = "{{{{ ((( fn ( class { def : ;;; }}}}\n\0\0\u{7f}";
        for id in ProfileId::ALL {
            let _ = candidates(src, id);
        }
    }
}
