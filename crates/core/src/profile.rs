//! Source profiles: per-language lexical rules and definition pattern tables.
//!
//! Profiles are data, not code. Each one lists its comment and literal
//! delimiters, its block style, and an ordered table of definition patterns;
//! the matcher and tracker interpret these tables without any per-language
//! branching. All built-in profiles are compiled once into a [`ProfileSet`].

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use crate::types::DefinitionKind;

// ---------------------------------------------------------------------------
// Profile identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProfileId {
    #[serde(rename = "c_family")]
    CFamily,
    #[serde(rename = "rust")]
    Rust,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "go")]
    Go,
    #[serde(rename = "shell")]
    Shell,
    #[serde(rename = "sql")]
    Sql,
    /// Minimal brace-language profile used when nothing else fits.
    #[serde(rename = "generic")]
    Generic,
}

impl ProfileId {
    pub const ALL: [ProfileId; 8] = [
        ProfileId::CFamily,
        ProfileId::Rust,
        ProfileId::Python,
        ProfileId::JavaScript,
        ProfileId::Go,
        ProfileId::Shell,
        ProfileId::Sql,
        ProfileId::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileId::CFamily => "c_family",
            ProfileId::Rust => "rust",
            ProfileId::Python => "python",
            ProfileId::JavaScript => "javascript",
            ProfileId::Go => "go",
            ProfileId::Shell => "shell",
            ProfileId::Sql => "sql",
            ProfileId::Generic => "generic",
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = match s.trim().to_ascii_lowercase().as_str() {
            "c_family" | "c" | "cpp" | "c++" | "java" | "csharp" | "c#" => ProfileId::CFamily,
            "rust" | "rs" => ProfileId::Rust,
            "python" | "py" => ProfileId::Python,
            "javascript" | "js" | "typescript" | "ts" => ProfileId::JavaScript,
            "go" | "golang" => ProfileId::Go,
            "shell" | "sh" | "bash" => ProfileId::Shell,
            "sql" => ProfileId::Sql,
            "generic" => ProfileId::Generic,
            other => return Err(format!("unknown profile '{other}'")),
        };
        Ok(id)
    }
}

/// Built-in extension table. Callers can override entries through
/// [`crate::config::ScanOptions::extensions`].
pub fn profile_for_extension(ext: &str) -> Option<ProfileId> {
    let id = match ext.to_ascii_lowercase().as_str() {
        "c" | "h" | "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "inl" | "ino" | "java"
        | "cs" | "dart" | "m" | "mm" => ProfileId::CFamily,
        "rs" => ProfileId::Rust,
        "py" | "pyw" | "pyi" | "pyx" => ProfileId::Python,
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => ProfileId::JavaScript,
        "go" => ProfileId::Go,
        "sh" | "bash" | "zsh" | "ksh" => ProfileId::Shell,
        "sql" | "psql" | "pgsql" | "ddl" => ProfileId::Sql,
        "kt" | "kts" | "swift" | "scala" | "php" | "groovy" => ProfileId::Generic,
        _ => return None,
    };
    Some(id)
}

// ---------------------------------------------------------------------------
// Lexical rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct LineComment {
    pub marker: &'static str,
    /// Only starts a comment at the beginning of a line or after whitespace
    /// (shell `#`, which also appears inside words like `${#var}`).
    pub needs_boundary: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockComment {
    pub open: &'static str,
    pub close: &'static str,
    pub nested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// `\"` and `\\`.
    Backslash,
    /// A doubled closing quote (`''` in SQL).
    Doubled,
    None,
}

#[derive(Debug, Clone, Copy)]
pub enum LiteralRule {
    Quoted { open: &'static str, close: &'static str, escape: Escape, multiline: bool },
    /// `r"…"`, `r#"…"#`, `br##"…"##`.
    RustRaw,
    /// `R"delim(…)delim"`.
    CppRaw,
    /// `'x'` or `'\n'` is a char literal; `'a` (lifetime, apostrophe) is not.
    CharOrLifetime,
    /// C/C++ `'x'`, also with an `L`, `u`, `U` or `u8` prefix. A quote right
    /// after any other identifier or digit is a digit separator (`1'000`).
    CChar,
    /// `/re/flags` where an operand may start; `/` after an operand is
    /// division.
    JsRegex,
}

#[derive(Debug, Clone, Copy)]
pub struct LexicalRules {
    pub line_comments: &'static [LineComment],
    pub block_comment: Option<BlockComment>,
    /// Tried in order; longer openers must come before their prefixes.
    pub literals: &'static [LiteralRule],
}

// ---------------------------------------------------------------------------
// Definition patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Bodies are `{ … }` blocks.
    Brace,
    /// Bodies are the lines indented deeper than the header.
    Indent,
    /// Bodies run to the next top-level `;`.
    Statement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindRule {
    Fixed(DefinitionKind),
    /// Derived from the `kw` capture via [`DefinitionKind::from_keyword`].
    Keyword,
}

/// One entry of a profile's ordered pattern table.
///
/// The regex runs over a single masked line and is anchored at the line start.
/// Groups: `name` (optional for anonymous constructs), `kw` (the definition
/// keyword), `pre` (leading type/modifier words checked against the profile's
/// reserved words).
#[derive(Debug, Clone)]
pub struct DefinitionPattern {
    pub kind: KindRule,
    pub regex: Regex,
    /// `struct Unit;`-style forms are recorded without a body instead of
    /// being skipped.
    pub allows_declaration: bool,
    /// Keyword-less heads (`name(args) {`) that also match call statements; a
    /// block opened inside the argument list and left open across a line
    /// means a callback, not a definition.
    pub call_like: bool,
}

/// Where documentation for a definition is found.
#[derive(Debug, Clone, Copy)]
pub struct DocStyle {
    /// Comment line prefixes directly above the header (`///`).
    pub line_prefixes: &'static [&'static str],
    /// Block doc comment opener directly above the header (`/**`).
    pub block_open: Option<&'static str>,
    /// First statement of the body is a string literal (Python docstrings).
    pub docstrings: bool,
}

#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub id: ProfileId,
    pub block_style: BlockStyle,
    pub lexical: LexicalRules,
    pub patterns: Vec<DefinitionPattern>,
    /// Words that disqualify a match when they appear as the name or as the
    /// first word of the `pre` group (`if (…) {`, `return foo(…);`).
    pub reserved: &'static [&'static str],
    /// Prefixes of decorator/attribute lines directly above a header.
    pub decorator_prefixes: &'static [&'static str],
    pub doc: DocStyle,
}

impl SourceProfile {
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(&word)
    }
}

// ---------------------------------------------------------------------------
// Pattern tables
// ---------------------------------------------------------------------------

const IDENT: &str = r"[\p{L}_][\p{L}\p{N}_]*";
const JS_IDENT: &str = r"[\p{L}_$][\p{L}\p{N}_$]*";
const RUST_VIS: &str = r"(?:pub(?:\s*\([^)]*\))?\s+)?";

struct PatternSpec {
    kind: KindRule,
    source: &'static str,
    declarations: bool,
    call_like: bool,
}

const fn keyword(source: &'static str) -> PatternSpec {
    PatternSpec { kind: KindRule::Keyword, source, declarations: false, call_like: false }
}

const fn fixed(kind: DefinitionKind, source: &'static str) -> PatternSpec {
    PatternSpec { kind: KindRule::Fixed(kind), source, declarations: false, call_like: false }
}

const fn call_like(kind: DefinitionKind, source: &'static str) -> PatternSpec {
    PatternSpec { kind: KindRule::Fixed(kind), source, declarations: false, call_like: true }
}

const fn with_declarations(mut spec: PatternSpec) -> PatternSpec {
    spec.declarations = true;
    spec
}

const C_FAMILY_PATTERNS: &[PatternSpec] = &[
    keyword(r"^\s*(?:inline\s+)?(?P<kw>namespace)(?:\s+(?P<name>{ID}(?:::{ID})*))?\s*(?:\{.*)?$"),
    keyword(
        r"^\s*(?:@{ID}(?:\(.*?\))?\s+)*(?:template\s*<.*?>\s*)?(?:(?:public|private|protected|internal|static|final|abstract|sealed|partial|export|typedef|readonly)\s+)*(?P<kw>class|struct|union|interface|enum(?:\s+class|\s+struct)?)\b(?:\s+[A-Z][A-Z0-9_]*_API)?(?:\s+(?P<name>{ID}))?\s*(?:<.*?>)?\s*(?:final\s*)?(?:(?::|\bextends\b|\bimplements\b|\bwhere\b)[^{;]*)?(?:\{.*)?$",
    ),
    call_like(
        DefinitionKind::Function,
        r"^\s*(?:@{ID}(?:\(.*?\))?\s+)*(?:template\s*<.*?>\s*)?(?P<pre>(?:{ID}(?:::{ID})*(?:\s*<.*?>)?[\s\*&]+)*?)(?P<name>~?{ID}(?:::~?{ID})*|operator\s*(?:\(\)|[^\s(]+))\s*\(",
    ),
];

const C_FAMILY_RESERVED: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "case", "default", "return", "goto",
    "break", "continue", "sizeof", "alignof", "typeof", "decltype", "new", "delete", "throw",
    "catch", "try", "using", "typedef", "static_assert", "defined", "synchronized", "lock",
    "fixed", "checked", "unchecked", "yield", "await", "co_return", "co_await", "assert",
];

const RUST_PATTERNS: &[PatternSpec] = &[
    keyword(r"^\s*{VIS}(?:unsafe\s+)?(?:auto\s+)?(?P<kw>trait)\s+(?P<name>{ID})"),
    keyword(
        r"^\s*(?:unsafe\s+)?(?:default\s+)?(?P<kw>impl)\b(?:\s*<.*?>)?\s+(?P<name>[^{;]+?)\s*(?:\bwhere\b.*?)?(?:\{.*)?$",
    ),
    with_declarations(keyword(r"^\s*{VIS}(?P<kw>struct|union)\s+(?P<name>{ID})")),
    keyword(r"^\s*{VIS}(?P<kw>enum)\s+(?P<name>{ID})"),
    keyword(r"^\s*{VIS}(?P<kw>mod)\s+(?P<name>{ID})"),
    keyword(
        r"^\s*{VIS}(?:default\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+)?(?P<kw>fn)\s+(?P<name>{ID})",
    ),
    keyword(r"^\s*(?P<kw>macro_rules)!\s*(?P<name>{ID})"),
];

const PYTHON_PATTERNS: &[PatternSpec] = &[
    keyword(r"^\s*(?P<kw>class)\s+(?P<name>{ID})"),
    keyword(r"^\s*(?:async\s+)?(?P<kw>def)\s+(?P<name>{ID})"),
];

const JS_PATTERNS: &[PatternSpec] = &[
    keyword(
        r"^\s*(?:@{JS}(?:\(.*?\))?\s+)*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?P<kw>class)\b(?:\s+(?P<name>{JS}))?\s*(?:<.*?>)?\s*(?:(?:extends|implements)\b[^{]*)?(?:\{.*)?$",
    ),
    keyword(r"^\s*(?:export\s+)?(?:declare\s+)?(?P<kw>interface)\s+(?P<name>{JS})"),
    keyword(r"^\s*(?:export\s+)?(?:declare\s+)?(?:const\s+)?(?P<kw>enum)\s+(?P<name>{JS})"),
    keyword(r"^\s*(?:export\s+)?(?:declare\s+)?(?P<kw>namespace|module)\s+(?P<name>{JS}(?:\.{JS})*)"),
    keyword(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:async\s+)?(?P<kw>function)\b\s*\*?\s*(?P<name>{JS})?",
    ),
    fixed(
        DefinitionKind::Function,
        r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>{JS})\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\(.*$|{JS}\s*=>)",
    ),
    fixed(DefinitionKind::Function, r"^\s*(?P<name>{JS})\s*:\s*(?:async\s+)?function\b"),
    call_like(
        DefinitionKind::Function,
        r"^\s*(?:(?:public|private|protected|static|readonly|async|override|abstract|get|set|declare)\s+)*\*?(?P<name>#?{JS})\s*(?:<.*?>)?\s*\(",
    ),
];

const JS_RESERVED: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "catch", "try", "finally", "function",
    "return", "typeof", "instanceof", "new", "delete", "void", "await", "yield", "super", "this",
    "import", "require", "with", "throw", "in", "of", "let", "const", "var",
];

const GO_PATTERNS: &[PatternSpec] = &[
    fixed(DefinitionKind::Method, r"^\s*func\s+\([^)]*\)\s*(?P<name>{ID})"),
    keyword(r"^\s*(?P<kw>func)\s+(?P<name>{ID})"),
    keyword(r"^\s*type\s+(?P<name>{ID})(?:\[.*?\])?\s+(?P<kw>struct|interface)\b"),
];

const SHELL_PATTERNS: &[PatternSpec] = &[
    keyword(r"^\s*(?P<kw>function)\s+(?P<name>[\p{L}_][\p{L}\p{N}_:.\-]*)"),
    call_like(DefinitionKind::Function, r"^\s*(?P<name>[\p{L}_][\p{L}\p{N}_:.\-]*)\s*\(\s*\)"),
];

const SHELL_RESERVED: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "select", "in",
];

const SQL_PATTERNS: &[PatternSpec] = &[
    keyword(
        r#"(?i)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:DEFINER\s*=\s*\S+\s+)?(?P<kw>FUNCTION|PROCEDURE)\s+(?:IF\s+NOT\s+EXISTS\s+)?["`\[]?(?P<name>[\p{L}_][\p{L}\p{N}_$.]*)"#,
    ),
    keyword(
        r#"(?i)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:(?:GLOBAL|LOCAL)\s+)?(?:TEMP(?:ORARY)?\s+)?(?:UNIQUE\s+)?(?:MATERIALIZED\s+)?(?P<kw>TABLE|VIEW|TYPE|TRIGGER|INDEX)\s+(?:IF\s+NOT\s+EXISTS\s+)?["`\[]?(?P<name>[\p{L}_][\p{L}\p{N}_$.]*)"#,
    ),
];

const GENERIC_PATTERNS: &[PatternSpec] = &[
    keyword(
        r"(?i)^\s*(?:(?:public|private|protected|internal|static|abstract|final|sealed|open|data|export)\s+)*(?P<kw>class|struct|interface|protocol|object|module|namespace|enum|trait|extension|record)\s+(?P<name>{ID})",
    ),
    keyword(
        r"(?i)^\s*(?:(?:public|private|protected|internal|static|async|override|open|export|suspend|inline)\s+)*(?P<kw>function|func|fun|fn|def|sub|procedure|proc)\s+(?P<name>{ID})",
    ),
    call_like(DefinitionKind::Function, r"^\s*(?P<name>{ID})\s*\(\s*\)\s*\{"),
];

const GENERIC_RESERVED: &[&str] = &["if", "for", "while", "switch", "catch", "return", "else"];

// ---------------------------------------------------------------------------
// Lexical tables
// ---------------------------------------------------------------------------

const SLASH_COMMENTS: &[LineComment] = &[LineComment { marker: "//", needs_boundary: false }];
const HASH_COMMENTS: &[LineComment] = &[LineComment { marker: "#", needs_boundary: false }];
const SHELL_COMMENTS: &[LineComment] = &[LineComment { marker: "#", needs_boundary: true }];
const SQL_COMMENTS: &[LineComment] = &[LineComment { marker: "--", needs_boundary: false }];
const GENERIC_COMMENTS: &[LineComment] = &[
    LineComment { marker: "//", needs_boundary: false },
    LineComment { marker: "#", needs_boundary: true },
];

const C_BLOCK: BlockComment = BlockComment { open: "/*", close: "*/", nested: false };
const RUST_BLOCK: BlockComment = BlockComment { open: "/*", close: "*/", nested: true };

const fn quoted(open: &'static str, escape: Escape, multiline: bool) -> LiteralRule {
    LiteralRule::Quoted { open, close: open, escape, multiline }
}

const C_FAMILY_LITERALS: &[LiteralRule] = &[
    LiteralRule::CppRaw,
    quoted("\"\"\"", Escape::Backslash, true),
    quoted("\"", Escape::Backslash, false),
    LiteralRule::CChar,
];
const RUST_LITERALS: &[LiteralRule] = &[
    LiteralRule::RustRaw,
    quoted("\"", Escape::Backslash, true),
    LiteralRule::CharOrLifetime,
];
const PYTHON_LITERALS: &[LiteralRule] = &[
    quoted("\"\"\"", Escape::Backslash, true),
    quoted("'''", Escape::Backslash, true),
    quoted("\"", Escape::Backslash, false),
    quoted("'", Escape::Backslash, false),
];
const JS_LITERALS: &[LiteralRule] = &[
    quoted("`", Escape::Backslash, true),
    quoted("\"", Escape::Backslash, false),
    quoted("'", Escape::Backslash, false),
    LiteralRule::JsRegex,
];
const GO_LITERALS: &[LiteralRule] = &[
    quoted("`", Escape::None, true),
    quoted("\"", Escape::Backslash, false),
    quoted("'", Escape::Backslash, false),
];
const SHELL_LITERALS: &[LiteralRule] =
    &[quoted("\"", Escape::Backslash, true), quoted("'", Escape::None, true)];
const SQL_LITERALS: &[LiteralRule] =
    &[quoted("$$", Escape::None, true), quoted("'", Escape::Doubled, true)];
const GENERIC_LITERALS: &[LiteralRule] =
    &[quoted("\"", Escape::Backslash, false), LiteralRule::CharOrLifetime];

const NO_DOCS: DocStyle = DocStyle { line_prefixes: &[], block_open: None, docstrings: false };

// ---------------------------------------------------------------------------
// Profile set
// ---------------------------------------------------------------------------

/// All compiled profiles, indexed by [`ProfileId`]. Immutable after
/// construction and shared freely across threads.
#[derive(Debug)]
pub struct ProfileSet {
    profiles: Vec<SourceProfile>,
}

static BUILTIN: Lazy<ProfileSet> = Lazy::new(ProfileSet::compile_builtin);

impl ProfileSet {
    /// The process-wide compiled built-in profiles.
    pub fn builtin() -> &'static ProfileSet {
        &BUILTIN
    }

    pub fn get(&self, id: ProfileId) -> &SourceProfile {
        // compile_builtin builds one profile per id, in declaration order
        &self.profiles[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceProfile> {
        self.profiles.iter()
    }

    fn compile_builtin() -> ProfileSet {
        let profiles = ProfileId::ALL.iter().map(|&id| build_profile(id)).collect();
        ProfileSet { profiles }
    }
}

fn compile_patterns(specs: &[PatternSpec]) -> Vec<DefinitionPattern> {
    specs
        .iter()
        .map(|spec| {
            let source = spec
                .source
                .replace("{ID}", IDENT)
                .replace("{JS}", JS_IDENT)
                .replace("{VIS}", RUST_VIS);
            let regex = Regex::new(&source)
                .unwrap_or_else(|e| panic!("built-in pattern failed to compile: {source}: {e}"));
            DefinitionPattern {
                kind: spec.kind,
                regex,
                allows_declaration: spec.declarations,
                call_like: spec.call_like,
            }
        })
        .collect()
}

fn build_profile(id: ProfileId) -> SourceProfile {
    match id {
        ProfileId::CFamily => SourceProfile {
            id,
            block_style: BlockStyle::Brace,
            lexical: LexicalRules {
                line_comments: SLASH_COMMENTS,
                block_comment: Some(C_BLOCK),
                literals: C_FAMILY_LITERALS,
            },
            patterns: compile_patterns(C_FAMILY_PATTERNS),
            reserved: C_FAMILY_RESERVED,
            decorator_prefixes: &["@", "[["],
            doc: DocStyle { line_prefixes: &["///"], block_open: Some("/**"), docstrings: false },
        },
        ProfileId::Rust => SourceProfile {
            id,
            block_style: BlockStyle::Brace,
            lexical: LexicalRules {
                line_comments: SLASH_COMMENTS,
                block_comment: Some(RUST_BLOCK),
                literals: RUST_LITERALS,
            },
            patterns: compile_patterns(RUST_PATTERNS),
            reserved: &[],
            decorator_prefixes: &["#["],
            doc: DocStyle { line_prefixes: &["///"], block_open: Some("/**"), docstrings: false },
        },
        ProfileId::Python => SourceProfile {
            id,
            block_style: BlockStyle::Indent,
            lexical: LexicalRules {
                line_comments: HASH_COMMENTS,
                block_comment: None,
                literals: PYTHON_LITERALS,
            },
            patterns: compile_patterns(PYTHON_PATTERNS),
            reserved: &[],
            decorator_prefixes: &["@"],
            doc: DocStyle { line_prefixes: &[], block_open: None, docstrings: true },
        },
        ProfileId::JavaScript => SourceProfile {
            id,
            block_style: BlockStyle::Brace,
            lexical: LexicalRules {
                line_comments: SLASH_COMMENTS,
                block_comment: Some(C_BLOCK),
                literals: JS_LITERALS,
            },
            patterns: compile_patterns(JS_PATTERNS),
            reserved: JS_RESERVED,
            decorator_prefixes: &["@"],
            doc: DocStyle { line_prefixes: &["///"], block_open: Some("/**"), docstrings: false },
        },
        ProfileId::Go => SourceProfile {
            id,
            block_style: BlockStyle::Brace,
            lexical: LexicalRules {
                line_comments: SLASH_COMMENTS,
                block_comment: Some(C_BLOCK),
                literals: GO_LITERALS,
            },
            patterns: compile_patterns(GO_PATTERNS),
            reserved: &[],
            decorator_prefixes: &[],
            doc: DocStyle { line_prefixes: &["//"], block_open: None, docstrings: false },
        },
        ProfileId::Shell => SourceProfile {
            id,
            block_style: BlockStyle::Brace,
            lexical: LexicalRules {
                line_comments: SHELL_COMMENTS,
                block_comment: None,
                literals: SHELL_LITERALS,
            },
            patterns: compile_patterns(SHELL_PATTERNS),
            reserved: SHELL_RESERVED,
            decorator_prefixes: &[],
            doc: DocStyle { line_prefixes: &["#"], block_open: None, docstrings: false },
        },
        ProfileId::Sql => SourceProfile {
            id,
            block_style: BlockStyle::Statement,
            lexical: LexicalRules {
                line_comments: SQL_COMMENTS,
                block_comment: Some(C_BLOCK),
                literals: SQL_LITERALS,
            },
            patterns: compile_patterns(SQL_PATTERNS),
            reserved: &[],
            decorator_prefixes: &[],
            doc: DocStyle { line_prefixes: &["--"], block_open: None, docstrings: false },
        },
        ProfileId::Generic => SourceProfile {
            id,
            block_style: BlockStyle::Brace,
            lexical: LexicalRules {
                line_comments: GENERIC_COMMENTS,
                block_comment: Some(C_BLOCK),
                literals: GENERIC_LITERALS,
            },
            patterns: compile_patterns(GENERIC_PATTERNS),
            reserved: GENERIC_RESERVED,
            decorator_prefixes: &["@"],
            doc: NO_DOCS,
        },
    }
}
