//! Outline extraction over the per-language fixtures.

mod helpers;

use defscan_core::{ClassifiedBy, DefinitionKind, DiagnosticKind, ProfileId, Severity};
use helpers::{by_name, names, outline, scan_fixture};

#[test]
fn test_c_family_outline() {
    let (_, result) = scan_fixture("sample.c");
    assert_eq!(result.profile, ProfileId::CFamily);
    assert_eq!(names(&result), vec!["", "Node", "sum3", "main"]);
    assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);

    let sum3 = by_name(&result, "sum3");
    assert_eq!(sum3.kind, DefinitionKind::Function);
    assert_eq!(sum3.signature, "static int sum3(int a, int b, int c)");
    assert_eq!(sum3.parameters.as_deref(), Some("int a, int b, int c"));
    assert_eq!(sum3.doc.as_deref(), Some("Sums three values."));
    assert_eq!(sum3.end_line - sum3.start_line, 6, "signature plus brace body");

    let main = by_name(&result, "main");
    assert_eq!(main.depth, 0);
    assert!(result.find("helper").is_empty(), "prototypes and calls are not definitions");
    assert!(result.find("fake").is_empty());
    assert!(result.find("commented_out").is_empty());
}

#[test]
fn test_rust_outline() {
    let (source, result) = scan_fixture("sample.rs");
    assert_eq!(result.profile, ProfileId::Rust);
    assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);
    assert_eq!(
        outline(&result),
        vec![
            ("Point", DefinitionKind::Struct, 0),
            ("Marker", DefinitionKind::Struct, 0),
            ("Shape", DefinitionKind::Enum, 0),
            ("Area", DefinitionKind::Trait, 0),
            ("describe", DefinitionKind::Method, 1),
            ("Area for Shape", DefinitionKind::Impl, 0),
            ("area", DefinitionKind::Method, 1),
            ("fmt::Display for Wrapper<'a>", DefinitionKind::Impl, 0),
            ("fmt", DefinitionKind::Method, 1),
            ("Wrapper", DefinitionKind::Struct, 0),
            ("inner", DefinitionKind::Module, 0),
            ("helper", DefinitionKind::Function, 1),
            ("square", DefinitionKind::Block, 0),
        ]
    );

    let point = by_name(&result, "Point");
    assert_eq!(point.doc.as_deref(), Some("A point in 2D space."));
    assert_eq!(point.decorators, vec!["#[derive(Debug, Clone, Copy)]"]);
    let body = point.body_span.expect("Point has a body");
    assert!(source[body.start..body.end].starts_with(b"{"));
    assert!(source[body.start..body.end].ends_with(b"}"));

    assert!(by_name(&result, "Marker").body_span.is_none());
    assert!(by_name(&result, "Wrapper").body_span.is_none());
    assert!(result.find("fake").is_empty(), "raw string contents are masked");
}

#[test]
fn test_python_outline() {
    let (_, result) = scan_fixture("sample.py");
    assert_eq!(result.profile, ProfileId::Python);
    assert_eq!(
        outline(&result),
        vec![
            ("top_level", DefinitionKind::Function, 0),
            ("Config", DefinitionKind::Class, 0),
            ("load", DefinitionKind::Method, 1),
            ("fetch", DefinitionKind::Method, 1),
            ("Meta", DefinitionKind::Class, 1),
            ("empty", DefinitionKind::Function, 0),
        ]
    );

    let top = by_name(&result, "top_level");
    assert_eq!(top.parameters.as_deref(), Some("path, *, strict=False"));
    assert_eq!(top.doc.as_deref(), Some("Return the path."));

    let config = by_name(&result, "Config");
    assert_eq!(config.decorators, vec!["@dataclass"]);
    assert_eq!(config.doc.as_deref(), Some("Holds settings."));
    assert_eq!(config.parameters, None);

    assert_eq!(by_name(&result, "load").doc, None, "a comment is not a docstring");

    let fetch = by_name(&result, "fetch");
    assert_eq!(fetch.decorators, vec!["@staticmethod"]);
    assert_eq!(fetch.parameters.as_deref(), Some("url: str"));

    let empty = by_name(&result, "empty");
    assert!(empty.body_span.is_some_and(|b| b.is_empty()), "immediate dedent gives an empty body");

    assert!(result.find("fake").is_empty());
    assert!(result.find("not_a_function").is_empty());
    assert!(result.find("commented").is_empty());
}

#[test]
fn test_javascript_outline() {
    let (_, result) = scan_fixture("sample.js");
    assert_eq!(result.profile, ProfileId::JavaScript);
    assert_eq!(
        outline(&result),
        vec![
            ("add", DefinitionKind::Function, 0),
            ("Greeter", DefinitionKind::Class, 0),
            ("constructor", DefinitionKind::Method, 1),
            ("greet", DefinitionKind::Method, 1),
            ("create", DefinitionKind::Method, 1),
            ("double", DefinitionKind::Function, 0),
        ]
    );

    let add = by_name(&result, "add");
    assert_eq!(add.doc.as_deref(), Some("Adds two numbers."));
    assert_eq!(add.parameters.as_deref(), Some("a, b"));

    for absent in ["fake", "shouldNotMatch", "alsoFake", "triple", "describe", "it"] {
        assert!(result.find(absent).is_empty(), "'{absent}' must not be reported");
    }
}

#[test]
fn test_go_outline() {
    let (_, result) = scan_fixture("sample.go");
    assert_eq!(result.profile, ProfileId::Go);
    assert_eq!(
        outline(&result),
        vec![
            ("Server", DefinitionKind::Struct, 0),
            ("Handler", DefinitionKind::Interface, 0),
            ("NewServer", DefinitionKind::Function, 0),
            ("Start", DefinitionKind::Method, 0),
        ]
    );
    assert_eq!(by_name(&result, "Server").doc.as_deref(), Some("Server handles requests."));

    let new_server = by_name(&result, "NewServer");
    assert_eq!(new_server.doc.as_deref(), Some("NewServer builds a server."));
    assert_eq!(new_server.parameters.as_deref(), Some("addr string"));

    let start = by_name(&result, "Start");
    assert_eq!(start.start_line, 19);
    assert_eq!(start.end_line, 25);
}

#[test]
fn test_shell_outline() {
    let (_, result) = scan_fixture("sample.sh");
    assert_eq!(result.profile, ProfileId::Shell);
    assert_eq!(names(&result), vec!["build", "deploy", "cleanup"]);
    assert!(result.definitions.iter().all(|d| d.kind == DefinitionKind::Function));
    assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);
}

#[test]
fn test_sql_outline() {
    let (source, result) = scan_fixture("sample.sql");
    assert_eq!(result.profile, ProfileId::Sql);
    assert_eq!(
        outline(&result),
        vec![
            ("users", DefinitionKind::Struct, 0),
            ("add_one", DefinitionKind::Function, 0),
            ("active_users", DefinitionKind::Block, 0),
        ]
    );

    let users = by_name(&result, "users");
    assert_eq!(users.doc.as_deref(), Some("schema"));
    let body = users.body_span.expect("statement body");
    assert!(source[..body.end].ends_with(b");"), "the quoted ';' does not end the statement");

    let add_one = by_name(&result, "add_one");
    let body = add_one.body_span.expect("statement body");
    assert!(source[..body.end].ends_with(b"plpgsql;"), "dollar-quoted body is skipped");
}

#[test]
fn test_unclosed_body_runs_to_end_of_input() {
    let (source, result) = scan_fixture("unclosed.rs");
    assert_eq!(names(&result), vec!["finished", "unfinished"]);

    assert_eq!(result.diagnostics.len(), 1, "diagnostics: {:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnbalancedDelimiter);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
    assert!(result.has_errors());

    let body = by_name(&result, "unfinished").body_span.expect("body opened");
    assert_eq!(body.end, source.len());
}

#[test]
fn test_override_and_shebang_classification() {
    let result = defscan_core::scan("def f():\n    pass\n", "script", Some(ProfileId::Python))
        .expect("scan");
    assert_eq!(result.classified_by, ClassifiedBy::Override);

    let (_, result) = scan_fixture("sample.sh");
    assert_eq!(result.classified_by, ClassifiedBy::Extension);

    let result = defscan_core::scan("#!/usr/bin/env python3\ndef f():\n    pass\n", "tool", None)
        .expect("scan");
    assert_eq!(result.profile, ProfileId::Python);
    assert_eq!(result.classified_by, ClassifiedBy::Shebang);
    assert_eq!(names(&result), vec!["f"]);
}
