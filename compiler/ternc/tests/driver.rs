// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests of the driver: sources in, MIR or diagnostics out.

use pretty_assertions::assert_eq;
use tern_diagnostic::{Diagnostic, DiagnosticConfig, ErrorCode};
use tern_ir::Source;
use ternc::{compile, compile_all, compile_with, Session, SessionConfig};

fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.code)
        .collect()
}

#[test]
fn test_compile_single_source() {
    let module = compile([Source::new("main.tn", "fn main() {\n    var x = 1\n}")]).unwrap();
    let main = module.function("main").unwrap();
    assert_eq!(main.locals.len(), 1);
    assert!(module.to_string().contains(".fn main()"));
}

#[test]
fn test_sources_share_one_namespace() {
    let module = compile([
        Source::new("util.tn", "fn twice(x: i32): i32 { x * 2 }"),
        Source::new("main.tn", "fn main() {\n    var y = twice(4)\n}"),
    ])
    .unwrap();
    assert!(module.function("twice").is_some());
    assert!(module.function("main").is_some());
}

#[test]
fn test_lexical_errors_stop_before_parsing() {
    let diagnostics = compile([Source::new("main.tn", "\"abc")]).unwrap_err();
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E0001]);
}

#[test]
fn test_semantic_error_is_reported() {
    let diagnostics =
        compile([Source::new("main.tn", "fn f(): i32 { true }\nfn main() {}")]).unwrap_err();
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E2002]);
    assert_eq!(
        diagnostics[0].message,
        "type mismatch: expected 'i32', got 'bool'"
    );
}

#[test]
fn test_library_unit_needs_no_entry_point() {
    let text = "fn helper(): i32 { 1 }";
    let diagnostics = compile([Source::new("lib.tn", text)]).unwrap_err();
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E2020]);

    let config = SessionConfig::default().library();
    let module = compile_with([Source::new("lib.tn", text)], &config).unwrap();
    assert!(module.function("helper").is_some());
}

#[test]
fn test_custom_entry_point() {
    let config = SessionConfig {
        entry_point: "start".to_owned(),
        ..SessionConfig::default()
    };
    let module = compile_with([Source::new("main.tn", "fn start() {}")], &config).unwrap();
    assert!(module.function("start").is_some());
}

#[test]
fn test_error_limit() {
    let text = "fn main() {\n    var a = 1\n    a + 1\n    a + 2\n    a + 3\n    var b = 2\n}";
    let diagnostics = compile([Source::new("main.tn", text)]).unwrap_err();
    assert_eq!(codes(&diagnostics).len(), 3);

    let config = SessionConfig {
        diagnostics: DiagnosticConfig::default().with_error_limit(1),
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);
    session.add_source(Source::new("main.tn", text));
    assert!(session.run().is_err());
    assert_eq!(session.diagnostics().error_count(), 1);
    assert_eq!(session.diagnostics().suppressed_count(), 2);
}

#[test]
fn test_session_keeps_warnings() {
    let mut session = Session::new(SessionConfig::default());
    session.add_source(Source::new("main.tn", "fn main() {\n    size<i32>()\n}"));
    assert!(session.run().is_ok());
    assert_eq!(session.diagnostics().warning_count(), 1);
    let rendered: Vec<String> = session.render_diagnostics().collect();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].starts_with("main.tn(2:5): warning[W2003]"));
}

#[test]
fn test_rendered_error_points_at_source() {
    let mut session = Session::new(SessionConfig::default());
    session.add_source(Source::new("main.tn", "fn main() {\n    break\n}"));
    assert!(session.run().is_err());
    let rendered: Vec<String> = session.render_diagnostics().collect();
    assert_eq!(
        rendered,
        vec!["main.tn(2:5): error[E2034]: 'break' outside of a loop\n 2 |     break\n   |     ^^^^^"
            .to_owned()]
    );
}

#[test]
fn test_add_file_reports_missing_file() {
    let mut session = Session::new(SessionConfig::default());
    let err = session
        .add_file(std::path::Path::new("does/not/exist.tn"))
        .unwrap_err();
    assert!(err.to_string().starts_with("cannot read 'does/not/exist.tn'"));
}

#[test]
fn test_compile_all_keeps_unit_order() {
    let units = vec![
        vec![Source::new("a.tn", "fn main() {}")],
        vec![Source::new("b.tn", "fn main() {\n    break\n}")],
        vec![Source::new("c.tn", "fn main() {\n    var x = size<u64>()\n}")],
    ];
    let results = compile_all(units, &SessionConfig::default());
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(codes(results[1].as_ref().unwrap_err()), vec![ErrorCode::E2034]);
    let module = results[2].as_ref().unwrap();
    let constant = module
        .function("main")
        .unwrap()
        .instructions()
        .find_map(tern_mir::Instruction::constant_int);
    assert_eq!(constant, Some(8));
}

#[test]
fn test_json_dump_names_functions() {
    let module = compile([Source::new("main.tn", "fn main() {}")]).unwrap();
    let json = tern_mir::dump_json(&module);
    assert_eq!(json["functions"][0]["name"], "main");
}
