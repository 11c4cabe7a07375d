#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tern_diagnostic::{Aborted, DiagnosticBag, ErrorCode};
use tern_ir::ast::{
    print_expr, print_namespace, BinaryOp, BooleanOp, ConditionalKind, DirectiveKind, ExprKind,
    ImportPath, LiteralKind, Member, Modifier, Namespace, PrimitiveType, StmtKind, TypeNodeKind,
};
use tern_ir::{Source, SourceId};

use super::parse;

fn try_parse(text: &str) -> (Result<Namespace, Aborted>, DiagnosticBag) {
    let mut bag = DiagnosticBag::new();
    let tokens = tern_lexer::tokenize(SourceId(0), &Source::new("test.tn", text), &mut bag);
    let result = parse(&tokens, &mut bag);
    (result, bag)
}

fn parse_ok(text: &str) -> (Namespace, DiagnosticBag) {
    let (result, bag) = try_parse(text);
    (result.unwrap(), bag)
}

fn parse_clean(text: &str) -> Namespace {
    let (ns, bag) = parse_ok(text);
    assert!(bag.is_empty(), "unexpected diagnostics: {:?}", bag.diagnostics());
    ns
}

fn codes(bag: &DiagnosticBag) -> Vec<ErrorCode> {
    bag.iter().map(|d| d.code).collect()
}

/// Statements of the body of the first function.
fn body_of(ns: &Namespace) -> &[tern_ir::ast::Stmt] {
    let Some(f) = ns.functions().next() else {
        panic!("no function in namespace");
    };
    &f.body.as_ref().unwrap().stmts
}

#[test]
fn test_constant_expression_tree() {
    let ns = parse_clean("const _ = 10*2+2");
    let Member::Global(global) = &ns.members[0] else {
        panic!("expected a global");
    };
    assert!(global.decl.is_const);
    assert_eq!(global.decl.name.name, "_");
    let value = global.decl.value.as_ref().unwrap();
    let ExprKind::Binary { op, left, right } = &value.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    assert!(matches!(&right.kind, ExprKind::Literal(lit) if lit.value == "2"));
    assert_eq!(print_namespace(&ns), "const _ = (10 * 2) + 2\n");
}

#[test]
fn test_precedence_tiers() {
    let ns = parse_clean("fn main() {\n    x = a || b && c == d + e * f\n}");
    let StmtKind::Expr(expr) = &body_of(&ns)[0].kind else {
        panic!("expected an expression statement");
    };
    assert_eq!(
        print_expr(expr),
        "x = ((a || b) && (c == (d + (e * f))))"
    );
}

#[test]
fn test_assignment_is_right_associative() {
    let ns = parse_clean("fn main() {\n    a = b += c\n}");
    let StmtKind::Expr(expr) = &body_of(&ns)[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Assignment { value, .. } = &expr.kind else {
        panic!("expected an assignment");
    };
    assert!(matches!(value.kind, ExprKind::Assignment { .. }));
}

#[test]
fn test_same_line_statements_warn() {
    let (ns, bag) = parse_ok("fn main() { var a = 1 var b = 2 }");
    assert_eq!(codes(&bag), vec![ErrorCode::W1001]);
    assert_eq!(body_of(&ns).len(), 2);
    assert_eq!(
        bag.diagnostics()[0].message,
        "maintain statements on different lines"
    );
}

#[test]
fn test_semicolon_separates_statements() {
    let ns = parse_clean("fn main() { var a = 1; var b = 2; }");
    assert_eq!(body_of(&ns).len(), 2);
}

#[test]
fn test_line_break_ends_expression() {
    let ns = parse_clean("fn main() {\n    a\n    (b)\n    c\n    -d\n    e++\n    ++f\n}");
    let printed: Vec<_> = body_of(&ns)
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Expr(e) => print_expr(e),
            _ => String::new(),
        })
        .collect();
    assert_eq!(printed, vec!["a", "b", "c", "-d", "e++", "++f"]);
}

#[test]
fn test_member_access_may_continue_on_next_line() {
    let ns = parse_clean("fn main() {\n    io\n        .println(1)\n}");
    assert_eq!(body_of(&ns).len(), 1);
}

#[test]
fn test_return_value_must_share_line() {
    let ns = parse_clean("fn f() {\n    return\n    x\n}\nfn g(): i32 {\n    return 1\n}");
    let fns: Vec<_> = ns.functions().collect();
    let stmts = &fns[0].body.as_ref().unwrap().stmts;
    assert!(matches!(stmts[0].kind, StmtKind::Return(None)));
    assert_eq!(stmts.len(), 2);
    let stmts = &fns[1].body.as_ref().unwrap().stmts;
    assert!(matches!(stmts[0].kind, StmtKind::Return(Some(_))));
}

#[test]
fn test_token_out_of_context() {
    let (ns, bag) = parse_ok("} 5 fn main() {}");
    assert_eq!(codes(&bag), vec![ErrorCode::E1003, ErrorCode::E1003]);
    assert_eq!(ns.members.len(), 1);
}

#[test]
fn test_expected_expression() {
    let (ns, bag) = parse_ok("fn main() {\n    var x = ,\n}");
    assert_eq!(codes(&bag), vec![ErrorCode::E1008]);
    assert_eq!(bag.diagnostics()[0].message, "expected expression, found ','");
    let StmtKind::Var(decl) = &body_of(&ns)[0].kind else {
        panic!("expected a declaration");
    };
    assert!(decl.value.as_ref().unwrap().is_bad());
}

#[test]
fn test_stray_closer_inside_block_is_reported_once() {
    let (ns, bag) = parse_ok("fn main() {\n    )\n    x\n}");
    assert_eq!(codes(&bag), vec![ErrorCode::E1008]);
    assert_eq!(body_of(&ns).len(), 2);
}

#[test]
fn test_expect_reports_and_skips() {
    let (ns, bag) = parse_ok("fn 1() {}");
    assert_eq!(codes(&bag), vec![ErrorCode::E1001]);
    assert_eq!(
        bag.diagnostics()[0].message,
        "expected 'identifier', found '1'"
    );
    assert_eq!(ns.members.len(), 1);
}

#[test]
fn test_unexpected_eof_aborts() {
    let (result, bag) = try_parse("fn main() {\n    var x = 1\n");
    assert_eq!(result, Err(Aborted::UnexpectedEof));
    assert_eq!(codes(&bag), vec![ErrorCode::E1002]);
    assert_eq!(bag.diagnostics()[0].message, "unexpected <EOF>");
}

#[test]
fn test_param_types_are_inherited() {
    let (ns, bag) = parse_ok("fn f(a, b: i32, c: bool, d) {}");
    assert_eq!(codes(&bag), vec![ErrorCode::E1004]);
    let f = ns.functions().next().unwrap();
    let tys: Vec<_> = f.params.iter().map(|p| p.ty.kind.clone()).collect();
    assert_eq!(
        tys,
        vec![
            TypeNodeKind::Primitive(PrimitiveType::I32),
            TypeNodeKind::Primitive(PrimitiveType::I32),
            TypeNodeKind::Primitive(PrimitiveType::Bool),
            TypeNodeKind::Bad,
        ]
    );
}

#[test]
fn test_attributes_on_directive() {
    let (ns, bag) = parse_ok("[inline]\npub import \"std/io\"");
    assert_eq!(codes(&bag), vec![ErrorCode::E1005, ErrorCode::E1006]);
    let Member::Directive(directive) = &ns.members[0] else {
        panic!("expected a directive");
    };
    assert_eq!(
        directive.kind,
        DirectiveKind::Import(ImportPath::File("std/io".into()))
    );
}

#[test]
fn test_pragmas_and_modifier_attach_once() {
    let ns = parse_clean("[inline, cc: \"c\"]\npub fn f()\nfn g() {}");
    let fns: Vec<_> = ns.functions().collect();
    assert_eq!(fns[0].modifier, Modifier::Public);
    assert!(fns[0].body.is_none());
    assert_eq!(fns[0].pragmas.entries.len(), 2);
    assert_eq!(fns[0].pragmas.get("inline").unwrap().kind, LiteralKind::Bool);
    assert_eq!(fns[0].pragmas.get("cc").unwrap().value, "c");
    assert_eq!(fns[1].modifier, Modifier::Private);
    assert!(fns[1].pragmas.is_empty());
}

#[test]
fn test_generic_call_speculation() {
    let ns = parse_clean("fn main() {\n    f<i32, Box<u8>>(x)\n    a < b\n    c < d && e > (g)\n}");
    let stmts = body_of(&ns);
    let StmtKind::Expr(call) = &stmts[0].kind else {
        panic!("expected a call");
    };
    let ExprKind::Call(call) = &call.kind else {
        panic!("expected a call");
    };
    assert_eq!(call.generics.len(), 2);
    let StmtKind::Expr(cmp) = &stmts[1].kind else {
        panic!("expected a comparison");
    };
    assert!(matches!(cmp.kind, ExprKind::Boolean { op: BooleanOp::Less, .. }));
    let StmtKind::Expr(logic) = &stmts[2].kind else {
        panic!("expected a logical expression");
    };
    assert!(matches!(logic.kind, ExprKind::Boolean { op: BooleanOp::And, .. }));
}

#[test]
fn test_error_union_only_in_return_position() {
    parse_clean("fn f(): Err!i32 {}");
    let (_, bag) = parse_ok("var x: Err!i32");
    assert_eq!(codes(&bag), vec![ErrorCode::E1007]);
}

#[test]
fn test_conditional_chain() {
    let ns = parse_clean(
        "fn main() {\n    if a { 1 } elif b { 2 } else if c { 3 } else { 4 }\n}",
    );
    let StmtKind::Expr(expr) = &body_of(&ns)[0].kind else {
        panic!("expected a conditional");
    };
    let ExprKind::Conditional(cond) = &expr.kind else {
        panic!("expected a conditional");
    };
    assert!(cond.is_exhaustive());
    let mut kinds = vec![cond.kind];
    let mut link = cond.else_node.as_deref();
    while let Some(next) = link {
        kinds.push(next.kind);
        link = next.else_node.as_deref();
    }
    assert_eq!(
        kinds,
        vec![
            ConditionalKind::If,
            ConditionalKind::Elif,
            ConditionalKind::Elif,
            ConditionalKind::Else,
        ]
    );
}

#[test]
fn test_declarations() {
    let ns = parse_clean(
        "type P<T> {\n    pub x: T,\n    y: T\n    priv fn get(): T { x }\n}\n\
         type V = (i32 | P<i32>)\n\
         enum E(u16) { A, B: 5, C: -1 }",
    );
    let Member::Struct(s) = &ns.members[0] else {
        panic!("expected a struct");
    };
    assert_eq!(s.generics.len(), 1);
    assert_eq!(s.fields.len(), 2);
    assert_eq!(s.fields[0].modifier, Modifier::Public);
    assert_eq!(s.methods.len(), 1);
    let Member::Variant(v) = &ns.members[1] else {
        panic!("expected a variant");
    };
    assert_eq!(v.members.len(), 2);
    let Member::Enum(e) = &ns.members[2] else {
        panic!("expected an enum");
    };
    assert_eq!(e.members.len(), 3);
    assert_eq!(e.members[2].value.as_ref().unwrap().value, "-1");
}

#[test]
fn test_for_heads_are_optional() {
    let ns = parse_clean("fn main() {\n    for , , {\n        break\n    }\n}");
    let StmtKind::For(for_loop) = &body_of(&ns)[0].kind else {
        panic!("expected a for loop");
    };
    assert!(for_loop.init.is_none());
    assert!(for_loop.condition.is_none());
    assert!(for_loop.step.is_none());
}

const PROGRAM: &str = r#"import "std/io"
import core
use out = io.println

[inline, cc: "c"]
pub fn add<T>(a, b: T): T {
    return a + b
}

fn proto(x: i32): Err!i32

type Point<T> {
    pub x: T,
    y: T
    fn len(self: &Point<T>): f64 {
        self.x * self.x
    }
}

type Shape = (Point<i32> | i32)

enum Color(u16) {
    Red,
    Green: 5,
    Blue: -1
}

const limit: u64 = 100

fn main() {
    var a = 10
    var f = 2.5
    var g = 3f
    var s = "tab\there"
    var c = 'x'
    var p = new Point<i32> { x: 1, y: 2 }
    var q = new [i32, 3] { 1, 2, 3 }
    var r: ?i32 = new {}
    for var i = 0, i < 10, i++ {
        if i == 5 { break } elif i > 7 { continue } else { a += i }
    }
    for , , {
        break
    }
    while a > 0 {
        a -= 1
    }
    var v = switch a {
        1 { 10 }
        else { 20 }
    }
    var w = add<i32>(1, 2) catch e { 0 }
    var t = try proto(1)
    var m = -a * !true
    *(&a) = 3
    var k = a as u8
    if p is Point<i32> pt {
        out(pt.x)
    }
    q[0] = q[1]
    a++
    --a
    var e = `+`
}
"#;

#[test]
fn test_roundtrip_program() {
    let ns = parse_clean(PROGRAM);
    let printed = print_namespace(&ns);
    let reparsed = parse_clean(&printed);
    assert_eq!(print_namespace(&reparsed), printed);
    assert_eq!(reparsed.members.len(), ns.members.len());
}

#[test]
fn test_printed_forms() {
    let ns = parse_clean("fn main() {\n    var w = f<i32>(1) catch e { 0 }\n    x is P<i32> y\n}");
    assert_eq!(
        print_namespace(&ns),
        "fn main() {\n    var w = f<i32>(1) catch e {\n        0\n    }\n    x is P<i32> y\n}\n"
    );
}

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "fn", "var", "const", "type", "enum", "if", "elif", "else", "while", "for", "return",
        "switch", "new", "try", "catch", "import", "use", "pub", "[", "]", "(", ")", "{", "}",
        "<", ">", ",", ":", ";", "=", "+", "-", "*", "!", "&", "?", ".", "is", "as", "x", "y",
        "1", "2.5", "\"s\"", "true", "\n",
    ])
}

proptest! {
    #[test]
    fn prop_parse_terminates(parts in prop::collection::vec(fragment(), 0..48)) {
        let text = parts.join(" ");
        let (result, bag) = try_parse(&text);
        match result {
            Ok(_) => {}
            Err(aborted) => {
                prop_assert_eq!(aborted, Aborted::UnexpectedEof);
                prop_assert!(bag.iter().any(|d| d.code == ErrorCode::E1002));
            }
        }
    }

    #[test]
    fn prop_arithmetic_roundtrips(
        operands in prop::collection::vec(0u32..100, 1..8),
        ops in prop::collection::vec(prop::sample::select(vec!["+", "-", "*", "/", "=="]), 7),
    ) {
        let mut text = String::from("const c = ");
        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                text.push_str(ops[i - 1]);
            }
            text.push_str(&operand.to_string());
        }
        let ns = parse_clean(&text);
        let printed = print_namespace(&ns);
        let reparsed = parse_clean(&printed);
        prop_assert_eq!(print_namespace(&reparsed), printed);
    }
}
