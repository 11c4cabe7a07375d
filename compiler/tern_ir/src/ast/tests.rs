use pretty_assertions::assert_eq;

use super::*;
use crate::{SourceId, Span};

fn pos(start: u32, end: u32) -> Pos {
    Pos::new(SourceId(0), Span::new(start, end))
}

fn int(value: &str) -> Expr {
    Expr::new(ExprKind::Literal(Literal::new(LiteralKind::Int, value)), pos(0, 1))
}

fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Identifier(name.to_string()), pos(0, 1))
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        pos(0, 1),
    )
}

#[test]
fn test_print_parenthesizes_compound_operands() {
    let expr = binary(
        BinaryOp::Add,
        binary(BinaryOp::Mul, int("10"), int("2")),
        int("2"),
    );
    assert_eq!(print_expr(&expr), "(10 * 2) + 2");
}

#[test]
fn test_print_nested_prefix_does_not_merge_into_decrement() {
    let inner = Expr::new(
        ExprKind::Prefix {
            op: PrefixOp::Neg,
            expr: Box::new(ident("x")),
        },
        pos(0, 2),
    );
    let outer = Expr::new(
        ExprKind::Prefix {
            op: PrefixOp::Neg,
            expr: Box::new(inner),
        },
        pos(0, 3),
    );
    assert_eq!(print_expr(&outer), "-(-x)");
}

#[test]
fn test_print_reserved_names_use_backticks() {
    assert_eq!(print_expr(&ident("new")), "`new`");
    assert_eq!(print_expr(&ident("+")), "`+`");
    assert_eq!(print_expr(&ident("plain_name1")), "plain_name1");
}

#[test]
fn test_print_escapes_literals() {
    let s = Expr::new(
        ExprKind::Literal(Literal::new(LiteralKind::Str, "a\"b\n")),
        pos(0, 1),
    );
    assert_eq!(print_expr(&s), r#""a\"b\n""#);

    let c = Expr::new(
        ExprKind::Literal(Literal::new(LiteralKind::Char, "'")),
        pos(0, 1),
    );
    assert_eq!(print_expr(&c), r"'\''");

    let f = Expr::new(
        ExprKind::Literal(Literal::new(LiteralKind::Float, "3")),
        pos(0, 1),
    );
    assert_eq!(print_expr(&f), "3f");
}

#[test]
fn test_print_types() {
    let i32_ty = TypeNode::primitive(PrimitiveType::I32, pos(0, 3));
    let named = TypeNode::new(
        TypeNodeKind::Named {
            name: "Box".to_string(),
            args: vec![i32_ty.clone()],
        },
        pos(0, 8),
    );
    let ty = TypeNode::new(
        TypeNodeKind::EnumError {
            error: Box::new(TypeNode::new(
                TypeNodeKind::Named {
                    name: "Err".to_string(),
                    args: vec![],
                },
                pos(0, 3),
            )),
            success: Box::new(TypeNode::new(
                TypeNodeKind::Option(Box::new(named)),
                pos(0, 9),
            )),
        },
        pos(0, 12),
    );
    assert_eq!(print_type(&ty), "Err!?Box<i32>");
}

#[test]
fn test_conditional_exhaustiveness() {
    let body = Block {
        stmts: vec![],
        pos: pos(0, 2),
    };
    let else_node = Conditional {
        kind: ConditionalKind::Else,
        condition: None,
        body: body.clone(),
        else_node: None,
        pos: pos(0, 4),
    };
    let mut chain = Conditional {
        kind: ConditionalKind::If,
        condition: Some(ident("c")),
        body,
        else_node: None,
        pos: pos(0, 2),
    };
    assert!(!chain.is_exhaustive());
    chain.else_node = Some(Box::new(else_node));
    assert!(chain.is_exhaustive());
}

#[test]
fn test_pragmas_lookup() {
    let pragmas = Pragmas {
        entries: vec![Pragma {
            name: Ident::new("inline", pos(1, 7)),
            value: Literal::boolean(true),
        }],
    };
    assert_eq!(pragmas.get("inline"), Some(&Literal::boolean(true)));
    assert_eq!(pragmas.get("export"), None);
}

#[test]
fn test_print_namespace_function() {
    let f = FunctionDecl {
        name: Ident::new("main", pos(3, 7)),
        generics: vec![],
        params: vec![],
        ret: None,
        body: Some(Block {
            stmts: vec![Stmt::new(StmtKind::Return(None), pos(10, 16))],
            pos: pos(9, 18),
        }),
        modifier: Modifier::Private,
        pragmas: Pragmas::default(),
        pos: pos(0, 18),
    };
    let ns = Namespace {
        members: vec![Member::Function(f)],
    };
    assert_eq!(print_namespace(&ns), "fn main() {\n    return\n}\n");
}
