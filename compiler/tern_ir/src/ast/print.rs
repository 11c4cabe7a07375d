//! Canonical source printer for the syntax tree.
//!
//! Output re-parses to a tree of the same shape. Every compound operand is
//! parenthesized, so the printer never has to reason about precedence.

use std::fmt::Write;

use super::{
    Block, Call, Conditional, ConditionalKind, Directive, DirectiveKind, EnumDecl, Expr,
    ExprKind, ForLoop, FunctionDecl, GlobalDecl, Ident, ImportPath, Literal, LiteralKind, Member,
    Modifier, Namespace, Pragmas, Stmt, StmtKind, StructDecl, TypeNode, TypeNodeKind, VarDecl,
    VariantDecl,
};
use crate::TokenKind;

const INDENT: &str = "    ";

/// Print a whole namespace, one member per paragraph.
pub fn print_namespace(ns: &Namespace) -> String {
    let mut p = Printer::default();
    for (i, member) in ns.members.iter().enumerate() {
        if i > 0 {
            p.out.push('\n');
        }
        p.member(member);
        p.out.push('\n');
    }
    p.out
}

pub fn print_expr(expr: &Expr) -> String {
    let mut p = Printer::default();
    p.expr(expr);
    p.out
}

pub fn print_type(ty: &TypeNode) -> String {
    let mut p = Printer::default();
    p.ty(ty);
    p.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn ident(&mut self, name: &str) {
        if is_plain_ident(name) {
            self.out.push_str(name);
        } else {
            self.out.push('`');
            self.out.push_str(name);
            self.out.push('`');
        }
    }

    fn modifier(&mut self, modifier: Modifier) {
        if modifier == Modifier::Public {
            self.out.push_str("pub ");
        }
    }

    fn pragmas(&mut self, pragmas: &Pragmas) {
        if pragmas.is_empty() {
            return;
        }
        self.out.push('[');
        for (i, pragma) in pragmas.entries.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.ident(&pragma.name.name);
            self.out.push_str(": ");
            self.literal(&pragma.value);
        }
        self.out.push(']');
        self.newline();
    }

    fn member(&mut self, member: &Member) {
        match member {
            Member::Function(f) => self.function(f),
            Member::Struct(s) => self.structure(s),
            Member::Enum(e) => self.enumeration(e),
            Member::Variant(v) => self.variant(v),
            Member::Global(g) => self.global(g),
            Member::Directive(d) => self.directive(d),
        }
    }

    fn generic_params(&mut self, generics: &[Ident]) {
        if generics.is_empty() {
            return;
        }
        self.out.push('<');
        for (i, g) in generics.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.ident(&g.name);
        }
        self.out.push('>');
    }

    fn function(&mut self, f: &FunctionDecl) {
        self.pragmas(&f.pragmas);
        self.modifier(f.modifier);
        self.out.push_str("fn ");
        self.ident(&f.name.name);
        self.generic_params(&f.generics);
        self.out.push('(');
        for (i, param) in f.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.ident(&param.name.name);
            self.out.push_str(": ");
            self.ty(&param.ty);
            if let Some(default) = &param.default {
                self.out.push_str(" = ");
                self.literal(default);
            }
        }
        self.out.push(')');
        if let Some(ret) = &f.ret {
            self.out.push_str(": ");
            self.ty(ret);
        }
        if let Some(body) = &f.body {
            self.out.push(' ');
            self.block(body);
        }
    }

    fn structure(&mut self, s: &StructDecl) {
        self.pragmas(&s.pragmas);
        self.modifier(s.modifier);
        self.out.push_str("type ");
        self.ident(&s.name.name);
        self.generic_params(&s.generics);
        self.out.push_str(" {");
        self.depth += 1;
        for field in &s.fields {
            self.newline();
            self.modifier(field.modifier);
            self.ident(&field.name.name);
            self.out.push_str(": ");
            self.ty(&field.ty);
            self.out.push(',');
        }
        for method in &s.methods {
            self.newline();
            self.function(method);
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
    }

    fn enumeration(&mut self, e: &EnumDecl) {
        self.pragmas(&e.pragmas);
        self.modifier(e.modifier);
        self.out.push_str("enum ");
        self.ident(&e.name.name);
        if let Some(base) = &e.base {
            self.out.push('(');
            self.ty(base);
            self.out.push(')');
        }
        self.out.push_str(" {");
        self.depth += 1;
        for member in &e.members {
            self.newline();
            self.ident(&member.name.name);
            if let Some(value) = &member.value {
                self.out.push_str(": ");
                self.literal(value);
            }
            self.out.push(',');
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
    }

    fn variant(&mut self, v: &VariantDecl) {
        self.pragmas(&v.pragmas);
        self.modifier(v.modifier);
        self.out.push_str("type ");
        self.ident(&v.name.name);
        self.out.push_str(" = (");
        for (i, member) in v.members.iter().enumerate() {
            if i > 0 {
                self.out.push_str(" | ");
            }
            self.ty(member);
        }
        self.out.push(')');
    }

    fn global(&mut self, g: &GlobalDecl) {
        self.pragmas(&g.pragmas);
        self.modifier(g.modifier);
        self.var(&g.decl);
    }

    fn directive(&mut self, d: &Directive) {
        match &d.kind {
            DirectiveKind::Import(ImportPath::File(path)) => {
                self.out.push_str("import ");
                self.quoted(path, '"');
            }
            DirectiveKind::Import(ImportPath::Package(name)) => {
                self.out.push_str("import ");
                self.ident(name);
            }
            DirectiveKind::Use { alias, target } => {
                self.out.push_str("use ");
                self.ident(&alias.name);
                self.out.push_str(" = ");
                self.expr(target);
            }
        }
    }

    fn var(&mut self, decl: &VarDecl) {
        self.out
            .push_str(if decl.is_const { "const " } else { "var " });
        self.ident(&decl.name.name);
        if let Some(ty) = &decl.ty {
            self.out.push_str(": ");
            self.ty(ty);
        }
        if let Some(value) = &decl.value {
            self.out.push_str(" = ");
            self.expr(value);
        }
    }

    fn block(&mut self, block: &Block) {
        self.out.push('{');
        self.depth += 1;
        for stmt in &block.stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value);
                }
            }
            StmtKind::For(for_loop) => self.for_loop(for_loop),
            StmtKind::Break => self.out.push_str("break"),
            StmtKind::Continue => self.out.push_str("continue"),
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::Bad => self.out.push_str("<bad>"),
        }
    }

    fn for_loop(&mut self, for_loop: &ForLoop) {
        self.out.push_str("for ");
        if let Some(init) = &for_loop.init {
            self.stmt(init);
        }
        self.out.push_str(", ");
        if let Some(condition) = &for_loop.condition {
            self.expr(condition);
        }
        self.out.push_str(", ");
        if let Some(step) = &for_loop.step {
            self.stmt(step);
            self.out.push(' ');
        }
        self.block(&for_loop.body);
    }

    fn conditional(&mut self, cond: &Conditional) {
        self.out.push_str(match cond.kind {
            ConditionalKind::If => "if ",
            ConditionalKind::Elif => "elif ",
            ConditionalKind::Else => "else ",
            ConditionalKind::While => "while ",
        });
        if let Some(condition) = &cond.condition {
            self.expr(condition);
            self.out.push(' ');
        }
        self.block(&cond.body);
        if let Some(next) = &cond.else_node {
            self.out.push(' ');
            self.conditional(next);
        }
    }

    /// Print `expr`, wrapping it in parentheses unless it is an atom.
    fn operand(&mut self, expr: &Expr) {
        if is_atom(expr) {
            self.expr(expr);
        } else {
            self.out.push('(');
            self.expr(expr);
            self.out.push(')');
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Identifier(name) => self.ident(name),
            ExprKind::Binary { op, left, right } => {
                self.operand(left);
                let _ = write!(self.out, " {} ", op.as_str());
                self.operand(right);
            }
            ExprKind::Boolean { op, left, right } => {
                self.operand(left);
                let _ = write!(self.out, " {} ", op.as_str());
                self.operand(right);
            }
            ExprKind::Is { expr, ty, alias } => {
                self.operand(expr);
                self.out.push_str(" is ");
                self.ty(ty);
                if let Some(alias) = alias {
                    self.out.push(' ');
                    self.ident(&alias.name);
                }
            }
            ExprKind::Prefix { op, expr } => {
                self.out.push_str(op.as_str());
                self.operand(expr);
            }
            ExprKind::Postfix { op, expr } => {
                self.operand(expr);
                self.out.push_str(op.as_str());
            }
            ExprKind::Member { base, member } => {
                self.operand(base);
                self.out.push('.');
                self.ident(&member.name);
            }
            ExprKind::Index { base, index } => {
                self.operand(base);
                self.out.push('[');
                self.expr(index);
                self.out.push(']');
            }
            ExprKind::Call(call) => self.call(call),
            ExprKind::Try(inner) => {
                self.out.push_str("try ");
                self.operand(inner);
            }
            ExprKind::Cast { expr, ty } => {
                self.operand(expr);
                self.out.push_str(" as ");
                self.ty(ty);
            }
            ExprKind::TypeAlloc { ty, fields } => {
                self.out.push_str("new ");
                if let Some(ty) = ty {
                    self.ty(ty);
                    self.out.push(' ');
                }
                self.out.push('{');
                for (i, field) in fields.iter().enumerate() {
                    self.out.push_str(if i > 0 { ", " } else { " " });
                    self.ident(&field.name.name);
                    self.out.push_str(": ");
                    self.expr(&field.value);
                }
                self.out.push_str(if fields.is_empty() { "}" } else { " }" });
            }
            ExprKind::ArrayAlloc {
                elem,
                size,
                elements,
            } => {
                self.out.push_str("new [");
                self.ty(elem);
                if let Some(size) = size {
                    self.out.push_str(", ");
                    self.expr(size);
                }
                self.out.push_str("] {");
                for (i, element) in elements.iter().enumerate() {
                    self.out.push_str(if i > 0 { ", " } else { " " });
                    self.expr(element);
                }
                self.out.push_str(if elements.is_empty() { "}" } else { " }" });
            }
            ExprKind::Block(block) => self.block(block),
            ExprKind::Conditional(cond) => self.conditional(cond),
            ExprKind::Switch {
                scrutinee,
                cases,
                default,
            } => {
                self.out.push_str("switch ");
                self.operand(scrutinee);
                self.out.push_str(" {");
                self.depth += 1;
                for case in cases {
                    self.newline();
                    self.operand(&case.value);
                    self.out.push(' ');
                    self.block(&case.body);
                }
                if let Some(default) = default {
                    self.newline();
                    self.out.push_str("else ");
                    self.block(default);
                }
                self.depth -= 1;
                self.newline();
                self.out.push('}');
            }
            ExprKind::Assignment { op, target, value } => {
                self.operand(target);
                let _ = write!(self.out, " {} ", op.as_str());
                self.operand(value);
            }
            ExprKind::Bad => self.out.push_str("<bad>"),
        }
    }

    fn call(&mut self, call: &Call) {
        self.operand(&call.callee);
        if !call.generics.is_empty() {
            self.out.push('<');
            for (i, ty) in call.generics.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.ty(ty);
            }
            self.out.push('>');
        }
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
        if let Some(catch) = &call.catch {
            self.out.push_str(" catch ");
            if let Some(binding) = &catch.binding {
                self.ident(&binding.name);
                self.out.push(' ');
            }
            self.block(&catch.body);
        }
    }

    fn literal(&mut self, lit: &Literal) {
        match lit.kind {
            LiteralKind::Int | LiteralKind::Bool => self.out.push_str(&lit.value),
            LiteralKind::Float => {
                self.out.push_str(&lit.value);
                if !lit.value.contains('.') {
                    self.out.push('f');
                }
            }
            LiteralKind::Str => self.quoted(&lit.value, '"'),
            LiteralKind::Char => self.quoted(&lit.value, '\''),
        }
    }

    fn quoted(&mut self, value: &str, quote: char) {
        self.out.push(quote);
        for c in value.chars() {
            match c {
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                '\0' => self.out.push_str("\\0"),
                '\\' => self.out.push_str("\\\\"),
                c if c == quote => {
                    self.out.push('\\');
                    self.out.push(c);
                }
                c => self.out.push(c),
            }
        }
        self.out.push(quote);
    }

    fn ty(&mut self, ty: &TypeNode) {
        match &ty.kind {
            TypeNodeKind::Primitive(p) => self.out.push_str(p.as_str()),
            TypeNodeKind::Named { name, args } => {
                self.ident(name);
                if !args.is_empty() {
                    self.out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.ty(arg);
                    }
                    self.out.push('>');
                }
            }
            TypeNodeKind::Pointer(base) => {
                self.out.push('*');
                self.ty(base);
            }
            TypeNodeKind::Reference(base) => {
                self.out.push('&');
                self.ty(base);
            }
            TypeNodeKind::Option(base) => {
                self.out.push('?');
                self.ty(base);
            }
            TypeNodeKind::Array(base) => {
                self.out.push('[');
                self.ty(base);
                self.out.push(']');
            }
            TypeNodeKind::Tuple(items) => {
                self.out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.ty(item);
                }
                self.out.push(')');
            }
            TypeNodeKind::EnumError { error, success } => {
                self.ty(error);
                self.out.push('!');
                self.ty(success);
            }
            TypeNodeKind::Bad => self.out.push_str("<bad>"),
        }
    }
}

fn is_atom(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Literal(_)
            | ExprKind::Identifier(_)
            | ExprKind::Member { .. }
            | ExprKind::Index { .. }
            | ExprKind::Call(_)
            | ExprKind::Block(_)
            | ExprKind::TypeAlloc { .. }
            | ExprKind::ArrayAlloc { .. }
            | ExprKind::Bad
    )
}

/// A name that lexes back as a single `Identifier` token.
fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && TokenKind::keyword(name).is_none()
        && name != "true"
        && name != "false"
}
