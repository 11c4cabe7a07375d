//! Syntax tree produced by the parser.
//!
//! Every node owns the [`Pos`] it was parsed from. Nodes that failed to
//! parse are represented by the `Bad` variants of [`ExprKind`],
//! [`StmtKind`] and [`TypeNodeKind`], so later stages never see holes.

mod print;

pub use print::{print_expr, print_namespace, print_type};

use crate::Pos;

/// A name together with where it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Ident {
            name: name.into(),
            pos,
        }
    }
}

/// Declaration visibility. Members are private unless marked `pub`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Modifier {
    #[default]
    Private,
    Public,
}

/// One `[name: value]` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pragma {
    pub name: Ident,
    pub value: Literal,
}

/// Pragma table attached to a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Pragmas {
    pub entries: Vec<Pragma>,
}

impl Pragmas {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.entries
            .iter()
            .find(|p| p.name.name == name)
            .map(|p| &p.value)
    }
}

/// Built-in type names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Str,
    Chr,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    F128,
    Void,
    Bool,
    Unknown,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        let ty = match name {
            "str" => PrimitiveType::Str,
            "chr" => PrimitiveType::Chr,
            "u8" => PrimitiveType::U8,
            "u16" => PrimitiveType::U16,
            "u32" => PrimitiveType::U32,
            "u64" => PrimitiveType::U64,
            "i8" => PrimitiveType::I8,
            "i16" => PrimitiveType::I16,
            "i32" => PrimitiveType::I32,
            "i64" => PrimitiveType::I64,
            "f32" => PrimitiveType::F32,
            "f64" => PrimitiveType::F64,
            "f128" => PrimitiveType::F128,
            "void" => PrimitiveType::Void,
            "bool" => PrimitiveType::Bool,
            "unknown" => PrimitiveType::Unknown,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Str => "str",
            PrimitiveType::Chr => "chr",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
            PrimitiveType::F128 => "f128",
            PrimitiveType::Void => "void",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Unknown => "unknown",
        }
    }
}

/// A type as written in source, before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeNodeKind {
    Primitive(PrimitiveType),
    /// A user type, generic when `args` is non-empty: `Name<T, U>`.
    Named { name: String, args: Vec<TypeNode> },
    /// `*T`
    Pointer(Box<TypeNode>),
    /// `&T`
    Reference(Box<TypeNode>),
    /// `?T`
    Option(Box<TypeNode>),
    /// `[T]`
    Array(Box<TypeNode>),
    /// `(T, U)`
    Tuple(Vec<TypeNode>),
    /// `Err!T`, only legal as a function return type.
    EnumError {
        error: Box<TypeNode>,
        success: Box<TypeNode>,
    },
    Bad,
}

impl TypeNode {
    pub fn new(kind: TypeNodeKind, pos: Pos) -> Self {
        TypeNode { kind, pos }
    }

    pub fn primitive(ty: PrimitiveType, pos: Pos) -> Self {
        TypeNode::new(TypeNodeKind::Primitive(ty), pos)
    }

    pub fn bad(pos: Pos) -> Self {
        TypeNode::new(TypeNodeKind::Bad, pos)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Str,
    Char,
    Bool,
}

/// Constant text as cooked by the lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, value: impl Into<String>) -> Self {
        Literal {
            kind,
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Literal::new(LiteralKind::Bool, if value { "true" } else { "false" })
    }
}

/// Arithmetic operators (the multiplicative and additive tiers).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Range,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Range => "..",
        }
    }
}

/// Operators producing `bool`: comparisons, membership and logic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Eq,
    Neq,
    Less,
    Greater,
    Leq,
    Geq,
    In,
    And,
    Or,
}

impl BooleanOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BooleanOp::Eq => "==",
            BooleanOp::Neq => "!=",
            BooleanOp::Less => "<",
            BooleanOp::Greater => ">",
            BooleanOp::Leq => "<=",
            BooleanOp::Geq => ">=",
            BooleanOp::In => "in",
            BooleanOp::And => "&&",
            BooleanOp::Or => "||",
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BooleanOp::And | BooleanOp::Or)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,
    Plus,
    Not,
    AddressOf,
    Deref,
    Increment,
    Decrement,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Plus => "+",
            PrefixOp::Not => "!",
            PrefixOp::AddressOf => "&",
            PrefixOp::Deref => "*",
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
        }
    }

    /// The arithmetic a compound assignment performs before storing.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Pos) -> Self {
        Expr { kind, pos }
    }

    pub fn bad(pos: Pos) -> Self {
        Expr::new(ExprKind::Bad, pos)
    }

    pub fn is_bad(&self) -> bool {
        matches!(self.kind, ExprKind::Bad)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Boolean {
        op: BooleanOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `expr is Type [alias]`
    Is {
        expr: Box<Expr>,
        ty: TypeNode,
        alias: Option<Ident>,
    },
    Prefix {
        op: PrefixOp,
        expr: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        expr: Box<Expr>,
    },
    Member {
        base: Box<Expr>,
        member: Ident,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Call(Box<Call>),
    Try(Box<Expr>),
    Cast {
        expr: Box<Expr>,
        ty: TypeNode,
    },
    /// `new Type { field: value, ... }`; `ty` is `None` for `new { ... }`.
    TypeAlloc {
        ty: Option<TypeNode>,
        fields: Vec<FieldInit>,
    },
    /// `new [T, size] { elements }`
    ArrayAlloc {
        elem: TypeNode,
        size: Option<Box<Expr>>,
        elements: Vec<Expr>,
    },
    Block(Block),
    Conditional(Box<Conditional>),
    Switch {
        scrutinee: Box<Expr>,
        cases: Vec<SwitchCase>,
        default: Option<Block>,
    },
    Assignment {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Bad,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub callee: Expr,
    pub generics: Vec<TypeNode>,
    pub args: Vec<Expr>,
    pub catch: Option<CatchClause>,
}

/// `catch [name] { ... }` trailing a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatchClause {
    pub binding: Option<Ident>,
    pub body: Block,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConditionalKind {
    If,
    Elif,
    Else,
    While,
}

/// `if`/`elif`/`else` chain link. `while` uses the same shape without a
/// successor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conditional {
    pub kind: ConditionalKind,
    /// `None` only for `else`.
    pub condition: Option<Expr>,
    pub body: Block,
    pub else_node: Option<Box<Conditional>>,
    pub pos: Pos,
}

impl Conditional {
    /// True if the chain ends in an `else`, so every path yields a value.
    pub fn is_exhaustive(&self) -> bool {
        match (&self.kind, &self.else_node) {
            (ConditionalKind::Else, _) => true,
            (_, Some(next)) => next.is_exhaustive(),
            (_, None) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchCase {
    pub value: Expr,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<TypeNode>,
    pub value: Option<Expr>,
    pub is_const: bool,
}

/// `for init, condition, step { body }`; all three heads are optional.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForLoop {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub step: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Pos,
}

impl Stmt {
    pub fn new(kind: StmtKind, pos: Pos) -> Self {
        Stmt { kind, pos }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Var(VarDecl),
    Return(Option<Expr>),
    For(ForLoop),
    Break,
    Continue,
    Expr(Expr),
    Bad,
}

/// `{ statement* }`. Its value is the value of the last statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeNode,
    pub default: Option<Literal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub generics: Vec<Ident>,
    pub params: Vec<Param>,
    /// `None` when no return type was written: the function returns `void`.
    pub ret: Option<TypeNode>,
    /// `None` for a prototype.
    pub body: Option<Block>,
    pub modifier: Modifier,
    pub pragmas: Pragmas,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TypeNode,
    pub modifier: Modifier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Ident,
    pub generics: Vec<Ident>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FunctionDecl>,
    pub modifier: Modifier,
    pub pragmas: Pragmas,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: Ident,
    pub value: Option<Literal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: Ident,
    /// `None` means the default `u8` base.
    pub base: Option<TypeNode>,
    pub members: Vec<EnumMember>,
    pub modifier: Modifier,
    pub pragmas: Pragmas,
    pub pos: Pos,
}

/// `type Name = (A | B | ...)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDecl {
    pub name: Ident,
    pub members: Vec<TypeNode>,
    pub modifier: Modifier,
    pub pragmas: Pragmas,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalDecl {
    pub decl: VarDecl,
    pub modifier: Modifier,
    pub pragmas: Pragmas,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportPath {
    /// `import "path/to/file"`
    File(String),
    /// `import name`
    Package(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    Import(ImportPath),
    /// `use alias = expr`
    Use { alias: Ident, target: Expr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    Function(FunctionDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Variant(VariantDecl),
    Global(GlobalDecl),
    Directive(Directive),
}

/// Root of a compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Namespace {
    pub members: Vec<Member>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    /// Append the members of another parsed source.
    pub fn merge(&mut self, other: Namespace) {
        self.members.extend(other.members);
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Function(f) => Some(f),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests;
