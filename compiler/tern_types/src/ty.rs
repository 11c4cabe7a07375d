//! Semantic types.
//!
//! A [`Type`] is a plain tree: a [`TypeKind`] tag, an optional element type
//! for the indirections (`*T`, `&T`, `?T`, `[T]`) and a payload for the
//! multi-member kinds (tuples and error unions). User-defined kinds carry
//! an id into the [`SymbolTable`](crate::SymbolTable). Types are values;
//! nothing mutates one in place, `auto` goes through the
//! [`TypeTable`](crate::TypeTable).

use tern_ir::ast::PrimitiveType;

use crate::TypeFlags;

macro_rules! define_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// The index as `usize`, for indexing into `Vec`s.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Index of a struct descriptor, template or instantiation.
    StructId
);
define_id!(
    /// Index of an enum declaration.
    EnumId
);
define_id!(
    /// Index of a variant (`type T = (A | B)`) declaration.
    VariantId
);
define_id!(
    /// Index of a function or method, templates included.
    FunctionId
);
define_id!(
    /// Index of a global `var`/`const`.
    GlobalId
);
define_id!(
    /// An `auto` unification variable.
    TypeVar
);

/// Width and signedness of an integer type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntWidth {
    pub const fn bits(self) -> u16 {
        match self {
            IntWidth::I8 | IntWidth::U8 => 8,
            IntWidth::I16 | IntWidth::U16 => 16,
            IntWidth::I32 | IntWidth::U32 => 32,
            IntWidth::I64 | IntWidth::U64 => 64,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            IntWidth::I8 | IntWidth::I16 | IntWidth::I32 | IntWidth::I64
        )
    }

    /// Parse a built-in cast name such as `u8` or `i64`.
    pub fn from_name(name: &str) -> Option<IntWidth> {
        let width = match name {
            "i8" => IntWidth::I8,
            "i16" => IntWidth::I16,
            "i32" => IntWidth::I32,
            "i64" => IntWidth::I64,
            "u8" => IntWidth::U8,
            "u16" => IntWidth::U16,
            "u32" => IntWidth::U32,
            "u64" => IntWidth::U64,
            _ => return None,
        };
        Some(width)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
            IntWidth::U8 => "u8",
            IntWidth::U16 => "u16",
            IntWidth::U32 => "u32",
            IntWidth::U64 => "u64",
        }
    }

    /// Inclusive range of representable values.
    pub fn range(self) -> (i128, i128) {
        let bits = u32::from(self.bits());
        if self.is_signed() {
            let half = 1i128 << (bits - 1);
            (-half, half - 1)
        } else {
            (0, (1i128 << bits) - 1)
        }
    }

    pub fn contains(self, value: i128) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
    F128,
}

impl FloatWidth {
    pub const fn bits(self) -> u16 {
        match self {
            FloatWidth::F32 => 32,
            FloatWidth::F64 => 64,
            FloatWidth::F128 => 128,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FloatWidth::F32 => "f32",
            FloatWidth::F64 => "f64",
            FloatWidth::F128 => "f128",
        }
    }
}

/// The closed set of type shapes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Bool,
    /// `chr`
    Char,
    Int(IntWidth),
    Float(FloatWidth),
    Str,
    /// `unknown`: an opaque pointer-sized value.
    Unknown,
    Struct(StructId),
    Enum(EnumId),
    /// `E!S`; the payload holds `[error, success]`.
    EnumError,
    Variant(VariantId),
    Pointer,
    Reference,
    Array,
    Option,
    Tuple,
    /// A generic parameter that has not been substituted.
    Generic(String),
    Auto(TypeVar),
    /// The type given to an expression that already failed to check.
    /// Compatible with everything, so one error does not cascade.
    Undefined,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    pub kind: TypeKind,
    /// Element type of `*T`, `&T`, `?T` and `[T]`.
    pub base: Option<Box<Type>>,
    /// Tuple members, or `[error, success]` for an error union.
    pub payload: Vec<Type>,
}

impl Type {
    pub const fn new(kind: TypeKind) -> Self {
        Type {
            kind,
            base: None,
            payload: Vec::new(),
        }
    }

    fn with_base(kind: TypeKind, base: Type) -> Self {
        Type {
            kind,
            base: Some(Box::new(base)),
            payload: Vec::new(),
        }
    }

    pub const fn void() -> Self {
        Type::new(TypeKind::Void)
    }

    pub const fn bool() -> Self {
        Type::new(TypeKind::Bool)
    }

    pub const fn char() -> Self {
        Type::new(TypeKind::Char)
    }

    pub const fn str() -> Self {
        Type::new(TypeKind::Str)
    }

    pub const fn int(width: IntWidth) -> Self {
        Type::new(TypeKind::Int(width))
    }

    /// The default integer type.
    pub const fn i32() -> Self {
        Type::int(IntWidth::I32)
    }

    pub const fn float(width: FloatWidth) -> Self {
        Type::new(TypeKind::Float(width))
    }

    pub const fn undefined() -> Self {
        Type::new(TypeKind::Undefined)
    }

    pub const fn auto(var: TypeVar) -> Self {
        Type::new(TypeKind::Auto(var))
    }

    pub const fn strukt(id: StructId) -> Self {
        Type::new(TypeKind::Struct(id))
    }

    pub fn pointer(base: Type) -> Self {
        Type::with_base(TypeKind::Pointer, base)
    }

    pub fn reference(base: Type) -> Self {
        Type::with_base(TypeKind::Reference, base)
    }

    pub fn option(base: Type) -> Self {
        Type::with_base(TypeKind::Option, base)
    }

    pub fn array(base: Type) -> Self {
        Type::with_base(TypeKind::Array, base)
    }

    pub fn tuple(items: Vec<Type>) -> Self {
        Type {
            kind: TypeKind::Tuple,
            base: None,
            payload: items,
        }
    }

    pub fn enum_error(error: Type, success: Type) -> Self {
        Type {
            kind: TypeKind::EnumError,
            base: None,
            payload: vec![error, success],
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Type::new(TypeKind::Generic(name.into()))
    }

    pub fn from_primitive(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::Str => Type::str(),
            PrimitiveType::Chr => Type::char(),
            PrimitiveType::U8 => Type::int(IntWidth::U8),
            PrimitiveType::U16 => Type::int(IntWidth::U16),
            PrimitiveType::U32 => Type::int(IntWidth::U32),
            PrimitiveType::U64 => Type::int(IntWidth::U64),
            PrimitiveType::I8 => Type::int(IntWidth::I8),
            PrimitiveType::I16 => Type::int(IntWidth::I16),
            PrimitiveType::I32 => Type::int(IntWidth::I32),
            PrimitiveType::I64 => Type::int(IntWidth::I64),
            PrimitiveType::F32 => Type::float(FloatWidth::F32),
            PrimitiveType::F64 => Type::float(FloatWidth::F64),
            PrimitiveType::F128 => Type::float(FloatWidth::F128),
            PrimitiveType::Void => Type::void(),
            PrimitiveType::Bool => Type::bool(),
            PrimitiveType::Unknown => Type::new(TypeKind::Unknown),
        }
    }

    pub fn base(&self) -> Option<&Type> {
        self.base.as_deref()
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    pub fn is_bool(&self) -> bool {
        self.kind == TypeKind::Bool
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == TypeKind::Undefined
    }

    pub fn int_width(&self) -> Option<IntWidth> {
        match self.kind {
            TypeKind::Int(width) => Some(width),
            _ => None,
        }
    }

    pub fn struct_id(&self) -> Option<StructId> {
        match self.kind {
            TypeKind::Struct(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_auto(&self) -> Option<TypeVar> {
        match self.kind {
            TypeKind::Auto(var) => Some(var),
            _ => None,
        }
    }

    /// Operand of unary `-`: signed integers and floats.
    pub fn is_signed_numeric(&self) -> bool {
        match self.kind {
            TypeKind::Int(width) => width.is_signed(),
            TypeKind::Float(_) => true,
            _ => false,
        }
    }

    /// Properties of this type and everything nested in it.
    pub fn flags(&self) -> TypeFlags {
        let mut flags = match &self.kind {
            TypeKind::Int(_) => TypeFlags::IS_INTEGER | TypeFlags::IS_NUMERIC,
            TypeKind::Float(_) => TypeFlags::IS_NUMERIC,
            TypeKind::Pointer | TypeKind::Reference | TypeKind::Option | TypeKind::Array => {
                TypeFlags::IS_INDIRECT
            }
            TypeKind::Generic(_) => TypeFlags::HAS_GENERIC,
            TypeKind::Auto(_) => TypeFlags::HAS_AUTO,
            TypeKind::Undefined => TypeFlags::HAS_UNDEFINED,
            _ => TypeFlags::empty(),
        };
        let nested = self.base().into_iter().chain(&self.payload);
        for child in nested {
            flags |= child.flags() & TypeFlags::PROPAGATED;
        }
        flags
    }
}
