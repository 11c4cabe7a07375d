//! Source-level rendering of types, as used in diagnostics.

use std::fmt;

use crate::{SymbolTable, Type, TypeKind};

/// A [`Type`] together with the table that names its user-defined parts.
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    symbols: &'a SymbolTable,
}

impl SymbolTable {
    /// Render `ty` the way it is written in source: `*i32`, `?Point`,
    /// `[u8]`, `(bool, chr)`, `E!i32`. An unsolved `auto` prints as `auto`.
    pub fn display<'a>(&'a self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay { ty, symbols: self }
    }
}

impl TypeDisplay<'_> {
    fn child<'b>(&'b self, ty: &'b Type) -> TypeDisplay<'b> {
        TypeDisplay {
            ty,
            symbols: self.symbols,
        }
    }

    fn base(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty.base() {
            Some(base) => write!(f, "{}", self.child(base)),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty.kind {
            TypeKind::Void => f.write_str("void"),
            TypeKind::Bool => f.write_str("bool"),
            TypeKind::Char => f.write_str("chr"),
            TypeKind::Int(width) => f.write_str(width.as_str()),
            TypeKind::Float(width) => f.write_str(width.as_str()),
            TypeKind::Str => f.write_str("str"),
            TypeKind::Unknown => f.write_str("unknown"),
            TypeKind::Struct(id) => f.write_str(&self.symbols.get_struct(*id).name),
            TypeKind::Enum(id) => f.write_str(&self.symbols.get_enum(*id).decl.name.name),
            TypeKind::Variant(id) => f.write_str(&self.symbols.variant(*id).decl.name.name),
            TypeKind::EnumError => match self.ty.payload.as_slice() {
                [error, success] => write!(f, "{}!{}", self.child(error), self.child(success)),
                _ => f.write_str("undefined"),
            },
            TypeKind::Pointer => {
                f.write_str("*")?;
                self.base(f)
            }
            TypeKind::Reference => {
                f.write_str("&")?;
                self.base(f)
            }
            TypeKind::Option => {
                f.write_str("?")?;
                self.base(f)
            }
            TypeKind::Array => {
                f.write_str("[")?;
                self.base(f)?;
                f.write_str("]")
            }
            TypeKind::Tuple => {
                f.write_str("(")?;
                for (i, item) in self.ty.payload.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.child(item))?;
                }
                f.write_str(")")
            }
            TypeKind::Generic(name) => f.write_str(name),
            TypeKind::Auto(_) => f.write_str("auto"),
            TypeKind::Undefined => f.write_str("undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{FloatWidth, IntWidth, SymbolTable, Type, TypeVar};

    #[test]
    fn test_source_notation() {
        let symbols = SymbolTable::new();
        let cases = [
            (Type::pointer(Type::i32()), "*i32"),
            (Type::option(Type::char()), "?chr"),
            (Type::array(Type::reference(Type::str())), "[&str]"),
            (
                Type::tuple(vec![Type::bool(), Type::float(FloatWidth::F64)]),
                "(bool, f64)",
            ),
            (
                Type::enum_error(Type::int(IntWidth::U8), Type::void()),
                "u8!void",
            ),
            (Type::auto(TypeVar::new(3)), "auto"),
            (Type::generic("T"), "T"),
        ];
        for (ty, expected) in cases {
            assert_eq!(symbols.display(&ty).to_string(), expected);
        }
    }
}
